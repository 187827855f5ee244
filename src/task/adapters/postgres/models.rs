//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Owner identity.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub owner_email: String,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Task description.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Category label.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub category: String,
    /// Optional budget in minor currency units.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::BigInt>)]
    pub budget: Option<i64>,
    /// Deadline used for featured ordering.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub deadline: DateTime<Utc>,
    /// Lifecycle status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Bidder identities in registration order.
    #[diesel(sql_type = diesel::sql_types::Array<diesel::sql_types::Text>)]
    pub bidders: Vec<String>,
    /// Cached bidder count.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub bids_count: i64,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owner identity.
    pub owner_email: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Optional budget in minor currency units.
    pub budget: Option<i64>,
    /// Deadline used for featured ordering.
    pub deadline: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Bidder identities, empty at creation.
    pub bidders: Vec<String>,
    /// Cached bidder count, zero at creation.
    pub bids_count: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for owner-side task updates.
///
/// Excludes `bidders` and `bids_count` so catalogue edits can never clobber
/// concurrent bid registrations.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Optional budget in minor currency units.
    pub budget: Option<i64>,
    /// Deadline used for featured ordering.
    pub deadline: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}
