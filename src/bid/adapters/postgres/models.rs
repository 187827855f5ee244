//! Diesel row models for bid persistence.

use super::schema::bids;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for bid records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = bids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BidRow {
    /// Bid identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Referenced task.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub task_id: uuid::Uuid,
    /// Task title snapshot.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub task_title: String,
    /// Bidder identity.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub bidder_email: String,
    /// Offered amount in minor currency units.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub bid_amount: i64,
    /// Bidder's message.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub message: String,
    /// Lifecycle status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
}

/// Insert model for bid records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bids)]
pub struct NewBidRow {
    /// Bid identifier.
    pub id: uuid::Uuid,
    /// Referenced task.
    pub task_id: uuid::Uuid,
    /// Task title snapshot.
    pub task_title: String,
    /// Bidder identity.
    pub bidder_email: String,
    /// Offered amount in minor currency units.
    pub bid_amount: i64,
    /// Bidder's message.
    pub message: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
