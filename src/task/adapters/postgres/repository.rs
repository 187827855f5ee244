//! `PostgreSQL` repository implementation for task catalogue storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::identity::EmailAddress;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskFilter, TaskId, TaskStatus},
    ports::{CategoryCount, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Bidder registration is a single conditional `UPDATE` guarded on
/// non-membership, so the add and the count increment commit together or
/// not at all; no in-process locking is involved.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let status = filter.status();
        let category = filter.category().map(ToOwned::to_owned);
        let search = filter.search().map(ToOwned::to_owned);

        self.run_blocking(move |connection| {
            let mut query = tasks::table.into_boxed();
            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            if let Some(label) = category {
                query = query.filter(tasks::category.eq(label));
            }
            if let Some(term) = search {
                let pattern = format!("%{}%", escape_like(&term));
                query = query.filter(
                    tasks::title
                        .ilike(pattern.clone())
                        .or(tasks::description.ilike(pattern)),
                );
            }
            let rows = query
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_featured(&self, limit: usize) -> TaskRepositoryResult<Vec<Task>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::deadline.asc(), tasks::created_at.asc()))
                .limit(limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_owner(&self, owner: &EmailAddress) -> TaskRepositoryResult<Vec<Task>> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_email.eq(owner))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn count_by_owner(
        &self,
        owner: &EmailAddress,
        status: Option<TaskStatus>,
    ) -> TaskRepositoryResult<u64> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::owner_email.eq(owner))
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            let count: i64 = query
                .count()
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
    }

    async fn category_counts(
        &self,
        owner: &EmailAddress,
    ) -> TaskRepositoryResult<Vec<CategoryCount>> {
        let owner = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows: Vec<(String, i64)> = tasks::table
                .filter(tasks::owner_email.eq(owner))
                .group_by(tasks::category)
                .select((tasks::category, diesel::dsl::count_star()))
                .order(tasks::category.asc())
                .load(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|(name, value)| CategoryCount {
                    name,
                    value: u64::try_from(value).unwrap_or_default(),
                })
                .collect())
        })
        .await
    }

    async fn register_bidder(
        &self,
        id: TaskId,
        bidder: &EmailAddress,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let bidder = bidder.clone();
        self.run_blocking(move |connection| {
            let row = conditional_register_bidder(connection, id, &bidder, now)?;
            match row {
                Some(updated) => row_to_task(updated),
                // Zero rows touched: the guard failed or the task is gone.
                // A follow-up read distinguishes the two outcomes.
                None => match find_row_by_id(connection, id)? {
                    Some(_) => Err(TaskRepositoryError::BidderAlreadyRegistered {
                        task_id: id,
                        bidder: bidder.clone(),
                    }),
                    None => Err(TaskRepositoryError::NotFound(id)),
                },
            }
        })
        .await
    }

    async fn replace_bidders(
        &self,
        id: TaskId,
        bidders: &[EmailAddress],
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let bidders: Vec<String> = bidders.iter().map(|b| b.as_str().to_owned()).collect();
        let count = i64::try_from(bidders.len()).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .set((
                    tasks::bidders.eq(bidders),
                    tasks::bids_count.eq(count),
                    tasks::updated_at.eq(now),
                ))
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map_or(Err(TaskRepositoryError::NotFound(id)), row_to_task)
        })
        .await
    }
}

/// Appends the bidder and increments the cached count in one statement,
/// guarded on non-membership. Returns `None` when zero rows were updated.
fn conditional_register_bidder(
    connection: &mut PgConnection,
    id: TaskId,
    bidder: &EmailAddress,
    now: DateTime<Utc>,
) -> TaskRepositoryResult<Option<TaskRow>> {
    let query = diesel::sql_query(concat!(
        "UPDATE tasks SET bidders = array_append(bidders, $2), ",
        "bids_count = bids_count + 1, updated_at = $3 ",
        "WHERE id = $1 AND NOT ($2 = ANY(bidders)) ",
        "RETURNING id, owner_email, title, description, category, budget, ",
        "deadline, status, bidders, bids_count, created_at, updated_at",
    ))
    .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
    .bind::<diesel::sql_types::Text, _>(bidder.as_str())
    .bind::<diesel::sql_types::Timestamptz, _>(now);

    query
        .get_result::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)
}

fn find_row_by_id(
    connection: &mut PgConnection,
    id: TaskId,
) -> TaskRepositoryResult<Option<TaskRow>> {
    tasks::table
        .filter(tasks::id.eq(id.into_inner()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        owner_email: task.owner_email().as_str().to_owned(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        category: task.category().to_owned(),
        budget: task.budget(),
        deadline: task.deadline(),
        status: task.status().as_str().to_owned(),
        bidders: task.bidders().iter().map(|b| b.as_str().to_owned()).collect(),
        bids_count: task.bids_count(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        category: task.category().to_owned(),
        budget: task.budget(),
        deadline: task.deadline(),
        status: task.status().as_str().to_owned(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_email,
        title,
        description,
        category,
        budget,
        deadline,
        status: persisted_status,
        bidders: persisted_bidders,
        bids_count,
        created_at,
        updated_at,
    } = row;

    let owner_email =
        EmailAddress::new(owner_email).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let bidders = persisted_bidders
        .into_iter()
        .map(EmailAddress::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner_email,
        title,
        description,
        category,
        budget,
        deadline,
        status,
        bidders,
        bids_count,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

/// Escapes LIKE metacharacters so user search terms match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
