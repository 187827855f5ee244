//! Repository port for task persistence, lookup, and bidder registration.

use crate::identity::EmailAddress;
use crate::task::domain::{Task, TaskFilter, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Number of tasks an owner has filed under one category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Category label.
    pub name: String,
    /// Task count within the category.
    pub value: u64,
}

/// Task persistence contract.
///
/// `register_bidder` is the consistency-critical operation: implementations
/// must perform the membership test, the bidder append, and the count
/// increment as one atomic step with respect to concurrent callers. A
/// read-modify-write sequence is not an acceptable implementation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists owner-editable fields, status, and `updated_at` of an
    /// existing task. The bidder set and cached count are never written by
    /// this operation, so a stale aggregate cannot clobber concurrent bid
    /// registrations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter, in insertion order.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists up to `limit` tasks ordered by ascending deadline, ties kept in
    /// insertion order.
    async fn list_featured(&self, limit: usize) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists all tasks created by the owner, in insertion order.
    async fn list_by_owner(&self, owner: &EmailAddress) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task. Bids referencing it are left in place (orphan
    /// policy); readers joining bids to tasks tolerate the gap.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Counts the owner's tasks, optionally restricted to one status.
    async fn count_by_owner(
        &self,
        owner: &EmailAddress,
        status: Option<TaskStatus>,
    ) -> TaskRepositoryResult<u64>;

    /// Groups the owner's tasks by category label. Categories with zero
    /// tasks do not appear.
    async fn category_counts(
        &self,
        owner: &EmailAddress,
    ) -> TaskRepositoryResult<Vec<CategoryCount>>;

    /// Atomically adds the bidder to the task's bidder set and increments
    /// the cached count, guarded on non-membership, returning the refreshed
    /// task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist and [`TaskRepositoryError::BidderAlreadyRegistered`] when the
    /// guard fails; concurrent callers for the same pair see exactly one
    /// success.
    async fn register_bidder(
        &self,
        id: TaskId,
        bidder: &EmailAddress,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Replaces the task's bidder set and cached count from an
    /// authoritative source, returning the refreshed task. Repair path for
    /// drift after a partial bid placement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn replace_bidders(
        &self,
        id: TaskId,
        bidders: &[EmailAddress],
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The bidder is already registered on the task.
    #[error("bidder {bidder} already registered on task {task_id}")]
    BidderAlreadyRegistered {
        /// Task whose bidder set already holds the bidder.
        task_id: TaskId,
        /// The duplicate bidder identity.
        bidder: EmailAddress,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
