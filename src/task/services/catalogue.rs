//! Service layer for task creation, listing, edits, and deletion.

use crate::identity::{EmailAddress, EmptyEmailError};
use crate::task::{
    domain::{Task, TaskDetails, TaskDomainError, TaskFilter, TaskId, TaskPatch},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Maximum number of tasks returned by the featured listing.
pub const FEATURED_TASK_LIMIT: usize = 6;

/// Request payload for creating a marketplace task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner_email: String,
    title: String,
    description: Option<String>,
    category: Option<String>,
    budget: Option<i64>,
    deadline: DateTime<Utc>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        owner_email: impl Into<String>,
        title: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            owner_email: owner_email.into(),
            title: title.into(),
            description: None,
            category: None,
            budget: None,
            deadline,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the budget in minor currency units.
    #[must_use]
    pub const fn with_budget(mut self, budget: i64) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Service-level errors for task catalogue operations.
#[derive(Debug, Error)]
pub enum TaskCatalogueError {
    /// The caller-supplied identity was blank.
    #[error(transparent)]
    Identity(#[from] EmptyEmailError),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task catalogue service operations.
pub type TaskCatalogueResult<T> = Result<T, TaskCatalogueError>;

/// Task catalogue orchestration service.
#[derive(Clone)]
pub struct TaskCatalogueService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskCatalogueService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task catalogue service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a new active task with an empty bidder set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogueError`] when the owner identity is blank, a
    /// field fails validation, or the repository rejects persistence.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskCatalogueResult<Task> {
        let owner_email = EmailAddress::new(request.owner_email)?;

        let mut details = TaskDetails::new(request.title, request.deadline)?;
        if let Some(description) = request.description {
            details = details.with_description(description);
        }
        if let Some(category) = request.category {
            details = details.with_category(category);
        }
        if let Some(budget) = request.budget {
            details = details.with_budget(budget)?;
        }

        let task = Task::new(owner_email, details, &*self.clock);
        self.repository.store(&task).await?;
        Ok(task)
    }

    /// Lists tasks matching the filter, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogueError::Repository`] when the listing fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskCatalogueResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Lists up to [`FEATURED_TASK_LIMIT`] tasks with the soonest deadlines.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogueError::Repository`] when the listing fails.
    pub async fn list_featured(&self) -> TaskCatalogueResult<Vec<Task>> {
        Ok(self.repository.list_featured(FEATURED_TASK_LIMIT).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task
    /// does not exist.
    pub async fn get_task(&self, id: TaskId) -> TaskCatalogueResult<Task> {
        let task = self.repository.find_by_id(id).await?;
        task.ok_or_else(|| TaskRepositoryError::NotFound(id).into())
    }

    /// Merges owner-editable fields into an existing task and persists it.
    ///
    /// The patch cannot touch the bidder set or its cached count; those are
    /// owned by the bid ledger.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogueError`] when the task is absent or a patched
    /// value fails validation.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> TaskCatalogueResult<Task> {
        let mut task = self.get_task(id).await?;
        task.apply_patch(patch, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task. Its bids are orphaned, not cascaded; bid listings
    /// joining back to the task yield no task for them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task
    /// does not exist.
    pub async fn delete_task(&self, id: TaskId) -> TaskCatalogueResult<()> {
        Ok(self.repository.delete(id).await?)
    }

    /// Lists all tasks created by the owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogueError`] when the identity is blank or the
    /// listing fails.
    pub async fn list_by_owner(&self, owner_email: &str) -> TaskCatalogueResult<Vec<Task>> {
        let owner = EmailAddress::new(owner_email)?;
        Ok(self.repository.list_by_owner(&owner).await?)
    }
}
