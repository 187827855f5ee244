//! In-memory task repository for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::identity::EmailAddress;
use crate::task::{
    domain::{Task, TaskFilter, TaskId, TaskStatus},
    ports::{CategoryCount, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// All mutating operations run under one writer lock, so the membership
/// guard inside [`TaskRepository::register_bidder`] is atomic with respect
/// to concurrent callers. The lock plays the role the conditional update
/// plays in the `PostgreSQL` adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    // Insertion order for listing.
    order: Vec<TaskId>,
}

impl InMemoryTaskState {
    fn in_order(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        // Keep the stored bidder set authoritative: a stale aggregate passed
        // to update must not undo concurrent bid registrations.
        let preserved = stored.bidders().to_vec();
        let mut incoming = task.clone();
        incoming.replace_bidders(preserved, task.updated_at());
        *stored = incoming;
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .in_order()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn list_featured(&self, limit: usize) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut tasks: Vec<Task> = state.in_order().cloned().collect();
        tasks.sort_by_key(Task::deadline);
        tasks.truncate(limit);
        Ok(tasks)
    }

    async fn list_by_owner(&self, owner: &EmailAddress) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .in_order()
            .filter(|task| task.owner_email() == owner)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.order.retain(|task_id| *task_id != id);
        Ok(())
    }

    async fn count_by_owner(
        &self,
        owner: &EmailAddress,
        status: Option<TaskStatus>,
    ) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let count = state
            .in_order()
            .filter(|task| task.owner_email() == owner)
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn category_counts(
        &self,
        owner: &EmailAddress,
    ) -> TaskRepositoryResult<Vec<CategoryCount>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for task in state.in_order().filter(|task| task.owner_email() == owner) {
            *counts.entry(task.category().to_owned()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, value)| CategoryCount { name, value })
            .collect())
    }

    async fn register_bidder(
        &self,
        id: TaskId,
        bidder: &EmailAddress,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.register_bidder(bidder.clone(), now).map_err(|_| {
            TaskRepositoryError::BidderAlreadyRegistered {
                task_id: id,
                bidder: bidder.clone(),
            }
        })?;
        Ok(task.clone())
    }

    async fn replace_bidders(
        &self,
        id: TaskId,
        bidders: &[EmailAddress],
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.replace_bidders(bidders.to_vec(), now);
        Ok(task.clone())
    }
}
