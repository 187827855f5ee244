//! Task aggregate root and related catalogue types.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use crate::identity::EmailAddress;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is open for bids.
    Active,
    /// Task work has finished.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Owner-supplied task content, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    title: String,
    description: String,
    category: String,
    budget: Option<i64>,
    deadline: DateTime<Utc>,
}

impl TaskDetails {
    /// Creates validated task details with required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>, deadline: DateTime<Utc>) -> Result<Self, TaskDomainError> {
        let title = validate_title(title.into())?;
        Ok(Self {
            title,
            description: String::new(),
            category: String::new(),
            budget: None,
            deadline,
        })
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the task category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the owner's budget in minor currency units.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidBudget`] when the amount is not
    /// positive.
    pub fn with_budget(mut self, budget: i64) -> Result<Self, TaskDomainError> {
        if budget <= 0 {
            return Err(TaskDomainError::InvalidBudget(budget));
        }
        self.budget = Some(budget);
        Ok(self)
    }
}

/// Owner-editable fields merged into an existing task.
///
/// The bidder set and its cached count are deliberately absent: those are
/// owned by the bid ledger's registration path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    budget: Option<i64>,
    deadline: Option<DateTime<Utc>>,
    status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replaces the budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: i64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Replaces the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the lifecycle status.
    ///
    /// Transitions are unconstrained: the catalogue accepts any target
    /// status, matching the permissive behaviour of the marketplace.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.budget.is_none()
            && self.deadline.is_none()
            && self.status.is_none()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner_email: EmailAddress,
    title: String,
    description: String,
    category: String,
    budget: Option<i64>,
    deadline: DateTime<Utc>,
    status: TaskStatus,
    bidders: Vec<EmailAddress>,
    bids_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identity.
    pub owner_email: EmailAddress,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted category label.
    pub category: String,
    /// Persisted budget, if any.
    pub budget: Option<i64>,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted bidder set in registration order.
    pub bidders: Vec<EmailAddress>,
    /// Persisted cached bidder count.
    pub bids_count: i64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new active task with an empty bidder set.
    #[must_use]
    pub fn new(owner_email: EmailAddress, details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let TaskDetails {
            title,
            description,
            category,
            budget,
            deadline,
        } = details;

        Self {
            id: TaskId::new(),
            owner_email,
            title,
            description,
            category,
            budget,
            deadline,
            status: TaskStatus::Active,
            bidders: Vec::new(),
            bids_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_email: data.owner_email,
            title: data.title,
            description: data.description,
            category: data.category,
            budget: data.budget,
            deadline: data.deadline,
            status: data.status,
            bidders: data.bidders,
            bids_count: data.bids_count,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owner identity.
    #[must_use]
    pub const fn owner_email(&self) -> &EmailAddress {
        &self.owner_email
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category label.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the budget in minor currency units, if set.
    #[must_use]
    pub const fn budget(&self) -> Option<i64> {
        self.budget
    }

    /// Returns the deadline used for featured ordering.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the bidder set in registration order.
    #[must_use]
    pub fn bidders(&self) -> &[EmailAddress] {
        &self.bidders
    }

    /// Returns the cached bidder count.
    ///
    /// Invariant: equals `bidders().len()` at rest; the bids collection is
    /// authoritative when the two drift after a partial failure.
    #[must_use]
    pub const fn bids_count(&self) -> i64 {
        self.bids_count
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the bidder is already registered.
    #[must_use]
    pub fn has_bidder(&self, bidder: &EmailAddress) -> bool {
        self.bidders.contains(bidder)
    }

    /// Merges owner-editable fields and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::InvalidBudget`] when a patched value fails
    /// validation.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let TaskPatch {
            title,
            description,
            category,
            budget,
            deadline,
            status,
        } = patch;

        if let Some(new_title) = title {
            self.title = validate_title(new_title)?;
        }
        if let Some(new_budget) = budget {
            if new_budget <= 0 {
                return Err(TaskDomainError::InvalidBudget(new_budget));
            }
            self.budget = Some(new_budget);
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_category) = category {
            self.category = new_category;
        }
        if let Some(new_deadline) = deadline {
            self.deadline = new_deadline;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }
        self.touch(clock);
        Ok(())
    }

    /// Adds a bidder to the set and increments the cached count together.
    ///
    /// The two writes always happen as one step so the count invariant holds
    /// for every observer of this aggregate value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::BidderAlreadyRegistered`] when the bidder
    /// is already present; the aggregate is left unchanged.
    pub fn register_bidder(
        &mut self,
        bidder: EmailAddress,
        now: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.has_bidder(&bidder) {
            return Err(TaskDomainError::BidderAlreadyRegistered(bidder));
        }
        self.bidders.push(bidder);
        self.bids_count = count_of(&self.bidders);
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the bidder set from an authoritative source, deduplicating
    /// while preserving first-seen order, and recomputes the cached count.
    ///
    /// Repair path for drift between the bids collection and this aggregate;
    /// not part of normal bid placement.
    pub fn replace_bidders(&mut self, bidders: Vec<EmailAddress>, now: DateTime<Utc>) {
        let mut deduplicated: Vec<EmailAddress> = Vec::with_capacity(bidders.len());
        for bidder in bidders {
            if !deduplicated.contains(&bidder) {
                deduplicated.push(bidder);
            }
        }
        self.bidders = deduplicated;
        self.bids_count = count_of(&self.bidders);
        self.updated_at = now;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_title(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn count_of(bidders: &[EmailAddress]) -> i64 {
    i64::try_from(bidders.len()).unwrap_or(i64::MAX)
}
