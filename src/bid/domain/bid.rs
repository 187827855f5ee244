//! Bid aggregate root and related ledger types.

use super::{BidDomainError, BidId, ParseBidStatusError};
use crate::identity::EmailAddress;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bid lifecycle status.
///
/// Transitions are unconstrained; `pending` to `completed` is how earnings
/// become visible on the bidder's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Bid awaits the owner's decision.
    Pending,
    /// Owner accepted the bid.
    Accepted,
    /// Work finished and the amount counts as earnings.
    Completed,
    /// Owner turned the bid down.
    Rejected,
}

impl BidStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for BidStatus {
    type Error = ParseBidStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseBidStatusError(value.to_owned())),
        }
    }
}

/// Positive bid amount in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidAmount(i64);

impl BidAmount {
    /// Creates a validated bid amount.
    ///
    /// # Errors
    ///
    /// Returns [`BidDomainError::InvalidAmount`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, BidDomainError> {
        if value <= 0 {
            return Err(BidDomainError::InvalidAmount(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying amount.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BidAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bid aggregate root.
///
/// Holds a weak reference to its task plus a title snapshot taken at bid
/// time, so bid listings render without a join even after the task is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    id: BidId,
    task_id: TaskId,
    task_title: String,
    bidder_email: EmailAddress,
    amount: BidAmount,
    message: String,
    status: BidStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted bid aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBidData {
    /// Persisted bid identifier.
    pub id: BidId,
    /// Persisted task reference.
    pub task_id: TaskId,
    /// Persisted task title snapshot.
    pub task_title: String,
    /// Persisted bidder identity.
    pub bidder_email: EmailAddress,
    /// Persisted amount.
    pub amount: BidAmount,
    /// Persisted message.
    pub message: String,
    /// Persisted lifecycle status.
    pub status: BidStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Creates a new pending bid against a task.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        task_title: impl Into<String>,
        bidder_email: EmailAddress,
        amount: BidAmount,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: BidId::new(),
            task_id,
            task_title: task_title.into(),
            bidder_email,
            amount,
            message: message.into(),
            status: BidStatus::Pending,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a bid from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBidData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            task_title: data.task_title,
            bidder_email: data.bidder_email,
            amount: data.amount,
            message: data.message,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the bid identifier.
    #[must_use]
    pub const fn id(&self) -> BidId {
        self.id
    }

    /// Returns the referenced task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task title snapshot taken at bid time.
    #[must_use]
    pub fn task_title(&self) -> &str {
        &self.task_title
    }

    /// Returns the bidder identity.
    #[must_use]
    pub const fn bidder_email(&self) -> &EmailAddress {
        &self.bidder_email
    }

    /// Returns the offered amount.
    #[must_use]
    pub const fn amount(&self) -> BidAmount {
        self.amount
    }

    /// Returns the bidder's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> BidStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moves the bid to a new lifecycle status. Transitions are
    /// unconstrained.
    pub const fn set_status(&mut self, status: BidStatus) {
        self.status = status;
    }
}
