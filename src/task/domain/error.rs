//! Error types for task domain validation and parsing.

use crate::identity::EmailAddress;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The budget is zero or negative.
    #[error("invalid task budget {0}, expected a positive amount")]
    InvalidBudget(i64),

    /// The bidder is already present in the task's bidder set.
    #[error("bidder {0} has already bid on this task")]
    BidderAlreadyRegistered(EmailAddress),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
