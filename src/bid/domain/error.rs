//! Error types for bid domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain bid values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BidDomainError {
    /// The bid amount is zero or negative.
    #[error("invalid bid amount {0}, expected a positive amount")]
    InvalidAmount(i64),
}

/// Error returned while parsing bid statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown bid status: {0}")]
pub struct ParseBidStatusError(pub String);
