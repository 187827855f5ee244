//! Port contracts for the bid ledger.
//!
//! Ports define infrastructure-agnostic interfaces used by bid services.

pub mod repository;

pub use repository::{BidRepository, BidRepositoryError, BidRepositoryResult};
