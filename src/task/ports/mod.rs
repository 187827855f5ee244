//! Port contracts for the task catalogue.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{CategoryCount, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
