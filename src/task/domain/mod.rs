//! Domain model for the task catalogue.
//!
//! The task domain models marketplace task creation, owner edits, bidder
//! registration, and filtering while keeping all infrastructure concerns
//! outside of the domain boundary.

mod error;
mod filter;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use filter::TaskFilter;
pub use ids::TaskId;
pub use task::{PersistedTaskData, Task, TaskDetails, TaskPatch, TaskStatus};
