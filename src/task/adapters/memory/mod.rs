//! In-memory adapters for the task catalogue.

mod task;

pub use task::InMemoryTaskRepository;
