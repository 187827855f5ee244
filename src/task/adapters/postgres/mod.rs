//! `PostgreSQL` adapters for task catalogue persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool};
