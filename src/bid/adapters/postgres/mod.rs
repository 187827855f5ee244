//! `PostgreSQL` adapters for bid ledger persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BidPgPool, PostgresBidRepository};
