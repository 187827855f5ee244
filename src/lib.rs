//! Tasktide: task marketplace backend core.
//!
//! This crate provides the domain core for a task marketplace: owners post
//! tasks, other users place bids on them, and both sides see aggregated
//! activity. The crux is the bidding-consistency engine: exactly-once bid
//! registration per `(task, bidder)` pair under concurrent callers, with the
//! task's denormalised bidder set kept consistent with the bids collection.
//!
//! # Architecture
//!
//! Tasktide follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task catalogue lifecycle (create, list, update, delete)
//! - [`bid`]: Bid ledger with atomic dedup and counter consistency
//! - [`stats`]: Dashboard aggregation derived from tasks and bids

pub mod bid;
pub mod identity;
pub mod stats;
pub mod task;
