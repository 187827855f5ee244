//! Task catalogue for Tasktide.
//!
//! This module owns the Task aggregate and its lifecycle: creation, filtered
//! listing, featured ordering, owner-side edits, and deletion. The bidder set
//! and its cached count live on the aggregate but are mutated only through
//! the bid ledger's registration path, never through catalogue updates. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
