//! Bid ledger for Tasktide.
//!
//! This module owns the Bid aggregate and the bidding-consistency engine:
//! placing a bid exactly once per `(task, bidder)` pair under concurrent
//! callers, keeping the task's denormalised bidder set and cached count in
//! step with the bids collection, and repairing drift after partial
//! failures. The store-level uniqueness constraint on the pair is the true
//! commit point; in-memory checks are only fast-path reporting aids. The
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
