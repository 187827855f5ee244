//! Dashboard aggregation for Tasktide.
//!
//! Purely derived views over the task and bid contexts: per-identity
//! dashboard counters, category breakdowns, and bid history joined back to
//! its tasks. No stored state of its own; the module holds only domain
//! output types and a service over the two repository ports.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
