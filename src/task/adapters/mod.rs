//! Adapter implementations for task catalogue ports.

pub mod memory;
pub mod postgres;
