//! Adapter implementations for bid ledger ports.

pub mod memory;
pub mod postgres;
