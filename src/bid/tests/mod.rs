//! Unit tests for the bid ledger context.
