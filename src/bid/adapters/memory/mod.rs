//! In-memory adapters for the bid ledger.

mod bid;

pub use bid::InMemoryBidRepository;
