//! Domain model for the bid ledger.

mod bid;
mod error;
mod ids;

pub use bid::{Bid, BidAmount, BidStatus, PersistedBidData};
pub use error::{BidDomainError, ParseBidStatusError};
pub use ids::BidId;
