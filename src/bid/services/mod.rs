//! Application services for bid ledger orchestration.

mod ledger;

pub use ledger::{BidLedgerError, BidLedgerResult, BidLedgerService, BidPlacement, PlaceBidRequest};
