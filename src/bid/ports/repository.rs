//! Repository port for bid persistence and the pair-uniqueness contract.

use crate::bid::domain::{Bid, BidId, BidStatus};
use crate::identity::EmailAddress;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for bid repository operations.
pub type BidRepositoryResult<T> = Result<T, BidRepositoryError>;

/// Bid persistence contract.
///
/// Implementations must enforce uniqueness of the `(task_id, bidder_email)`
/// pair at the store level: two concurrent `store` calls for the same pair
/// see exactly one success and one [`BidRepositoryError::DuplicateBid`].
/// That constraint, not any application-level pre-check, is the commit
/// point of bid placement.
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// Stores a new bid.
    ///
    /// # Errors
    ///
    /// Returns [`BidRepositoryError::DuplicateBid`] when a bid for the same
    /// `(task_id, bidder_email)` pair already exists and
    /// [`BidRepositoryError::DuplicateBidId`] when the identifier collides.
    async fn store(&self, bid: &Bid) -> BidRepositoryResult<()>;

    /// Returns `true` when a bid exists for the pair. Fast-path reporting
    /// aid only; the `store` constraint remains the correctness mechanism.
    async fn exists(&self, task_id: TaskId, bidder: &EmailAddress) -> BidRepositoryResult<bool>;

    /// Lists all bids by the bidder, newest first.
    async fn list_by_bidder(&self, bidder: &EmailAddress) -> BidRepositoryResult<Vec<Bid>>;

    /// Returns the bidder identities holding bids on the task, in bid
    /// creation order. Authoritative source for reconciliation.
    async fn bidders_for_task(&self, task_id: TaskId) -> BidRepositoryResult<Vec<EmailAddress>>;

    /// Counts all bids placed by the bidder.
    async fn count_by_bidder(&self, bidder: &EmailAddress) -> BidRepositoryResult<u64>;

    /// Sums the amounts of the bidder's completed bids, in minor currency
    /// units.
    async fn sum_completed_amounts(&self, bidder: &EmailAddress) -> BidRepositoryResult<i64>;

    /// Moves a bid to a new lifecycle status and returns the refreshed bid.
    ///
    /// # Errors
    ///
    /// Returns [`BidRepositoryError::NotFound`] when the bid does not exist.
    async fn update_status(&self, id: BidId, status: BidStatus) -> BidRepositoryResult<Bid>;
}

/// Errors returned by bid repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BidRepositoryError {
    /// A bid already exists for the `(task, bidder)` pair.
    #[error("bidder {bidder} has already bid on task {task_id}")]
    DuplicateBid {
        /// Task the pair refers to.
        task_id: TaskId,
        /// The duplicate bidder identity.
        bidder: EmailAddress,
    },

    /// A bid with the same identifier already exists.
    #[error("duplicate bid identifier: {0}")]
    DuplicateBidId(BidId),

    /// The bid was not found.
    #[error("bid not found: {0}")]
    NotFound(BidId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BidRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
