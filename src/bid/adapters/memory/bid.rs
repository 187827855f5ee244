//! In-memory bid repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::bid::{
    domain::{Bid, BidId, BidStatus},
    ports::{BidRepository, BidRepositoryError, BidRepositoryResult},
};
use crate::identity::EmailAddress;
use crate::task::domain::TaskId;

/// Thread-safe in-memory bid repository.
///
/// The `(task_id, bidder_email)` pair index is checked and inserted under
/// the same writer lock as the bid itself, so `store` is atomic with
/// respect to concurrent callers. The lock stands in for the unique index
/// of the `PostgreSQL` adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBidRepository {
    state: Arc<RwLock<InMemoryBidState>>,
}

#[derive(Debug, Default)]
struct InMemoryBidState {
    bids: HashMap<BidId, Bid>,
    // Insertion order; newest-first listings iterate it in reverse.
    order: Vec<BidId>,
    pairs: HashSet<(TaskId, EmailAddress)>,
}

impl InMemoryBidRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> BidRepositoryError {
    BidRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BidRepository for InMemoryBidRepository {
    async fn store(&self, bid: &Bid) -> BidRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.bids.contains_key(&bid.id()) {
            return Err(BidRepositoryError::DuplicateBidId(bid.id()));
        }

        let pair = (bid.task_id(), bid.bidder_email().clone());
        if state.pairs.contains(&pair) {
            return Err(BidRepositoryError::DuplicateBid {
                task_id: bid.task_id(),
                bidder: bid.bidder_email().clone(),
            });
        }

        state.pairs.insert(pair);
        state.order.push(bid.id());
        state.bids.insert(bid.id(), bid.clone());
        Ok(())
    }

    async fn exists(&self, task_id: TaskId, bidder: &EmailAddress) -> BidRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.pairs.contains(&(task_id, bidder.clone())))
    }

    async fn list_by_bidder(&self, bidder: &EmailAddress) -> BidRepositoryResult<Vec<Bid>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .order
            .iter()
            .rev()
            .filter_map(|id| state.bids.get(id))
            .filter(|bid| bid.bidder_email() == bidder)
            .cloned()
            .collect())
    }

    async fn bidders_for_task(&self, task_id: TaskId) -> BidRepositoryResult<Vec<EmailAddress>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.bids.get(id))
            .filter(|bid| bid.task_id() == task_id)
            .map(|bid| bid.bidder_email().clone())
            .collect())
    }

    async fn count_by_bidder(&self, bidder: &EmailAddress) -> BidRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let count = state
            .bids
            .values()
            .filter(|bid| bid.bidder_email() == bidder)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn sum_completed_amounts(&self, bidder: &EmailAddress) -> BidRepositoryResult<i64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .bids
            .values()
            .filter(|bid| bid.bidder_email() == bidder)
            .filter(|bid| bid.status() == BidStatus::Completed)
            .fold(0_i64, |total, bid| {
                total.saturating_add(bid.amount().value())
            }))
    }

    async fn update_status(&self, id: BidId, status: BidStatus) -> BidRepositoryResult<Bid> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let bid = state
            .bids
            .get_mut(&id)
            .ok_or(BidRepositoryError::NotFound(id))?;
        bid.set_status(status);
        Ok(bid.clone())
    }
}
