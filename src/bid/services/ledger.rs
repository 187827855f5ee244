//! Service layer for bid placement, interest marking, and reconciliation.
//!
//! Bid placement commits at the store-level uniqueness constraint on the
//! `(task, bidder)` pair. The task-side bidder registration that follows is
//! a single conditional update; if it reports the bidder as already
//! present, or if the process died between the two steps on a previous
//! attempt, the state is already what placement was going to make it, so
//! the operation treats that as success. [`BidLedgerService::reconcile_bids_count`]
//! repairs the remaining drift window from the authoritative bids
//! collection.

use crate::bid::{
    domain::{Bid, BidAmount, BidDomainError},
    ports::{BidRepository, BidRepositoryError},
};
use crate::identity::{EmailAddress, EmptyEmailError};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for placing a full bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceBidRequest {
    task_id: TaskId,
    bidder_email: String,
    bid_amount: i64,
    message: String,
}

impl PlaceBidRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(task_id: TaskId, bidder_email: impl Into<String>, bid_amount: i64) -> Self {
        Self {
            task_id,
            bidder_email: bidder_email.into(),
            bid_amount,
            message: String::new(),
        }
    }

    /// Sets the bidder's message to the owner.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Outcome of a successful bid placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidPlacement {
    /// The newly created bid.
    pub bid: Bid,
    /// The task refreshed after bidder registration.
    pub task: Task,
}

/// Service-level errors for bid ledger operations.
#[derive(Debug, Error)]
pub enum BidLedgerError {
    /// The caller-supplied identity was blank.
    #[error(transparent)]
    Identity(#[from] EmptyEmailError),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BidDomainError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The bidder has already bid on, or marked interest in, the task.
    /// Expected and recoverable, not a system fault.
    #[error("bidder {bidder} has already bid on task {task_id}")]
    DuplicateBid {
        /// The task in question.
        task_id: TaskId,
        /// The duplicate bidder identity.
        bidder: EmailAddress,
    },

    /// Task-side persistence failed.
    #[error(transparent)]
    TaskRepository(TaskRepositoryError),

    /// Bid-side persistence failed.
    #[error(transparent)]
    BidRepository(BidRepositoryError),
}

impl From<TaskRepositoryError> for BidLedgerError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::TaskNotFound(task_id),
            TaskRepositoryError::BidderAlreadyRegistered { task_id, bidder } => {
                Self::DuplicateBid { task_id, bidder }
            }
            other => Self::TaskRepository(other),
        }
    }
}

impl From<BidRepositoryError> for BidLedgerError {
    fn from(err: BidRepositoryError) -> Self {
        match err {
            BidRepositoryError::DuplicateBid { task_id, bidder } => {
                Self::DuplicateBid { task_id, bidder }
            }
            other => Self::BidRepository(other),
        }
    }
}

/// Result type for bid ledger service operations.
pub type BidLedgerResult<T> = Result<T, BidLedgerError>;

/// Bid ledger orchestration service.
#[derive(Clone)]
pub struct BidLedgerService<T, B, C>
where
    T: TaskRepository,
    B: BidRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    bids: Arc<B>,
    clock: Arc<C>,
}

impl<T, B, C> BidLedgerService<T, B, C>
where
    T: TaskRepository,
    B: BidRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new bid ledger service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, bids: Arc<B>, clock: Arc<C>) -> Self {
        Self { tasks, bids, clock }
    }

    /// Places a full bid: creates a bid record and registers the bidder on
    /// the task, exactly once per `(task, bidder)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::TaskNotFound`] when the task is absent,
    /// [`BidLedgerError::DuplicateBid`] when the pair already bid,
    /// [`BidLedgerError::Identity`] / [`BidLedgerError::Domain`] for invalid
    /// input, and repository variants for persistence failures.
    pub async fn place_bid(&self, request: PlaceBidRequest) -> BidLedgerResult<BidPlacement> {
        let bidder = EmailAddress::new(request.bidder_email)?;
        let amount = BidAmount::new(request.bid_amount)?;

        let task = self
            .tasks
            .find_by_id(request.task_id)
            .await?
            .ok_or(BidLedgerError::TaskNotFound(request.task_id))?;

        // Advisory pre-check for a friendlier early reply; the store
        // constraint below remains the correctness mechanism in the window
        // between this read and the insert.
        if self.bids.exists(request.task_id, &bidder).await? {
            return Err(BidLedgerError::DuplicateBid {
                task_id: request.task_id,
                bidder,
            });
        }

        let bid = Bid::new(
            request.task_id,
            task.title(),
            bidder.clone(),
            amount,
            request.message,
            &*self.clock,
        );
        self.bids.store(&bid).await?;

        // The bid insert is the commit point. From here the task-side
        // registration may find the bidder already present (an earlier
        // attempt got this far before dying); that state is exactly what
        // this call was about to produce, so it counts as success.
        let refreshed = match self
            .tasks
            .register_bidder(request.task_id, &bidder, self.clock.utc())
            .await
        {
            Ok(task_after) => task_after,
            Err(TaskRepositoryError::BidderAlreadyRegistered { .. }) => self
                .tasks
                .find_by_id(request.task_id)
                .await?
                .ok_or(BidLedgerError::TaskNotFound(request.task_id))?,
            Err(err) => return Err(err.into()),
        };

        Ok(BidPlacement {
            bid,
            task: refreshed,
        })
    }

    /// Registers a lightweight "I'm interested" signal: adds the bidder to
    /// the task's bidder set without creating a bid record.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::TaskNotFound`] when the task is absent and
    /// [`BidLedgerError::DuplicateBid`] when the bidder is already
    /// registered.
    pub async fn mark_interest(
        &self,
        task_id: TaskId,
        bidder_email: &str,
    ) -> BidLedgerResult<Task> {
        let bidder = EmailAddress::new(bidder_email)?;
        let task = self
            .tasks
            .register_bidder(task_id, &bidder, self.clock.utc())
            .await?;
        Ok(task)
    }

    /// Recomputes the task's bidder set and cached count from the bids
    /// collection, preserving interest-only registrations that have no bid
    /// record. Repair tool for the drift window after a partial placement,
    /// and the oracle for the count invariant.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::TaskNotFound`] when the task is absent and
    /// repository variants for persistence failures.
    pub async fn reconcile_bids_count(&self, task_id: TaskId) -> BidLedgerResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(BidLedgerError::TaskNotFound(task_id))?;

        let mut merged = task.bidders().to_vec();
        for bidder in self.bids.bidders_for_task(task_id).await? {
            if !merged.contains(&bidder) {
                merged.push(bidder);
            }
        }

        let repaired = self
            .tasks
            .replace_bidders(task_id, &merged, self.clock.utc())
            .await?;
        Ok(repaired)
    }
}
