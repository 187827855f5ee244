//! Service layer for per-identity dashboard aggregation.

use crate::bid::ports::{BidRepository, BidRepositoryError};
use crate::identity::{EmailAddress, EmptyEmailError};
use crate::stats::domain::{BidWithTask, CategoryBreakdownEntry, DashboardStats};
use crate::task::domain::TaskStatus;
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for dashboard aggregation.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The caller-supplied identity was blank.
    #[error(transparent)]
    Identity(#[from] EmptyEmailError),
    /// Task-side persistence failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// Bid-side persistence failed.
    #[error(transparent)]
    BidRepository(#[from] BidRepositoryError),
}

/// Result type for dashboard service operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Dashboard aggregation service.
///
/// Stateless: every answer is recomputed from the two repositories, so the
/// aggregator tolerates the transient drift window between a bid insert and
/// its task-side registration.
#[derive(Clone)]
pub struct DashboardService<T, B>
where
    T: TaskRepository,
    B: BidRepository,
{
    tasks: Arc<T>,
    bids: Arc<B>,
}

impl<T, B> DashboardService<T, B>
where
    T: TaskRepository,
    B: BidRepository,
{
    /// Creates a new dashboard service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, bids: Arc<B>) -> Self {
        Self { tasks, bids }
    }

    /// Computes the identity's dashboard counters.
    ///
    /// The same email is read as an owner for the task counters and as a
    /// bidder for the bid counters and earnings.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when the identity is blank or a
    /// repository query fails.
    pub async fn dashboard_stats(&self, email: &str) -> DashboardResult<DashboardStats> {
        let identity = EmailAddress::new(email)?;

        let total_tasks = self.tasks.count_by_owner(&identity, None).await?;
        let active_tasks = self
            .tasks
            .count_by_owner(&identity, Some(TaskStatus::Active))
            .await?;
        let completed_tasks = self
            .tasks
            .count_by_owner(&identity, Some(TaskStatus::Completed))
            .await?;
        let active_bids = self.bids.count_by_bidder(&identity).await?;
        let earnings = self.bids.sum_completed_amounts(&identity).await?;

        Ok(DashboardStats {
            total_tasks,
            active_tasks,
            completed_tasks,
            active_bids,
            earnings,
        })
    }

    /// Groups the owner's tasks by category label. Categories with zero
    /// tasks are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when the identity is blank or the query
    /// fails.
    pub async fn category_breakdown(
        &self,
        owner_email: &str,
    ) -> DashboardResult<Vec<CategoryBreakdownEntry>> {
        let owner = EmailAddress::new(owner_email)?;
        let counts = self.tasks.category_counts(&owner).await?;
        Ok(counts
            .into_iter()
            .map(|count| CategoryBreakdownEntry {
                name: count.name,
                value: count.value,
            })
            .collect())
    }

    /// Lists the bidder's bids newest first, each joined with its task.
    /// Bids whose task was deleted come back with no task rather than
    /// failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when the identity is blank or a
    /// repository query fails.
    pub async fn bids_by_bidder(&self, bidder_email: &str) -> DashboardResult<Vec<BidWithTask>> {
        let bidder = EmailAddress::new(bidder_email)?;
        let bids = self.bids.list_by_bidder(&bidder).await?;

        let mut enriched = Vec::with_capacity(bids.len());
        for bid in bids {
            let task = self.tasks.find_by_id(bid.task_id()).await?;
            enriched.push(BidWithTask { bid, task });
        }
        Ok(enriched)
    }
}
