//! Output types for dashboard aggregation.

use crate::bid::domain::Bid;
use crate::task::domain::Task;
use serde::Serialize;

/// Per-identity dashboard counters.
///
/// Task counters treat the identity as an owner; bid counters treat the
/// same identity as a bidder. The two roles are deliberately not
/// reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// All tasks owned by the identity.
    pub total_tasks: u64,
    /// Owned tasks still open for bids.
    pub active_tasks: u64,
    /// Owned tasks that finished.
    pub completed_tasks: u64,
    /// All bids placed by the identity, regardless of status.
    pub active_bids: u64,
    /// Sum of the identity's completed bid amounts, minor currency units.
    pub earnings: i64,
}

/// One slice of an owner's category breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdownEntry {
    /// Category label.
    pub name: String,
    /// Number of the owner's tasks in the category.
    pub value: u64,
}

/// A bid enriched with its referenced task.
///
/// `task` is `None` when the task was deleted after the bid was placed;
/// the listing tolerates the orphan instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidWithTask {
    /// The bid itself.
    pub bid: Bid,
    /// The referenced task, when it still exists.
    pub task: Option<Task>,
}
