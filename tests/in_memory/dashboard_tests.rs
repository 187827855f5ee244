//! End-to-end dashboard aggregation over the full marketplace flow.

use crate::in_memory::helpers::{marketplace, runtime, seed_task, Marketplace};
use rstest::rstest;
use std::io;
use tasktide::bid::domain::BidStatus;
use tasktide::bid::ports::BidRepository;
use tasktide::bid::services::PlaceBidRequest;
use tasktide::task::domain::{TaskPatch, TaskStatus};
use tokio::runtime::Runtime;

/// Walks the full flow: a task is created, bid on once, and surfaces in
/// the owner's breakdown and both parties' dashboards.
#[rstest]
fn marketplace_flow_feeds_the_dashboard(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    let placement = rt
        .block_on(
            marketplace.ledger.place_bid(
                PlaceBidRequest::new(task.id(), "bidder@example.com", 500).with_message("hi"),
            ),
        )
        .expect("placement");
    assert_eq!(placement.bid.status(), BidStatus::Pending);

    let repeat = rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 500)),
    );
    assert!(repeat.is_err(), "the same pair cannot bid twice");

    let breakdown = rt
        .block_on(marketplace.dashboard.category_breakdown("owner@example.com"))
        .expect("breakdown");
    let design = breakdown.iter().find(|entry| entry.name == "design");
    assert_eq!(design.map(|entry| entry.value), Some(1));

    let owner_stats = rt
        .block_on(marketplace.dashboard.dashboard_stats("owner@example.com"))
        .expect("owner stats");
    assert_eq!(owner_stats.total_tasks, 1);
    assert_eq!(owner_stats.active_tasks, 1);
    assert_eq!(owner_stats.active_bids, 0);

    let bidder_stats = rt
        .block_on(marketplace.dashboard.dashboard_stats("bidder@example.com"))
        .expect("bidder stats");
    assert_eq!(bidder_stats.total_tasks, 0);
    assert_eq!(bidder_stats.active_bids, 1);
    assert_eq!(bidder_stats.earnings, 0, "pending bids do not earn");
}

/// Tests that completing the work moves the amount into the bidder's
/// earnings and the task into the owner's completed count.
#[rstest]
fn completed_work_moves_into_earnings(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");
    let placement = rt
        .block_on(
            marketplace
                .ledger
                .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 500)),
        )
        .expect("placement");

    rt.block_on(
        marketplace
            .bids
            .update_status(placement.bid.id(), BidStatus::Completed),
    )
    .expect("status update");
    rt.block_on(
        marketplace
            .catalogue
            .update_task(task.id(), TaskPatch::new().with_status(TaskStatus::Completed)),
    )
    .expect("task completion");

    let owner_stats = rt
        .block_on(marketplace.dashboard.dashboard_stats("owner@example.com"))
        .expect("owner stats");
    assert_eq!(owner_stats.completed_tasks, 1);
    assert_eq!(owner_stats.active_tasks, 0);

    let bidder_stats = rt
        .block_on(marketplace.dashboard.dashboard_stats("bidder@example.com"))
        .expect("bidder stats");
    assert_eq!(bidder_stats.earnings, 500);
}

/// Tests that bid history survives the bid's task being deleted.
#[rstest]
fn bid_history_tolerates_task_deletion(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");
    rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 500)),
    )
    .expect("placement");

    rt.block_on(marketplace.catalogue.delete_task(task.id()))
        .expect("deletion");

    let history = rt
        .block_on(marketplace.dashboard.bids_by_bidder("bidder@example.com"))
        .expect("history");
    assert_eq!(history.len(), 1);
    let entry = history.first().expect("history entry");
    assert_eq!(entry.bid.task_title(), "Logo design", "snapshot survives");
    assert!(entry.task.is_none());
}
