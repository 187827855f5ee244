//! In-memory integration tests for bid placement and reconciliation.

use crate::in_memory::helpers::{marketplace, runtime, seed_task, Marketplace};
use chrono::Utc;
use rstest::rstest;
use std::io;
use tasktide::bid::domain::BidStatus;
use tasktide::bid::ports::BidRepository;
use tasktide::bid::services::{BidLedgerError, PlaceBidRequest};
use tasktide::identity::EmailAddress;
use tasktide::task::ports::TaskRepository;
use tokio::runtime::Runtime;

/// Tests that placing a bid creates a pending record and registers the
/// bidder on the task in one operation.
#[rstest]
fn placed_bid_is_pending_and_registers_bidder(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
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
    assert_eq!(placement.bid.amount().value(), 500);
    assert_eq!(placement.bid.task_title(), "Logo design");
    assert_eq!(placement.task.bids_count(), 1);
    let bidder = EmailAddress::new("bidder@example.com").expect("valid identity");
    assert!(placement.task.has_bidder(&bidder));
}

/// Tests that a second bid from the same bidder on the same task is
/// rejected and leaves the count untouched.
#[rstest]
fn repeated_bid_on_same_task_is_rejected(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 500)),
    )
    .expect("first placement");

    let second = rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 650)),
    );
    assert!(matches!(second, Err(BidLedgerError::DuplicateBid { .. })));

    let stored = rt
        .block_on(marketplace.tasks.find_by_id(task.id()))
        .expect("lookup")
        .expect("task present");
    assert_eq!(stored.bids_count(), 1);
    assert_eq!(stored.bidders().len(), 1);
}

/// Tests that a bid from a different bidder on the same task succeeds.
#[rstest]
fn distinct_bidders_share_a_task(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "first@example.com", 500)),
    )
    .expect("first placement");
    let second = rt
        .block_on(
            marketplace
                .ledger
                .place_bid(PlaceBidRequest::new(task.id(), "second@example.com", 650)),
        )
        .expect("second placement");

    assert_eq!(second.task.bids_count(), 2);
}

/// Tests that marking interest registers the bidder without creating a
/// bid record, and that a later full bid from the same bidder still
/// creates its record without double-counting.
#[rstest]
fn interest_then_bid_converges_to_one_registration(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");
    let bidder = EmailAddress::new("keen@example.com").expect("valid identity");

    let after_interest = rt
        .block_on(marketplace.ledger.mark_interest(task.id(), "keen@example.com"))
        .expect("interest");
    assert_eq!(after_interest.bids_count(), 1);
    let bid_records = rt
        .block_on(marketplace.bids.bidders_for_task(task.id()))
        .expect("bidder listing");
    assert!(bid_records.is_empty(), "interest leaves no bid record");

    let placement = rt
        .block_on(
            marketplace
                .ledger
                .place_bid(PlaceBidRequest::new(task.id(), "keen@example.com", 500)),
        )
        .expect("placement after interest");

    assert_eq!(placement.task.bids_count(), 1);
    assert!(placement.task.has_bidder(&bidder));
    assert!(rt
        .block_on(marketplace.bids.exists(task.id(), &bidder))
        .expect("exists check"));
}

/// Tests that marking interest twice reports a duplicate.
#[rstest]
fn repeated_interest_is_rejected(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    rt.block_on(marketplace.ledger.mark_interest(task.id(), "keen@example.com"))
        .expect("first interest");
    let second = rt.block_on(marketplace.ledger.mark_interest(task.id(), "keen@example.com"));
    assert!(matches!(second, Err(BidLedgerError::DuplicateBid { .. })));
}

/// Tests that reconciliation restores a task-side bidder set that
/// drifted away from the bids collection, while preserving
/// interest-only registrations.
#[rstest]
fn reconciliation_repairs_drifted_bidder_set(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
    let rt = runtime.expect("runtime creation");
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 500)),
    )
    .expect("placement");
    rt.block_on(marketplace.ledger.mark_interest(task.id(), "keen@example.com"))
        .expect("interest");

    // Simulate the drift window after a partial placement by blowing the
    // task-side set away entirely.
    rt.block_on(marketplace.tasks.replace_bidders(task.id(), &[], Utc::now()))
        .expect("drift injection");

    let repaired = rt
        .block_on(marketplace.ledger.reconcile_bids_count(task.id()))
        .expect("reconciliation");

    let bidder = EmailAddress::new("bidder@example.com").expect("valid identity");
    assert_eq!(repaired.bids_count(), 1);
    assert!(repaired.has_bidder(&bidder));

    // Interest-only registrations survive when still present task-side.
    let keen = EmailAddress::new("keen@example.com").expect("valid identity");
    let with_interest = rt
        .block_on(marketplace.tasks.replace_bidders(task.id(), &[keen.clone()], Utc::now()))
        .expect("interest-only baseline");
    assert_eq!(with_interest.bids_count(), 1);
    let reconciled = rt
        .block_on(marketplace.ledger.reconcile_bids_count(task.id()))
        .expect("second reconciliation");
    assert_eq!(reconciled.bids_count(), 2);
    assert!(reconciled.has_bidder(&keen));
    assert!(reconciled.has_bidder(&bidder));
}

/// Tests that a stale aggregate pushed through the update path cannot
/// clobber a bid registration that happened after the aggregate was read.
#[rstest]
fn stale_update_preserves_registered_bidders(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
    let rt = runtime.expect("runtime creation");
    // `task` is the pre-bid aggregate: empty bidder set, zero count.
    let task = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(task.id(), "bidder@example.com", 500)),
    )
    .expect("placement");

    rt.block_on(marketplace.tasks.update(&task))
        .expect("stale update");

    let stored = rt
        .block_on(marketplace.tasks.find_by_id(task.id()))
        .expect("lookup")
        .expect("task present");
    assert_eq!(stored.bids_count(), 1);
    assert_eq!(stored.bidders().len(), 1);
}

/// Tests that bids against a missing task are refused outright.
#[rstest]
fn bid_on_missing_task_is_refused(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let phantom = tasktide::task::domain::TaskId::new();

    let result = rt.block_on(
        marketplace
            .ledger
            .place_bid(PlaceBidRequest::new(phantom, "bidder@example.com", 500)),
    );
    assert!(matches!(result, Err(BidLedgerError::TaskNotFound(id)) if id == phantom));
}
