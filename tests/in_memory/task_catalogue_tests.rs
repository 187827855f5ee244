//! In-memory integration tests for task catalogue operations.

use crate::in_memory::helpers::{deadline_in_days, marketplace, runtime, seed_task, Marketplace};
use rstest::rstest;
use std::io;
use tasktide::task::domain::{TaskFilter, TaskPatch, TaskStatus};
use tasktide::task::services::TaskCatalogueError;
use tokio::runtime::Runtime;

/// Tests that a created task comes back through listings with an empty
/// bidder set.
#[rstest]
fn created_task_is_listed_with_empty_bidder_set(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
    let rt = runtime.expect("runtime creation");
    let created = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    let listed = rt
        .block_on(marketplace.catalogue.list_tasks(&TaskFilter::new()))
        .expect("listing");

    assert_eq!(listed.len(), 1);
    let task = listed.first().expect("one task");
    assert_eq!(task.id(), created.id());
    assert_eq!(task.status(), TaskStatus::Active);
    assert!(task.bidders().is_empty());
    assert_eq!(task.bids_count(), 0);
}

/// Tests that patch updates merge into the stored task and bump the
/// update timestamp.
#[rstest]
fn update_merges_patch_into_stored_task(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let created = seed_task(&rt, &marketplace, "owner@example.com", "Logo design", "design", 3)
        .expect("task creation");

    let patch = TaskPatch::new()
        .with_title("Logo and brand guide")
        .with_budget(75_000)
        .with_status(TaskStatus::Completed);
    let updated = rt
        .block_on(marketplace.catalogue.update_task(created.id(), patch))
        .expect("update");

    assert_eq!(updated.title(), "Logo and brand guide");
    assert_eq!(updated.budget(), Some(75_000));
    assert_eq!(updated.status(), TaskStatus::Completed);
    assert_eq!(
        updated.description(),
        "seeded for integration coverage",
        "unpatched fields are preserved"
    );
    assert!(updated.updated_at() >= created.updated_at());

    let fetched = rt
        .block_on(marketplace.catalogue.get_task(created.id()))
        .expect("lookup");
    assert_eq!(fetched, updated);
}

/// Tests that the featured listing is capped and ordered by soonest
/// deadline.
#[rstest]
fn featured_listing_is_capped_and_deadline_ordered(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
    let rt = runtime.expect("runtime creation");
    for days_out in [9, 2, 7, 4, 8, 1, 6, 3] {
        seed_task(
            &rt,
            &marketplace,
            "owner@example.com",
            "Some piece of work",
            "design",
            days_out,
        )
        .expect("task creation");
    }

    let featured = rt
        .block_on(marketplace.catalogue.list_featured())
        .expect("featured listing");

    assert_eq!(featured.len(), 6);
    let deadlines: Vec<_> = featured.iter().map(|task| task.deadline()).collect();
    let mut sorted = deadlines.clone();
    sorted.sort();
    assert_eq!(deadlines, sorted);
    let soonest = featured.first().expect("soonest task");
    assert!(soonest.deadline() <= deadline_in_days(1));
}

/// Tests that deletion removes the task from listings and lookups.
#[rstest]
fn deleted_task_disappears_from_listings(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let doomed = seed_task(&rt, &marketplace, "owner@example.com", "Short-lived", "design", 3)
        .expect("task creation");
    let kept = seed_task(&rt, &marketplace, "owner@example.com", "Kept", "design", 4)
        .expect("task creation");

    rt.block_on(marketplace.catalogue.delete_task(doomed.id()))
        .expect("deletion");

    let listed = rt
        .block_on(marketplace.catalogue.list_tasks(&TaskFilter::new()))
        .expect("listing");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(tasktide::task::domain::Task::id), Some(kept.id()));

    let lookup = rt.block_on(marketplace.catalogue.get_task(doomed.id()));
    assert!(matches!(
        lookup,
        Err(TaskCatalogueError::Repository(_)),
    ));
}

/// Tests that the search filter matches case-insensitively on title and
/// description.
#[rstest]
fn search_filter_matches_title_and_description(
    runtime: io::Result<Runtime>,
    marketplace: Marketplace,
) {
    let rt = runtime.expect("runtime creation");
    seed_task(&rt, &marketplace, "owner@example.com", "Garden landscaping", "outdoors", 3)
        .expect("task creation");
    seed_task(&rt, &marketplace, "owner@example.com", "Copy editing", "writing", 4)
        .expect("task creation");

    let by_title = rt
        .block_on(
            marketplace
                .catalogue
                .list_tasks(&TaskFilter::new().with_search("LANDSCAP")),
        )
        .expect("title search");
    assert_eq!(by_title.len(), 1);

    let by_description = rt
        .block_on(
            marketplace
                .catalogue
                .list_tasks(&TaskFilter::new().with_search("integration coverage")),
        )
        .expect("description search");
    assert_eq!(by_description.len(), 2);

    let by_category = rt
        .block_on(
            marketplace
                .catalogue
                .list_tasks(&TaskFilter::new().with_category("writing")),
        )
        .expect("category filter");
    assert_eq!(by_category.len(), 1);
}

/// Tests that a blank owner identity is rejected before anything is
/// stored.
#[rstest]
fn blank_owner_identity_is_rejected(runtime: io::Result<Runtime>, marketplace: Marketplace) {
    let rt = runtime.expect("runtime creation");
    let result = seed_task(&rt, &marketplace, "   ", "Logo design", "design", 3);
    assert!(result.is_err());

    let listed = rt
        .block_on(marketplace.catalogue.list_tasks(&TaskFilter::new()))
        .expect("listing");
    assert!(listed.is_empty());
}
