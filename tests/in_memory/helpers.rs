//! Shared test helpers for in-memory integration tests.

use std::io;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use tasktide::bid::adapters::memory::InMemoryBidRepository;
use tasktide::bid::services::BidLedgerService;
use tasktide::stats::services::DashboardService;
use tasktide::task::adapters::memory::InMemoryTaskRepository;
use tasktide::task::domain::Task;
use tasktide::task::services::{CreateTaskRequest, TaskCatalogueService};
use tokio::runtime::Runtime;

/// Fully wired marketplace core over shared in-memory repositories.
pub struct Marketplace {
    /// Task repository handle shared by every service.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Bid repository handle shared by every service.
    pub bids: Arc<InMemoryBidRepository>,
    /// Task catalogue service.
    pub catalogue: TaskCatalogueService<InMemoryTaskRepository, DefaultClock>,
    /// Bid ledger service.
    pub ledger: BidLedgerService<InMemoryTaskRepository, InMemoryBidRepository, DefaultClock>,
    /// Dashboard aggregation service.
    pub dashboard: DashboardService<InMemoryTaskRepository, InMemoryBidRepository>,
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a marketplace core wired over fresh repositories.
#[fixture]
pub fn marketplace() -> Marketplace {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let bids = Arc::new(InMemoryBidRepository::new());
    let clock = Arc::new(DefaultClock);

    let catalogue = TaskCatalogueService::new(Arc::clone(&tasks), Arc::clone(&clock));
    let ledger = BidLedgerService::new(Arc::clone(&tasks), Arc::clone(&bids), Arc::clone(&clock));
    let dashboard = DashboardService::new(Arc::clone(&tasks), Arc::clone(&bids));

    Marketplace {
        tasks,
        bids,
        catalogue,
        ledger,
        dashboard,
    }
}

/// Deadline helper anchored a few days out.
#[must_use]
pub fn deadline_in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Creates an active task through the catalogue service.
///
/// # Errors
///
/// Returns an error when task creation fails.
pub fn seed_task(
    rt: &Runtime,
    marketplace: &Marketplace,
    owner: &str,
    title: &str,
    category: &str,
    days_out: i64,
) -> eyre::Result<Task> {
    let request = CreateTaskRequest::new(owner, title, deadline_in_days(days_out))
        .with_description("seeded for integration coverage")
        .with_category(category);
    Ok(rt.block_on(marketplace.catalogue.create_task(request))?)
}
