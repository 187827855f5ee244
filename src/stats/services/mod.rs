//! Application services for dashboard aggregation.

mod dashboard;

pub use dashboard::{DashboardError, DashboardResult, DashboardService};
