//! Application services for task catalogue orchestration.

mod catalogue;

pub use catalogue::{
    CreateTaskRequest, TaskCatalogueError, TaskCatalogueResult, TaskCatalogueService,
    FEATURED_TASK_LIMIT,
};
