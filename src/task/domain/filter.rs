//! Catalogue listing filter.

use super::{Task, TaskStatus};

/// Optional predicates applied when listing tasks.
///
/// All set predicates must match. `search` is a case-insensitive substring
/// match over the title OR the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    category: Option<String>,
    search: Option<String>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to one lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to one category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts results to tasks whose title or description contains the
    /// given text, case-insensitively.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns the status predicate, if set.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the category predicate, if set.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the search term, if set.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Evaluates the filter against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status() != status) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| task.category() != category)
        {
            return false;
        }
        self.search.as_deref().is_none_or(|term| {
            let needle = term.to_lowercase();
            task.title().to_lowercase().contains(&needle)
                || task.description().to_lowercase().contains(&needle)
        })
    }
}
