/// List view: filter and sort the fetched tasks
///
/// Filtering keeps tasks matching both the status and the priority filter.
/// Sorting is stable, so tasks that compare equal keep their fetched order.
///
/// - [`SortKey::DueDate`]: earliest first, tasks without a due date last
/// - [`SortKey::Priority`]: High, then Medium, then Low
///
/// [`ListPage`] holds the fetched tasks together with the page-level error
/// shown when the initial fetch fails.

use std::cmp::Ordering;
use taskboard_shared::models::task::{Task, TaskPriority, TaskStatus};

use crate::api::{TaskboardClient, LOAD_FAILED_MESSAGE};

/// Status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

/// Priority filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(TaskPriority),
}

/// Sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
}

/// Filter and sort settings of the list page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListView {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortKey,
}

impl StatusFilter {
    fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl PriorityFilter {
    fn matches(self, priority: TaskPriority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => wanted == priority,
        }
    }
}

impl SortKey {
    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::DueDate => match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        }
    }
}

impl ListView {
    /// Tasks to display, in display order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut visible: Vec<&Task> = tasks
            .iter()
            .filter(|t| self.status.matches(t.status) && self.priority.matches(t.priority))
            .collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

/// State of the list page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub view: ListView,
    tasks: Vec<Task>,
    page_error: Option<String>,
}

impl ListPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks as fetched, unfiltered
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks to display under the current filters and sort
    pub fn visible(&self) -> Vec<&Task> {
        self.view.apply(&self.tasks)
    }

    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    /// Replaces the fetched list and clears any page error
    pub fn apply_remote_list(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.page_error = None;
    }

    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.page_error = Some(message.into());
    }

    /// Fetches the task list, setting the page error on failure
    pub async fn load(&mut self, client: &mut TaskboardClient) {
        match client.list_tasks().await {
            Ok(tasks) => self.apply_remote_list(tasks),
            Err(e) => {
                tracing::warn!(error = %e, "Task list fetch failed");
                self.set_load_error(LOAD_FAILED_MESSAGE);
            }
        }
    }
}
