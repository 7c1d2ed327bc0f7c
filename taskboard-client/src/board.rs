/// Kanban board reducer
///
/// Three columns keyed by status, in "To Do", "In Progress", "Completed"
/// order. A drag is applied optimistically with [`Board::begin_move`], which
/// hands back a [`PendingMove`]. When the server answers, the move is either
/// reconciled with the server's record or rolled back to where the task was
/// picked up.
///
/// # Example
///
/// ```no_run
/// use taskboard_client::{api::TaskboardClient, board::Board, session::Session};
/// use taskboard_shared::models::task::TaskStatus;
///
/// # async fn example(task_id: uuid::Uuid) -> Result<(), taskboard_client::api::ClientError> {
/// let mut client = TaskboardClient::new("http://localhost:8080", Session::new())?;
/// let mut board = Board::new();
/// board.load(&mut client).await;
///
/// board.move_and_sync(&mut client, task_id, TaskStatus::Completed, 0).await?;
/// # Ok(())
/// # }
/// ```

use taskboard_shared::models::task::{Task, TaskStatus};
use uuid::Uuid;

use crate::api::{ClientError, TaskboardClient, LOAD_FAILED_MESSAGE};

/// Error type for board transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The dragged task is not on the board
    #[error("Task {0} is not on the board")]
    UnknownTask(Uuid),
}

/// An optimistic move waiting for the server's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    /// Task being moved
    pub task_id: Uuid,

    /// Column the task was picked up from
    pub from: TaskStatus,

    /// Position in that column
    pub from_index: usize,

    /// Column the task was dropped on
    pub to: TaskStatus,

    /// Record as it was before the move
    original: Task,
}

/// Kanban board state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    columns: [Vec<Task>; 3],
    page_error: Option<String>,
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in one column, top to bottom
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status.column()]
    }

    /// Total number of tasks on the board
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Page-level error set when the initial fetch failed
    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    /// Rebuilds the board from a fetched list, keeping the list's order
    /// within each column
    pub fn apply_remote_list(&mut self, tasks: Vec<Task>) {
        self.columns = Default::default();
        for task in tasks {
            self.columns[task.status.column()].push(task);
        }
        self.page_error = None;
    }

    /// Marks the page as failed to load
    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.page_error = Some(message.into());
    }

    /// Column and index of a task
    pub fn position(&self, task_id: Uuid) -> Option<(TaskStatus, usize)> {
        TaskStatus::ALL.into_iter().find_map(|status| {
            self.column(status)
                .iter()
                .position(|t| t.id == task_id)
                .map(|index| (status, index))
        })
    }

    /// Applies a drag immediately
    ///
    /// Returns `Ok(None)` when the task is dropped back where it was. An
    /// index past the end of the target column appends.
    ///
    /// # Errors
    ///
    /// `BoardError::UnknownTask` if the task is not on the board.
    pub fn begin_move(
        &mut self,
        task_id: Uuid,
        to: TaskStatus,
        to_index: usize,
    ) -> Result<Option<PendingMove>, BoardError> {
        let (from, from_index) = self.position(task_id).ok_or(BoardError::UnknownTask(task_id))?;
        if from == to && from_index == to_index {
            return Ok(None);
        }

        let original = self.columns[from.column()].remove(from_index);
        let mut moved = original.clone();
        moved.status = to;

        let target = &mut self.columns[to.column()];
        let index = to_index.min(target.len());
        target.insert(index, moved);

        tracing::debug!(task_id = %task_id, from = %from, to = %to, "Optimistic move");
        Ok(Some(PendingMove {
            task_id,
            from,
            from_index,
            to,
            original,
        }))
    }

    /// Replaces the locally moved record with the server's copy
    ///
    /// The task stays where it was dropped unless the server reports a
    /// different status, in which case it is appended to that column.
    pub fn reconcile(&mut self, pending: PendingMove, server_task: Task) {
        match self.take(pending.task_id) {
            Some((status, index)) if status == server_task.status => {
                self.columns[status.column()].insert(index, server_task);
            }
            _ => self.columns[server_task.status.column()].push(server_task),
        }
    }

    /// Undoes an optimistic move, restoring the task's original column,
    /// index and field values
    pub fn rollback(&mut self, pending: PendingMove) {
        self.take(pending.task_id);

        let column = &mut self.columns[pending.from.column()];
        let index = pending.from_index.min(column.len());
        column.insert(index, pending.original);

        tracing::debug!(task_id = %pending.task_id, to = %pending.from, "Rolled back move");
    }

    /// Fetches the task list, setting the page error on failure
    pub async fn load(&mut self, client: &mut TaskboardClient) {
        match client.list_tasks().await {
            Ok(tasks) => self.apply_remote_list(tasks),
            Err(e) => {
                tracing::warn!(error = %e, "Initial task fetch failed");
                self.set_load_error(LOAD_FAILED_MESSAGE);
            }
        }
    }

    /// Optimistic move followed by the status update, reconciled on success
    /// and rolled back on failure
    ///
    /// # Errors
    ///
    /// The client error that caused the rollback, or `ClientError::Board`
    /// for a task that is not on the board (no request is sent).
    pub async fn move_and_sync(
        &mut self,
        client: &mut TaskboardClient,
        task_id: Uuid,
        to: TaskStatus,
        to_index: usize,
    ) -> Result<(), ClientError> {
        let Some(pending) = self.begin_move(task_id, to, to_index)? else {
            return Ok(());
        };

        match client.move_task(task_id, to).await {
            Ok(server_task) => {
                self.reconcile(pending, server_task);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Move failed; rolling back");
                self.rollback(pending);
                Err(e)
            }
        }
    }

    fn take(&mut self, task_id: Uuid) -> Option<(TaskStatus, usize)> {
        let (status, index) = self.position(task_id)?;
        self.columns[status.column()].remove(index);
        Some((status, index))
    }
}
