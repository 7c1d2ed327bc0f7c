/// Task Service
///
/// Owner-scoped CRUD over the task store. Status and priority arrive as raw
/// strings so an unrecognised value is reported as `InvalidStatus` /
/// `InvalidPriority` instead of a generic decoding failure, and is rejected
/// before anything is written.
///
/// Update and delete only reach tasks owned by the caller. Someone else's
/// task is reported as `NotFound`, the same as an id that does not exist.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::models::task::{NewTask, Task, TaskChanges, TaskPriority, TaskStatus};
use crate::store::TaskStore;

/// Fields supplied when creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to "To Do" when absent
    pub status: Option<String>,
    /// Defaults to "Medium" when absent
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Fields supplied when updating a task; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<NaiveDate>>,
}

fn parse_status(raw: Option<&str>) -> ServiceResult<Option<TaskStatus>> {
    raw.map(str::parse::<TaskStatus>).transpose().map_err(Into::into)
}

fn parse_priority(raw: Option<&str>) -> ServiceResult<Option<TaskPriority>> {
    raw.map(str::parse::<TaskPriority>).transpose().map_err(Into::into)
}

fn check_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::validation("title", "must not be empty"));
    }
    Ok(())
}

/// Task Service
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    /// Creates the service over a task store
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// All tasks owned by `caller`; an empty list is not an error
    pub async fn list(&self, caller: Uuid) -> ServiceResult<Vec<Task>> {
        let tasks = self.tasks.list_tasks(caller).await?;
        debug!(user_id = %caller, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Creates a task owned by `caller`
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` if the title is empty
    /// - `ServiceError::InvalidStatus` / `InvalidPriority` for unknown values
    pub async fn create(&self, caller: Uuid, fields: TaskFields) -> ServiceResult<Task> {
        check_title(&fields.title)?;
        let status = parse_status(fields.status.as_deref())?.unwrap_or_default();
        let priority = parse_priority(fields.priority.as_deref())?.unwrap_or_default();

        let task = self
            .tasks
            .insert_task(NewTask {
                owner_id: caller,
                title: fields.title,
                description: fields.description.unwrap_or_default(),
                status,
                priority,
                due_date: fields.due_date,
            })
            .await?;

        info!(user_id = %caller, task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Merges `patch` into one of the caller's tasks
    ///
    /// Validation happens before the store is touched, so a rejected update
    /// leaves the record unchanged.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidStatus` / `InvalidPriority` for unknown values
    /// - `ServiceError::Validation` if `title` is present but empty
    /// - `ServiceError::NotFound` if the caller owns no task with this id
    pub async fn update(&self, caller: Uuid, task_id: Uuid, patch: TaskPatch) -> ServiceResult<Task> {
        let status = parse_status(patch.status.as_deref())?;
        let priority = parse_priority(patch.priority.as_deref())?;
        if let Some(title) = &patch.title {
            check_title(title)?;
        }

        let changes = TaskChanges {
            title: patch.title,
            description: patch.description,
            status,
            priority,
            due_date: patch.due_date,
        };

        let task = self
            .tasks
            .update_task(caller, task_id, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!(user_id = %caller, task_id = %task_id, status = %task.status, "Task updated");
        Ok(task)
    }

    /// Deletes one of the caller's tasks
    ///
    /// # Errors
    ///
    /// `ServiceError::NotFound` if the caller owns no task with this id
    pub async fn delete(&self, caller: Uuid, task_id: Uuid) -> ServiceResult<()> {
        if !self.tasks.delete_task(caller, task_id).await? {
            return Err(ServiceError::NotFound);
        }

        info!(user_id = %caller, task_id = %task_id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (TaskService, MemoryStore) {
        let store = MemoryStore::new();
        (TaskService::new(Arc::new(store.clone())), store)
    }

    fn fields(title: &str) -> TaskFields {
        TaskFields {
            title: title.to_string(),
            status: Some("To Do".to_string()),
            priority: Some("High".to_string()),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() {
        let (tasks, _) = service();
        assert!(tasks.list(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let (tasks, _) = service();
        let owner = Uuid::new_v4();

        let created = tasks.create(owner, fields("Write report")).await.unwrap();
        assert_eq!(created.owner_id, owner);
        assert_eq!(created.title, "Write report");
        assert_eq!(created.status, TaskStatus::ToDo);
        assert_eq!(created.priority, TaskPriority::High);
        assert_eq!(created.description, "");

        assert_eq!(tasks.list(owner).await.unwrap(), vec![created.clone()]);

        tasks.delete(owner, created.id).await.unwrap();
        assert!(tasks.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_and_rejections() {
        let (tasks, _) = service();
        let owner = Uuid::new_v4();

        let bare = tasks
            .create(owner, TaskFields { title: "bare".to_string(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(bare.status, TaskStatus::ToDo);
        assert_eq!(bare.priority, TaskPriority::Medium);
        assert_eq!(bare.due_date, None);

        assert!(matches!(
            tasks.create(owner, fields("  ")).await,
            Err(ServiceError::Validation { field, .. }) if field == "title"
        ));

        let mut bad = fields("x");
        bad.status = Some("Archived".to_string());
        assert!(matches!(tasks.create(owner, bad).await, Err(ServiceError::InvalidStatus(s)) if s == "Archived"));

        let mut bad = fields("x");
        bad.priority = Some("Urgent".to_string());
        assert!(matches!(tasks.create(owner, bad).await, Err(ServiceError::InvalidPriority(_))));
    }

    #[tokio::test]
    async fn test_other_users_never_see_tasks() {
        let (tasks, _) = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        tasks.create(alice, fields("a1")).await.unwrap();
        tasks.create(alice, fields("a2")).await.unwrap();
        let bobs = tasks.create(bob, fields("b1")).await.unwrap();

        let listed = tasks.list(bob).await.unwrap();
        assert_eq!(listed, vec![bobs]);
        assert!(tasks.list(alice).await.unwrap().iter().all(|t| t.owner_id == alice));
    }

    #[tokio::test]
    async fn test_update_status_only() {
        let (tasks, _) = service();
        let owner = Uuid::new_v4();
        let created = tasks.create(owner, fields("Write report")).await.unwrap();

        let patch = TaskPatch {
            status: Some("In Progress".to_string()),
            ..Default::default()
        };
        let updated = tasks.update(owner, created.id, patch).await.unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.priority, created.priority);
        assert_eq!(updated.due_date, created.due_date);
    }

    #[tokio::test]
    async fn test_update_clears_due_date() {
        let (tasks, _) = service();
        let owner = Uuid::new_v4();
        let created = tasks.create(owner, fields("Write report")).await.unwrap();
        assert!(created.due_date.is_some());

        let patch = TaskPatch {
            due_date: Some(None),
            ..Default::default()
        };
        let updated = tasks.update(owner, created.id, patch).await.unwrap();

        assert_eq!(updated.due_date, None);
        assert_eq!(updated.title, created.title);
    }

    #[tokio::test]
    async fn test_any_status_transition_allowed() {
        let (tasks, _) = service();
        let owner = Uuid::new_v4();
        let created = tasks.create(owner, fields("t")).await.unwrap();

        for status in ["Completed", "To Do", "In Progress", "To Do", "Completed", "In Progress"] {
            let patch = TaskPatch {
                status: Some(status.to_string()),
                ..Default::default()
            };
            let updated = tasks.update(owner, created.id, patch).await.unwrap();
            assert_eq!(updated.status.as_str(), status);
        }
    }

    #[tokio::test]
    async fn test_invalid_status_leaves_record_unchanged() {
        let (tasks, store) = service();
        let owner = Uuid::new_v4();
        let created = tasks.create(owner, fields("Write report")).await.unwrap();

        let patch = TaskPatch {
            title: Some("changed".to_string()),
            status: Some("Archived".to_string()),
            ..Default::default()
        };
        let result = tasks.update(owner, created.id, patch).await;

        assert!(matches!(result, Err(ServiceError::InvalidStatus(s)) if s == "Archived"));
        assert_eq!(store.get_task_unscoped(created.id).await, Some(created));
    }

    #[tokio::test]
    async fn test_invalid_status_reported_before_not_found() {
        let (tasks, _) = service();
        let patch = TaskPatch {
            status: Some("Archived".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            tasks.update(Uuid::new_v4(), Uuid::new_v4(), patch).await,
            Err(ServiceError::InvalidStatus(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_require_ownership() {
        let (tasks, store) = service();
        let alice = Uuid::new_v4();
        let mallory = Uuid::new_v4();
        let created = tasks.create(alice, fields("private")).await.unwrap();

        let patch = TaskPatch {
            title: Some("pwned".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            tasks.update(mallory, created.id, patch).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(tasks.delete(mallory, created.id).await, Err(ServiceError::NotFound)));

        assert_eq!(store.get_task_unscoped(created.id).await, Some(created));
    }

    #[tokio::test]
    async fn test_unknown_id_not_found() {
        let (tasks, _) = service();
        let owner = Uuid::new_v4();
        assert!(matches!(
            tasks.update(owner, Uuid::new_v4(), TaskPatch::default()).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(tasks.delete(owner, Uuid::new_v4()).await, Err(ServiceError::NotFound)));
    }
}
