use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreHealth, StoreResult, TaskStore, UserStore};
use crate::models::{
    task::{NewTask, Task, TaskChanges},
    user::{NewUser, User},
};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    tasks: HashMap<Uuid, Task>,
}

/// In-memory store
///
/// Cloning shares the same data. Uniqueness of username and email is checked
/// under the write lock, so concurrent signups cannot both succeed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Raw lookup by id, ignoring ownership (for tests and diagnostics)
    pub async fn get_task_unscoped(&self, id: Uuid) -> Option<Task> {
        self.inner.read().await.tasks.get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut guard = self.inner.write().await;

        if guard.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }
        if guard.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username".to_string()));
        }

        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        guard.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let guard = self.inner.read().await;
        Ok(guard.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>> {
        let guard = self.inner.read().await;
        Ok(guard
            .users
            .values()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let record = Task {
            id: Uuid::new_v4(),
            owner_id: task.owner_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: Utc::now(),
        };
        self.inner.write().await.tasks.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let guard = self.inner.read().await;
        let mut tasks: Vec<Task> = guard
            .tasks
            .values()
            .filter(|t| t.owner_id == owner)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn update_task(&self, owner: Uuid, id: Uuid, changes: TaskChanges) -> StoreResult<Option<Task>> {
        let mut guard = self.inner.write().await;
        match guard.tasks.get_mut(&id) {
            Some(task) if task.owner_id == owner => {
                changes.apply_to(task);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut guard = self.inner.write().await;
        let owned = guard.tasks.get(&id).is_some_and(|t| t.owner_id == owner);
        if owned {
            guard.tasks.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
