/// Storage traits and backends
///
/// Services talk to persistence only through [`UserStore`] and [`TaskStore`].
/// Two backends implement both:
///
/// - [`PgStore`]: PostgreSQL via sqlx, delegating to the model queries
/// - [`MemoryStore`]: in-process maps, for tests and local runs
///
/// Each operation is one atomic write against one record. There are no
/// cross-record transactions and concurrent writers follow last-write-wins.
///
/// # Example
///
/// ```
/// use taskboard_shared::store::{MemoryStore, TaskStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), taskboard_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let tasks = store.list_tasks(Uuid::new_v4()).await?;
/// assert!(tasks.is_empty());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    task::{NewTask, Task, TaskChanges},
    user::{NewUser, User},
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field (username or email) is already taken
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    /// Backend failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; fails with `Duplicate` if username or email is taken
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    /// Looks a user up by exact email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Returns any user holding this email or this username
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>>;
}

/// Task store
///
/// Every method is scoped to `owner`; tasks owned by anyone else are invisible.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task and returns it with its assigned id and creation time
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task>;

    /// Lists the owner's tasks, oldest first
    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>>;

    /// Merges changes into one of the owner's tasks; `None` if not found
    async fn update_task(&self, owner: Uuid, id: Uuid, changes: TaskChanges) -> StoreResult<Option<Task>>;

    /// Deletes one of the owner's tasks; false if not found
    async fn delete_task(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// Health probe for the backing store
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Short backend name ("postgres", "memory")
    fn backend(&self) -> &'static str;

    /// True when the backend answered a trivial request
    async fn is_healthy(&self) -> bool;
}

/// Everything the API needs from a backend
pub trait Store: UserStore + TaskStore + StoreHealth {}

impl<T> Store for T where T: UserStore + TaskStore + StoreHealth {}
