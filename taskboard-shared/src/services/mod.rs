/// Business logic
///
/// - [`auth`]: Auth Service (signup, login, authenticate)
/// - [`tasks`]: Task Service (owner-scoped CRUD with status validation)
///
/// Both services depend on the [`crate::store`] traits only, and report
/// failures as [`ServiceError`], which the API layer translates to HTTP.

pub mod auth;
mod error;
pub mod tasks;

pub use auth::AuthService;
pub use error::{ServiceError, ServiceResult};
pub use tasks::TaskService;
