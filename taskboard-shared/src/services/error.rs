use crate::auth::{jwt::JwtError, middleware::AuthError, password::PasswordError};
use crate::models::task::{InvalidPriority, InvalidStatus};
use crate::store::StoreError;

/// Domain failures of the Auth and Task services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Signup with an email or username that is already registered
    #[error("User already exists")]
    Conflict,

    /// Login failed; deliberately silent about which field was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or badly-signed access token
    #[error("{0}")]
    Unauthorized(#[from] AuthError),

    /// Status outside {To Do, In Progress, Completed}
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Priority outside {Low, Medium, High}
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    /// A field failed a domain rule (e.g. empty title)
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// No task with this id is owned by the caller
    #[error("Task not found")]
    NotFound,

    /// Unexpected store or runtime failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub(crate) fn validation(field: &str, message: &str) -> Self {
        ServiceError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ServiceError::Conflict,
            StoreError::Database(e) => ServiceError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(format!("Token operation failed: {}", err))
    }
}

impl From<InvalidStatus> for ServiceError {
    fn from(err: InvalidStatus) -> Self {
        ServiceError::InvalidStatus(err.0)
    }
}

impl From<InvalidPriority> for ServiceError {
    fn from(err: InvalidPriority) -> Self {
        ServiceError::InvalidPriority(err.0)
    }
}
