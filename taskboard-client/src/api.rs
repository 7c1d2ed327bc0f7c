/// HTTP client for the Taskboard API
///
/// Wraps `reqwest` and a [`Session`]. Calls that need authentication fail
/// locally with [`ClientError::NotAuthenticated`] when the session has no
/// valid token, without touching the network. A 401 from the server clears
/// the session.
///
/// # Example
///
/// ```no_run
/// use taskboard_client::api::{NewTaskInput, TaskboardClient};
/// use taskboard_client::session::Session;
///
/// # async fn example() -> Result<(), taskboard_client::api::ClientError> {
/// let mut client = TaskboardClient::new("http://localhost:8080", Session::new())?;
/// client.signup("alice", "alice@example.com", "pw123").await?;
/// client.login("alice@example.com", "pw123").await?;
///
/// let task = client.create_task(&NewTaskInput::titled("Write report")).await?;
/// println!("created {}", task.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use taskboard_shared::models::task::{Task, TaskPriority, TaskStatus};
use uuid::Uuid;

use crate::{board::BoardError, session::Session};

/// Lifetime assumed when the server does not report an expiry
const FALLBACK_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Page-level message shown when the initial task fetch fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch tasks";

/// Error type for client calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No valid token in the session; the view should redirect to login
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The server answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL could not be used
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Local board state rejected the operation; nothing was sent
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Body for creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskInput {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

impl NewTaskInput {
    /// Creation-form defaults: empty description, "To Do", "Medium", no due date
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
        }
    }
}

/// Partial update; `None` fields are not sent, `due_date: Some(None)` sends
/// `null` and clears the date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskUpdate {
    /// Status-only update, as sent by a kanban move
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    user_id: Uuid,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Taskboard API client
#[derive(Debug)]
pub struct TaskboardClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl TaskboardClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8080`)
    ///
    /// # Errors
    ///
    /// `ClientError::InvalidBaseUrl` if the URL does not parse.
    pub fn new(base_url: &str, session: Session) -> ClientResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the session (e.g. to check `requires_login`)
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Registers an account; no token is issued
    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> ClientResult<String> {
        let request = self.request(Method::POST, "/api/auth/signup").json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        let body: MessageBody = self.send(request).await?;
        Ok(body.message.unwrap_or_default())
    }

    /// Logs in and stores the issued token in the session
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<Uuid> {
        let request = self.request(Method::POST, "/api/auth/login").json(&serde_json::json!({
            "email": email,
            "password": password,
        }));
        let body: LoginResponse = self.send(request).await?;

        let expires_at = body
            .expires_at
            .unwrap_or_else(|| Utc::now() + Duration::seconds(FALLBACK_TOKEN_LIFETIME_SECS));
        self.session.store(body.token, body.user_id, expires_at);

        tracing::info!(user_id = %body.user_id, "Logged in");
        Ok(body.user_id)
    }

    /// Drops the local token
    pub fn logout(&mut self) {
        self.session.clear();
        tracing::info!("Logged out");
    }

    /// Lists the caller's tasks
    pub async fn list_tasks(&mut self) -> ClientResult<Vec<Task>> {
        let request = self.authed(Method::GET, "/api/tasks")?;
        self.send(request).await
    }

    /// Creates a task
    pub async fn create_task(&mut self, input: &NewTaskInput) -> ClientResult<Task> {
        let request = self.authed(Method::POST, "/api/tasks")?.json(input);
        self.send(request).await
    }

    /// Applies a partial update
    pub async fn update_task(&mut self, id: Uuid, update: &TaskUpdate) -> ClientResult<Task> {
        let request = self
            .authed(Method::PUT, &format!("/api/tasks/{}", id))?
            .json(update);
        self.send(request).await
    }

    /// Moves a task to another kanban column (status-only update)
    pub async fn move_task(&mut self, id: Uuid, status: TaskStatus) -> ClientResult<Task> {
        self.update_task(id, &TaskUpdate::status(status)).await
    }

    /// Deletes a task
    pub async fn delete_task(&mut self, id: Uuid) -> ClientResult<()> {
        let request = self.authed(Method::DELETE, &format!("/api/tasks/{}", id))?;
        let _: MessageBody = self.send(request).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authed(&mut self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self
            .session
            .token()
            .ok_or(ClientError::NotAuthenticated)?
            .to_string();
        Ok(self
            .request(method, path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token)))
    }

    async fn send<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.ensure_ok(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn ensure_ok(&mut self, response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Server rejected the session token; clearing session");
            self.session.clear();
        }

        let message = match response.json::<MessageBody>().await {
            Ok(MessageBody { message: Some(message) }) => message,
            _ => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_update_serializes_only_present_fields() {
        let body = serde_json::to_value(TaskUpdate::status(TaskStatus::InProgress)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "In Progress" }));

        let body = serde_json::to_value(TaskUpdate {
            due_date: Some(NaiveDate::from_ymd_opt(2025, 1, 1)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "dueDate": "2025-01-01" }));

        let body = serde_json::to_value(TaskUpdate {
            due_date: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "dueDate": null }));
    }

    #[test]
    fn test_new_task_defaults() {
        let body = serde_json::to_value(NewTaskInput::titled("x")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "title": "x",
                "description": "",
                "status": "To Do",
                "priority": "Medium",
                "dueDate": null
            })
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            TaskboardClient::new("not a url", Session::new()),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_authed_calls_fail_locally_without_session() {
        // Nothing listens on this port; a network attempt would be an Http error.
        let mut client = TaskboardClient::new("http://127.0.0.1:9", Session::new()).unwrap();

        assert!(matches!(client.list_tasks().await, Err(ClientError::NotAuthenticated)));
        assert!(matches!(
            client.move_task(Uuid::new_v4(), TaskStatus::Completed).await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.delete_task(Uuid::new_v4()).await,
            Err(ClientError::NotAuthenticated)
        ));
    }
}
