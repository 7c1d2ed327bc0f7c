/// Task endpoints
///
/// Every handler runs behind the JWT layer and acts only on the caller's own
/// tasks. A task id that does not parse, does not exist, or belongs to someone
/// else is answered with `404 Not Found`.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List the caller's tasks
/// - `POST /api/tasks` - Create a task
/// - `PUT /api/tasks/:id` - Partially update a task
/// - `DELETE /api/tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{auth::MessageResponse, ApiJson},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::task::Task,
    services::tasks::{TaskFields, TaskPatch},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
///
/// Unknown fields are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    /// "To Do" when absent
    pub status: Option<String>,

    /// "Medium" when absent
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "optional_date")]
    pub due_date: Option<NaiveDate>,
}

/// Update task request; absent fields are left unchanged
///
/// `dueDate: null` or `""` clears the due date.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<String>,

    pub priority: Option<String>,

    #[serde(default, deserialize_with = "clearable_date")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl From<CreateTaskRequest> for TaskFields {
    fn from(req: CreateTaskRequest) -> Self {
        TaskFields {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskPatch {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

/// Accepts `null`, `""`, `YYYY-MM-DD`, or an RFC 3339 timestamp (its date
/// part is kept).
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid dueDate: {}", raw)))
}

/// Like `optional_date`, but keeps "present and empty" apart from "absent"
fn clearable_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_date(deserializer).map(Some)
}

/// Unparseable ids are reported exactly like missing tasks
fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

/// List the caller's tasks
///
/// # Response
///
/// `200 OK` with a JSON array of tasks (possibly empty), oldest first.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(auth.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
///
/// {
///   "title": "Write report",
///   "description": "Q3 numbers",
///   "status": "To Do",
///   "priority": "High",
///   "dueDate": "2025-01-01"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unknown status or priority
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    let task = state.tasks.create(auth.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Merge the supplied fields into one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Unknown status or priority (task left unchanged)
/// - `404 Not Found`: No such task owned by the caller
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task_id = parse_task_id(&id)?;
    req.validate()?;
    let task = state.tasks.update(auth.user_id, task_id, req.into()).await?;
    Ok(Json(task))
}

/// Delete one of the caller's tasks
///
/// # Errors
///
/// - `404 Not Found`: No such task owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = parse_task_id(&id)?;
    state.tasks.delete(auth.user_id, task_id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
