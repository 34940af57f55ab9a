/// Task endpoints
///
/// All handlers operate inside the current user's collection: the resolved
/// [`Principal`] scopes every store call, so a task id belonging to someone
/// else is simply not found. Destroy soft-deletes; no handler here ever
/// removes a row.
///
/// # Endpoints
///
/// - `GET    /v1/tasks` - List the current user's active tasks
/// - `POST   /v1/tasks` - Create a task
/// - `GET    /v1/tasks/:id` - Show one task
/// - `PATCH  /v1/tasks/:id` - Update title/completed
/// - `DELETE /v1/tasks/:id` - Soft-delete a task

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskbox_shared::auth::authenticator::Principal;
use taskbox_shared::models::task::{CreateTask, Task, UpdateTask};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "can't be blank"))]
    pub title: String,

    /// Completion flag (defaults to false)
    #[serde(default)]
    pub completed: bool,
}

/// Update task request
///
/// Only present fields are changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, message = "can't be blank"))]
    pub title: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Lists the current user's active tasks
///
/// Pure read; soft-deleted tasks never appear.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db, principal.user_id).await?;

    Ok(Json(tasks))
}

/// Shows one of the current user's tasks
///
/// # Errors
///
/// - `404 Not Found`: id absent, soft-deleted, or owned by another user
pub async fn show_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find(&state.db, principal.user_id, id).await?;

    Ok(Json(task))
}

/// Creates a task owned by the current user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: blank title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        principal.user_id,
        CreateTask {
            title: req.title,
            completed: req.completed,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Updates one of the current user's tasks
///
/// # Errors
///
/// - `404 Not Found`: id absent, soft-deleted, or owned by another user
/// - `422 Unprocessable Entity`: blank title
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::update(
        &state.db,
        principal.user_id,
        id,
        UpdateTask {
            title: req.title,
            completed: req.completed,
        },
    )
    .await?;

    Ok(Json(task))
}

/// Soft-deletes one of the current user's tasks
///
/// The task is resolved within the owner's collection first, then marked
/// deleted. Once resolved, the delete itself cannot fail validation.
///
/// # Errors
///
/// - `404 Not Found`: id absent, already soft-deleted, or owned by another
///   user
pub async fn destroy_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let task = Task::find(&state.db, principal.user_id, id).await?;
    Task::soft_delete(&state.db, task.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
