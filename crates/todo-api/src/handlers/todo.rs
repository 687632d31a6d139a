use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_core::{normalize_title, StatusFilter, Task, TaskPatch};

use crate::{error::ApiError, state::ApiState};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

impl From<Task> for TodoResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<UpdateTodoRequest> for TaskPatch {
    fn from(request: UpdateTodoRequest) -> Self {
        TaskPatch {
            title: request.title,
            completed: request.completed,
        }
    }
}

/// Create a todo
pub async fn create_todo(
    State(state): State<ApiState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let Json(payload) = payload?;
    let title = normalize_title(&payload.title)?;

    let task = state.store.create_task(&title).await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// List todos, newest first, optionally filtered by `?status=`
pub async fn list_todos(
    State(state): State<ApiState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let Query(params) = query?;
    let filter = match params.status.as_deref() {
        Some(status) => status.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };

    let tasks = state.store.list_tasks(filter).await?;
    tracing::debug!("Listing {} todos (status={})", tasks.len(), filter);

    Ok(Json(tasks.into_iter().map(TodoResponse::from).collect()))
}

/// `PATCH /todos/completed` names the bulk route, not a todo id
pub async fn reject_completed_id() -> ApiError {
    ApiError::Validation("Invalid todo id: completed".to_string())
}

/// Partially update a todo
pub async fn update_todo(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let Path(todo_id) = path?;
    let Json(payload) = payload?;

    let todo = find_todo(&state, todo_id).await?;
    let patch = TaskPatch::from(payload);
    let task = state.store.update_task(todo.id, &patch).await?;

    Ok(Json(task.into()))
}

/// Flip a todo between active and completed
pub async fn toggle_todo(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let Path(todo_id) = path?;

    let todo = find_todo(&state, todo_id).await?;
    let task = state.store.toggle_task(todo.id).await?;

    Ok(Json(task.into()))
}

/// Delete a single todo
pub async fn delete_todo(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(todo_id) = path?;

    let todo = find_todo(&state, todo_id).await?;
    state.store.delete_task(todo.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every completed todo
pub async fn delete_completed(
    State(state): State<ApiState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.store.clear_completed().await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Delete every todo
pub async fn delete_all(State(state): State<ApiState>) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.store.clear_all().await?;
    Ok(Json(DeletedResponse { deleted }))
}

async fn find_todo(state: &ApiState, todo_id: i64) -> Result<Task, ApiError> {
    state
        .store
        .get_task(todo_id)
        .await?
        .ok_or(ApiError::NotFound)
}
