use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{MessageResponse, Todo, TodoPayload};
use crate::router::AppState;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
}

/// Liveness probe; touches no storage.
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let mut session = state.store.session().await?;
    let todos = session.list_all().await?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(payload): Json<TodoPayload>,
) -> Result<Json<Todo>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
    }

    let mut session = state.store.session().await?;
    let todo = session.create(&payload.title, payload.completed).await?;
    tracing::info!(id = todo.id, "todo created");
    Ok(Json(todo))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoPayload>,
) -> Result<Json<Todo>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
    }

    let mut session = state.store.session().await?;
    if session.get_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let todo = session.update(id, &payload.title, payload.completed).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.store.session().await?;
    if session.get_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    session.delete(id).await?;
    tracing::info!(id, "todo deleted");
    Ok(Json(MessageResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}
