//! HTTP service for a single `todos` collection.
//!
//! Routes:
//! - `GET  /todos`     → `200 { "todos": [..] }`
//! - `POST /todos`     → `201 { "todo": .. }`
//! - `PUT  /todos/{id}` → `200 { "todo": .. }` (partial update)
//! - `GET  /health`    → `200 { "status": "ok" }`

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTodo, TodoId, TodoPatch};
use crate::service::TodoService;
use crate::store::{MemoryStore, TodoStore};

/// Router backed by a fresh in-memory store.
pub fn app() -> Router {
    router(Arc::new(MemoryStore::new()))
}

/// Router backed by the given store, with request tracing.
pub fn router(store: Arc<dyn TodoStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(TodoService::new(store))
}

/// Serve the in-memory app on `listener` until the task is dropped.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_todos(State(service): State<TodoService>) -> AppResult<Json<Value>> {
    let todos = service.list().await?;
    Ok(Json(json!({ "todos": todos })))
}

async fn create_todo(
    State(service): State<TodoService>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(body) = body.map_err(json_rejection)?;
    let input = CreateTodo::from_json(&body)?;
    let todo = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "todo": todo }))))
}

async fn update_todo(
    State(service): State<TodoService>,
    id: Result<Path<TodoId>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Path(id) = id.map_err(|_| AppError::BadRequest("invalid todo id".into()))?;
    let Json(body) = body.map_err(json_rejection)?;
    let patch = TodoPatch::from_json(&body)?;
    let todo = service.update(id, patch).await?;
    Ok(Json(json!({ "todo": todo })))
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "rejected request body");
    AppError::BadRequest(format!("invalid JSON body: {}", rejection.body_text()))
}
