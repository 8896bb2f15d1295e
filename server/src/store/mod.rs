//! Persistence seam for the todo service.
//!
//! Handlers never talk to a database directly; they go through a
//! [`TodoStore`] so the service can run against memory in tests and
//! PostgreSQL in deployment.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::models::{Todo, TodoId, TodoPatch};

pub use memory::MemoryStore;
pub use postgres::{create_pool, health_check, run_migrations, PgTodoStore};

/// Data-access failures. Details are logged server-side, never sent to clients.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos, ascending by id.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Insert a new, not yet completed todo and return the stored row.
    async fn insert(&self, title: &str) -> StoreResult<Todo>;

    /// Apply the fields present in `patch` and refresh `updated_at`.
    /// Returns `None` when no todo has this id.
    async fn update(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<Option<Todo>>;
}
