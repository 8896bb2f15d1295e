//! PostgreSQL-backed store for the `todos` table.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{StoreResult, TodoStore};
use crate::models::{Todo, TodoId, TodoPatch};

/// Column list for `todos` queries.
const COLUMNS: &str = "id, title, completed, created_at, updated_at";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Round-trip a trivial query to confirm the pool can reach the server.
pub async fn health_check(pool: &PgPool) -> StoreResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `server/migrations`.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let query = format!("SELECT {COLUMNS} FROM todos ORDER BY id ASC");
        let todos = sqlx::query_as::<_, Todo>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        let todo = sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn insert(&self, title: &str) -> StoreResult<Todo> {
        let query = format!(
            "INSERT INTO todos (title, completed) VALUES ($1, FALSE) RETURNING {COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&query)
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<Option<Todo>> {
        let query = format!(
            "UPDATE todos SET \
                title = COALESCE($1, title), \
                completed = COALESCE($2, completed), \
                updated_at = NOW() \
             WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&query)
            .bind(patch.title.as_deref())
            .bind(patch.completed)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }
}
