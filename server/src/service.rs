//! Todo use cases: list, create and partial update.
//!
//! The service owns validation and the no-op rule for empty patches;
//! persistence is delegated to whichever [`TodoStore`] it was built with.

use std::sync::Arc;

use crate::models::{CreateTodo, Todo, TodoId, TodoPatch};
use crate::store::{StoreError, TodoStore};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing input. `field` names the offending member.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("todo {0} not found")]
    NotFound(TodoId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.store.list().await?)
    }

    pub async fn create(&self, input: CreateTodo) -> ServiceResult<Todo> {
        let todo = self.store.insert(&input.title).await?;
        tracing::debug!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Apply a partial update. An empty patch writes nothing and returns
    /// the todo as currently stored.
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> ServiceResult<Todo> {
        if patch.is_empty() {
            return self.store.find(id).await?.ok_or(ServiceError::NotFound(id));
        }
        let todo = self
            .store
            .update(id, &patch)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        tracing::debug!(id, "todo updated");
        Ok(todo)
    }
}
