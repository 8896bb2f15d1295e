use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreResult, TodoStore};
use crate::models::{Todo, TodoId, TodoPatch};

#[derive(Debug)]
struct Inner {
    todos: BTreeMap<TodoId, Todo>,
    next_id: TodoId,
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                todos: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let inner = self.inner.read().await;
        Ok(inner.todos.values().cloned().collect())
    }

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let inner = self.inner.read().await;
        Ok(inner.todos.get(&id).cloned())
    }

    async fn insert(&self, title: &str) -> StoreResult<Todo> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let todo = Todo {
            id: inner.next_id,
            title: title.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        inner.next_id += 1;
        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<Option<Todo>> {
        let mut inner = self.inner.write().await;
        let Some(todo) = inner.todos.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            todo.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();
        Ok(Some(todo.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_sequential_and_listed_in_order() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store.insert(title).await.unwrap();
        }
        let ids: Vec<TodoId> = store.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let store = MemoryStore::new();
        let created = store.insert("Walk dog").await.unwrap();

        let patch = TodoPatch {
            title: None,
            completed: Some(true),
        };
        let updated = store.update(created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "Walk dog");
        assert!(updated.completed);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = MemoryStore::new();
        let patch = TodoPatch {
            title: Some("x".into()),
            completed: None,
        };
        assert!(store.update(42, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.insert("shared").await.unwrap();
        assert_eq!(other.list().await.unwrap().len(), 1);
    }
}
