//! The five list operations over a `StoreAdapter`.
//!
//! # Design
//! The service keeps no list state of its own. Every operation reads the
//! whole list, changes it in memory and writes the whole list back, so two
//! concurrent calls on the same key can lose one of the writes. Single-editor
//! use is assumed.

use std::sync::Arc;

use uuid::Uuid;

use crate::context::ListKey;
use crate::error::ServiceError;
use crate::store::{KeyValueStore, StoreAdapter};
use crate::types::{CreateTodo, DeleteTodo, Todo};

/// CRUD over todo lists stored in a key-value store.
#[derive(Clone)]
pub struct ListService {
    store: StoreAdapter,
}

/// Fresh random id: a v4 UUID in hyphenless hex. Not checked against the
/// ids already in the list.
fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl ListService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: StoreAdapter::new(store),
        }
    }

    pub async fn fetch_all(&self, key: &ListKey) -> Result<Vec<Todo>, ServiceError> {
        let todos = self.store.get(key).await?;
        tracing::debug!(list = %key, count = todos.len(), "fetched list");
        Ok(todos)
    }

    /// Append a new record with a generated id and return it.
    pub async fn create(&self, key: &ListKey, input: CreateTodo) -> Result<Todo, ServiceError> {
        let mut todos = self.store.get(key).await?;
        let todo = Todo {
            id: generate_id(),
            label: input.label,
            is_checked: input.is_checked,
        };
        todos.push(todo.clone());
        self.store.set(key, &todos).await?;
        tracing::info!(list = %key, id = %todo.id, "created todo");
        Ok(todo)
    }

    /// Replace the record with `input.id` by `input` verbatim. An unknown id
    /// leaves the list as it was, but the list is still written back.
    pub async fn update(&self, key: &ListKey, input: Todo) -> Result<Todo, ServiceError> {
        let mut todos = self.store.get(key).await?;
        let mut matched = false;
        for todo in todos.iter_mut().filter(|todo| todo.id == input.id) {
            *todo = input.clone();
            matched = true;
        }
        self.store.set(key, &todos).await?;
        if matched {
            tracing::info!(list = %key, id = %input.id, "updated todo");
        } else {
            tracing::debug!(list = %key, id = %input.id, "update matched no todo");
        }
        Ok(input)
    }

    /// Remove the record with `input.id` and echo the input back.
    pub async fn delete(&self, key: &ListKey, input: DeleteTodo) -> Result<DeleteTodo, ServiceError> {
        let mut todos = self.store.get(key).await?;
        let before = todos.len();
        todos.retain(|todo| todo.id != input.id);
        self.store.set(key, &todos).await?;
        tracing::info!(list = %key, id = %input.id, removed = before - todos.len(), "deleted todo");
        Ok(input)
    }

    /// Replace the list with an empty one, whatever it held.
    pub async fn delete_all(&self, key: &ListKey) -> Result<(), ServiceError> {
        self.store.set(key, &[]).await?;
        tracing::info!(list = %key, "deleted all todos");
        Ok(())
    }
}
