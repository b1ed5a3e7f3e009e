//! Key-value storage seam and the typed adapter over it.
//!
//! # Design
//! `KeyValueStore` stands in for the host platform's storage API: one JSON
//! value per key, whole-value reads and writes, no partial updates.
//! `StoreAdapter` is the only code that knows a list is stored as a JSON
//! array of `Todo`; an absent key reads as an empty list.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::context::ListKey;
use crate::types::Todo;

/// Errors surfaced by a store. The service passes them through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not complete the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The value stored under a key is not a list of todos.
    #[error("stored value for '{key}' is not a todo list: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A list could not be encoded for writing.
    #[error("failed to encode todo list for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Asynchronous key-value store holding one JSON value per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the whole value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Typed view of a `KeyValueStore` as a set of todo lists.
#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn KeyValueStore>,
}

impl StoreAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the list stored under `key`, or an empty list if nothing is stored.
    pub async fn get(&self, key: &ListKey) -> Result<Vec<Todo>, StoreError> {
        match self.store.get(key.as_str()).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Replace the list stored under `key`.
    pub async fn set(&self, key: &ListKey, todos: &[Todo]) -> Result<(), StoreError> {
        let value = serde_json::to_value(todos).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key.as_str(), value).await
    }
}
