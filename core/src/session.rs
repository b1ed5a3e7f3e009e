//! Panel session: one list view bound to one backend.
//!
//! # Design
//! `TodoSession` is the state container a front-end owns. Edits go through
//! its methods and land in the view at once; `reconcile` then pushes whatever
//! is pending. The list sits behind a `tokio::sync::Mutex` that is never held
//! across a backend call, so edits made while a batch is out are not blocked.

use tokio::sync::Mutex;

use crate::backend::TodoBackend;
use crate::error::{ApiError, ReconcileError};
use crate::reconcile;
use crate::view::{Summary, TodoList, TodoView, ViewKey};

pub struct TodoSession<B> {
    backend: B,
    list: Mutex<TodoList>,
}

impl<B: TodoBackend> TodoSession<B> {
    /// Fetch the list once and start from it.
    pub async fn load(backend: B) -> Result<Self, ApiError> {
        let todos = backend.get_all().await?;
        tracing::debug!(count = todos.len(), "loaded list");
        Ok(Self {
            backend,
            list: Mutex::new(TodoList::from_todos(todos)),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn list(&self) -> &Mutex<TodoList> {
        &self.list
    }

    /// Copy of the current rows, in display order.
    pub async fn entries(&self) -> Vec<TodoView> {
        self.list.lock().await.entries().to_vec()
    }

    pub async fn summary(&self) -> Summary {
        self.list.lock().await.summary()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.list.lock().await.last_error().map(str::to_string)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<ViewKey> {
        self.list.lock().await.find_by_id(id)
    }

    pub async fn add(&self, label: impl Into<String>) -> ViewKey {
        self.list.lock().await.add(label)
    }

    pub async fn toggle(&self, key: ViewKey) -> bool {
        self.list.lock().await.toggle(key)
    }

    pub async fn rename(&self, key: ViewKey, label: impl Into<String>) -> bool {
        self.list.lock().await.rename(key, label)
    }

    pub async fn remove(&self, key: ViewKey) -> bool {
        self.list.lock().await.remove(key)
    }

    /// Push pending edits until the view is settled.
    pub async fn reconcile(&self) -> Result<usize, ReconcileError> {
        reconcile::reconcile(&self.list, &self.backend).await
    }

    /// Re-fetch the list, dropping any local state. Used to resync after a
    /// failed batch.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let todos = self.backend.get_all().await?;
        self.list.lock().await.replace_all(todos);
        Ok(())
    }

    /// Empty the list on the server, then in the view. The view is left
    /// untouched if the call fails.
    pub async fn delete_all(&self) -> Result<(), ApiError> {
        self.backend.delete_all().await?;
        self.list.lock().await.replace_all(Vec::new());
        tracing::debug!("deleted all todos");
        Ok(())
    }
}
