//! In-memory backend for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::backend::TodoBackend;
use crate::error::ApiError;
use crate::types::{CreateTodo, DeleteTodo, Todo};

/// Behaves like the resolver over a single list.
#[derive(Default)]
pub(crate) struct FakeBackend {
    todos: Mutex<Vec<Todo>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    failing: Mutex<Option<&'static str>>,
}

impl FakeBackend {
    pub(crate) fn seeded(entries: &[(&str, &str)]) -> Self {
        let backend = Self::default();
        *backend.todos.lock().unwrap() = entries
            .iter()
            .map(|(id, label)| Todo {
                id: id.to_string(),
                label: label.to_string(),
                is_checked: false,
            })
            .collect();
        backend
    }

    pub(crate) fn stored(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }

    /// Number of calls received, `get-all` and `delete-all` included.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every later call of `operation` fail.
    pub(crate) fn fail_on(&self, operation: &'static str) {
        *self.failing.lock().unwrap() = Some(operation);
    }

    fn enter(&self, operation: &str) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() == Some(operation) {
            return Err(ApiError::HttpError {
                status: 500,
                body: format!("{operation} failed"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TodoBackend for FakeBackend {
    async fn get_all(&self) -> Result<Vec<Todo>, ApiError> {
        self.enter("get-all")?;
        Ok(self.stored())
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        self.enter("create")?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let todo = Todo {
            id: format!("fake{n}"),
            label: input.label.clone(),
            is_checked: input.is_checked,
        };
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, input: &Todo) -> Result<Todo, ApiError> {
        self.enter("update")?;
        for todo in self.todos.lock().unwrap().iter_mut() {
            if todo.id == input.id {
                *todo = input.clone();
            }
        }
        Ok(input.clone())
    }

    async fn delete(&self, input: &DeleteTodo) -> Result<DeleteTodo, ApiError> {
        self.enter("delete")?;
        self.todos.lock().unwrap().retain(|todo| todo.id != input.id);
        Ok(input.clone())
    }

    async fn delete_all(&self) -> Result<(), ApiError> {
        self.enter("delete-all")?;
        self.todos.lock().unwrap().clear();
        Ok(())
    }
}

/// Wraps a `FakeBackend` and holds the first `update` until released.
pub(crate) struct GatedBackend {
    pub(crate) inner: FakeBackend,
    armed: AtomicBool,
    pub(crate) started: Notify,
    pub(crate) release: Notify,
}

impl GatedBackend {
    pub(crate) fn new(inner: FakeBackend) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(true),
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl TodoBackend for GatedBackend {
    async fn get_all(&self) -> Result<Vec<Todo>, ApiError> {
        self.inner.get_all().await
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        self.inner.create(input).await
    }

    async fn update(&self, input: &Todo) -> Result<Todo, ApiError> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.update(input).await
    }

    async fn delete(&self, input: &DeleteTodo) -> Result<DeleteTodo, ApiError> {
        self.inner.delete(input).await
    }

    async fn delete_all(&self) -> Result<(), ApiError> {
        self.inner.delete_all().await
    }
}
