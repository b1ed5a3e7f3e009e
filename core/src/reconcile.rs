//! Batched dispatch of pending edits and the reconcile loop.
//!
//! # Design
//! A `Batch` holds one `Call` per pending entry. `dispatch` issues them all
//! at once and joins fail-fast: one failed call fails the batch. `reconcile`
//! repeats begin, dispatch and settle until nothing is pending, locking the
//! list only to begin and to settle, so edits can land while calls are out.

use futures::future::try_join_all;
use tokio::sync::Mutex;

use crate::backend::TodoBackend;
use crate::error::{ApiError, ReconcileError};
use crate::types::{CreateTodo, DeleteTodo, Todo};
use crate::view::{TodoList, ViewKey};

/// One backend call for one view entry. `revision` is the entry's revision
/// when the call was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        key: ViewKey,
        revision: u64,
        input: CreateTodo,
    },
    Update {
        key: ViewKey,
        revision: u64,
        todo: Todo,
    },
    Delete {
        key: ViewKey,
        input: DeleteTodo,
    },
}

impl Call {
    pub fn key(&self) -> ViewKey {
        match self {
            Call::Create { key, .. } | Call::Update { key, .. } | Call::Delete { key, .. } => *key,
        }
    }

    pub fn revision(&self) -> Option<u64> {
        match self {
            Call::Create { revision, .. } | Call::Update { revision, .. } => Some(*revision),
            Call::Delete { .. } => None,
        }
    }

    async fn issue<B: TodoBackend + ?Sized>(&self, backend: &B) -> Result<Settlement, ApiError> {
        match self {
            Call::Create { input, .. } => backend.create(input).await.map(Settlement::Created),
            Call::Update { todo, .. } => backend.update(todo).await.map(Settlement::Updated),
            Call::Delete { input, .. } => backend.delete(input).await.map(Settlement::Deleted),
        }
    }
}

/// Server result of one `Call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Created(Todo),
    Updated(Todo),
    Deleted(DeleteTodo),
}

/// Calls issued together. Settlements are matched to calls by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    calls: Vec<Call>,
}

impl Batch {
    pub(crate) fn new(calls: Vec<Call>) -> Self {
        Self { calls }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub(crate) fn into_calls(self) -> Vec<Call> {
        self.calls
    }
}

/// Issue every call of `batch` concurrently and wait for all of them.
pub async fn dispatch<B: TodoBackend + ?Sized>(
    backend: &B,
    batch: &Batch,
) -> Result<Vec<Settlement>, ApiError> {
    try_join_all(batch.calls().iter().map(|call| call.issue(backend))).await
}

/// Run batches until `list` has nothing pending. Returns the number of
/// batches settled.
///
/// Returns `Ok(0)` right away if another task already has a batch in flight.
/// On a failed batch the list is rolled back (see `TodoList::settle`) and
/// the error is returned.
pub async fn reconcile<B: TodoBackend + ?Sized>(
    list: &Mutex<TodoList>,
    backend: &B,
) -> Result<usize, ReconcileError> {
    let mut settled = 0;
    loop {
        let Some(batch) = list.lock().await.begin_batch() else {
            return Ok(settled);
        };
        tracing::debug!(calls = batch.len(), "dispatching reconciliation batch");
        let outcome = dispatch(backend, &batch).await;
        if let Err(err) = &outcome {
            tracing::warn!(calls = batch.len(), error = %err, "reconciliation batch failed");
        }
        list.lock().await.settle(batch, outcome)?;
        settled += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use crate::view::TodoView;

    #[tokio::test]
    async fn new_entry_settles_with_generated_id() {
        let backend = FakeBackend::default();
        let list = Mutex::new(TodoList::new());
        list.lock().await.add("milk");

        assert_eq!(reconcile(&list, &backend).await.unwrap(), 1);

        let list = list.lock().await;
        let entry = &list.entries()[0];
        let todo = entry.to_todo().unwrap();
        assert!(!todo.id.is_empty());
        assert_eq!(todo.label, "milk");
        assert!(!todo.is_checked);
        assert!(!entry.is_saving());
        assert!(!entry.is_deleting());
        assert_eq!(backend.stored(), vec![todo]);
    }

    #[tokio::test]
    async fn deleting_entry_is_removed_after_settlement() {
        let backend = FakeBackend::seeded(&[("1", "milk"), ("2", "eggs")]);
        let list = Mutex::new(TodoList::from_todos(backend.stored()));
        {
            let mut list = list.lock().await;
            let key = list.find_by_id("1").unwrap();
            list.remove(key);
        }

        reconcile(&list, &backend).await.unwrap();

        let list = list.lock().await;
        assert_eq!(list.len(), 1);
        assert!(list.find_by_id("1").is_none());
        assert_eq!(backend.stored().len(), 1);
    }

    #[tokio::test]
    async fn batch_issues_one_call_per_pending_entry() {
        let backend = FakeBackend::seeded(&[("1", "milk"), ("2", "eggs"), ("3", "bread")]);
        let mut list = TodoList::from_todos(backend.stored());
        let milk = list.find_by_id("1").unwrap();
        let eggs = list.find_by_id("2").unwrap();
        list.toggle(milk);
        list.remove(eggs);
        list.add("jam");

        let batch = list.begin_batch().unwrap();
        let settlements = dispatch(&backend, &batch).await.unwrap();
        assert_eq!(backend.calls(), 3);
        assert!(matches!(settlements[0], Settlement::Updated(_)));
        assert!(matches!(settlements[1], Settlement::Deleted(_)));
        assert!(matches!(settlements[2], Settlement::Created(_)));
    }

    #[tokio::test]
    async fn failed_call_fails_batch_and_rolls_back() {
        let backend = FakeBackend::seeded(&[("1", "milk")]);
        backend.fail_on("update");
        let list = Mutex::new(TodoList::from_todos(backend.stored()));
        {
            let mut list = list.lock().await;
            let key = list.find_by_id("1").unwrap();
            list.toggle(key);
            list.add("eggs");
        }

        let err = reconcile(&list, &backend).await.unwrap_err();
        assert!(matches!(err, ReconcileError::BatchFailed { calls: 2, .. }));

        let list = list.lock().await;
        assert_eq!(list.len(), 1);
        assert!(!list.has_pending());
        assert!(!list.entries()[0].is_checked());
        assert!(list.last_error().unwrap().contains("update"));
    }

    #[tokio::test]
    async fn failed_second_pass_keeps_first_pass_results() {
        let backend = FakeBackend::default();
        let list = Mutex::new(TodoList::new());
        let batch = {
            let mut list = list.lock().await;
            list.add("a");
            let batch = list.begin_batch().unwrap();
            list.add("b");
            batch
        };
        let outcome = dispatch(&backend, &batch).await;
        list.lock().await.settle(batch, outcome).unwrap();

        backend.fail_on("create");
        let err = reconcile(&list, &backend).await.unwrap_err();
        assert!(matches!(err, ReconcileError::BatchFailed { calls: 1, .. }));

        let list = list.lock().await;
        let view: Vec<Todo> = list.entries().iter().filter_map(TodoView::to_todo).collect();
        assert_eq!(view, backend.stored());
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].label(), "a");
    }

    #[tokio::test]
    async fn nothing_pending_means_no_calls() {
        let backend = FakeBackend::seeded(&[("1", "milk")]);
        let list = Mutex::new(TodoList::from_todos(backend.stored()));
        assert_eq!(reconcile(&list, &backend).await.unwrap(), 0);
        assert_eq!(backend.calls(), 0);
    }
}
