//! Client-side list state with optimistic edits.
//!
//! # Design
//! Each entry carries an explicit `ViewState`, so an entry without a server id
//! is always `New` and therefore always waiting on a create. Local edits apply
//! immediately and bump the entry's `revision`. `begin_batch` turns every
//! pending entry into one backend call and `settle` merges the results back by
//! `ViewKey`. A settlement whose revision is older than the entry's current
//! one keeps the local fields and leaves the entry pending, so an edit made
//! while its call was in flight is sent again instead of being overwritten.

use std::collections::HashSet;
use std::fmt;

use crate::error::{ApiError, ReconcileError};
use crate::reconcile::{Batch, Call, Settlement};
use crate::types::{CreateTodo, DeleteTodo, Todo};

/// Client-generated key of a view entry. Stable for the entry's lifetime,
/// unique within one `TodoList`, and independent of the server id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewKey(u64);

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an entry stands relative to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Added locally, create not yet settled. `discarded` is set when the
    /// entry was removed while its create was in flight.
    New { discarded: bool },
    /// Matches the server.
    Persisted { id: String },
    /// Edited locally since the last settlement.
    Dirty { id: String },
    /// Removed locally, delete not yet settled.
    Deleting { id: String },
}

/// One row of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    key: ViewKey,
    label: String,
    is_checked: bool,
    state: ViewState,
    revision: u64,
}

impl TodoView {
    pub fn key(&self) -> ViewKey {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Server id, once assigned.
    pub fn id(&self) -> Option<&str> {
        match &self.state {
            ViewState::New { .. } => None,
            ViewState::Persisted { id } | ViewState::Dirty { id } | ViewState::Deleting { id } => {
                Some(id.as_str())
            }
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(
            self.state,
            ViewState::New { discarded: false } | ViewState::Dirty { .. }
        )
    }

    pub fn is_deleting(&self) -> bool {
        matches!(
            self.state,
            ViewState::Deleting { .. } | ViewState::New { discarded: true }
        )
    }

    /// The record as the server should hold it, if it has an id.
    pub fn to_todo(&self) -> Option<Todo> {
        self.id().map(|id| Todo {
            id: id.to_string(),
            label: self.label.clone(),
            is_checked: self.is_checked,
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Completed and total counts shown in the panel footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub completed: usize,
    pub total: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} Completed", self.completed, self.total)
    }
}

/// The panel's list state.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    entries: Vec<TodoView>,
    /// Server's copy of every entry it has confirmed, in key order. Restored
    /// when a batch fails.
    settled: Vec<TodoView>,
    next_key: u64,
    in_flight: Option<HashSet<ViewKey>>,
    last_error: Option<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_todos(todos: Vec<Todo>) -> Self {
        let mut list = Self::new();
        list.replace_all(todos);
        list
    }

    pub fn entries(&self) -> &[TodoView] {
        &self.entries
    }

    pub fn get(&self, key: ViewKey) -> Option<&TodoView> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn find_by_id(&self, id: &str) -> Option<ViewKey> {
        self.entries
            .iter()
            .find(|entry| entry.id() == Some(id))
            .map(|entry| entry.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Message of the last failed batch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            completed: self.entries.iter().filter(|entry| entry.is_checked).count(),
            total: self.entries.len(),
        }
    }

    /// Whether any entry is waiting on a backend call.
    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.is_saving() || entry.is_deleting())
    }

    /// Replace the whole view with server state, e.g. after a fetch or a
    /// delete-all. The result is the new settled snapshot.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.entries = todos
            .into_iter()
            .map(|todo| {
                let key = self.allocate_key();
                TodoView {
                    key,
                    label: todo.label,
                    is_checked: todo.is_checked,
                    state: ViewState::Persisted { id: todo.id },
                    revision: 0,
                }
            })
            .collect();
        self.settled = self.entries.clone();
        self.last_error = None;
    }

    /// Append an unsaved, unchecked entry.
    pub fn add(&mut self, label: impl Into<String>) -> ViewKey {
        let key = self.allocate_key();
        self.entries.push(TodoView {
            key,
            label: label.into(),
            is_checked: false,
            state: ViewState::New { discarded: false },
            revision: 0,
        });
        key
    }

    /// Flip the checked flag. Returns false if the entry is gone or being deleted.
    pub fn toggle(&mut self, key: ViewKey) -> bool {
        self.edit(key, |entry| entry.is_checked = !entry.is_checked)
    }

    /// Change the label. Returns false if the entry is gone or being deleted.
    pub fn rename(&mut self, key: ViewKey, label: impl Into<String>) -> bool {
        let label = label.into();
        self.edit(key, move |entry| entry.label = label)
    }

    /// Mark the entry for deletion.
    ///
    /// An entry that was never sent to the server is dropped right away. One
    /// whose create is in flight is deleted once the create settles.
    pub fn remove(&mut self, key: ViewKey) -> bool {
        let in_flight = self.is_dispatched(key);
        let Some(index) = self.index_of(key) else {
            return false;
        };
        let next = match &self.entries[index].state {
            ViewState::New { discarded: false } if !in_flight => None,
            ViewState::New { discarded: false } => Some(ViewState::New { discarded: true }),
            ViewState::Persisted { id } | ViewState::Dirty { id } => {
                Some(ViewState::Deleting { id: id.clone() })
            }
            ViewState::New { discarded: true } | ViewState::Deleting { .. } => return false,
        };
        match next {
            None => {
                self.entries.remove(index);
            }
            Some(state) => {
                let entry = &mut self.entries[index];
                entry.state = state;
                entry.touch();
            }
        }
        true
    }

    /// Collect one call per pending entry and mark them in flight.
    ///
    /// Returns `None` when a batch is already in flight or nothing is pending.
    pub fn begin_batch(&mut self) -> Option<Batch> {
        if self.in_flight.is_some() {
            return None;
        }
        let calls: Vec<Call> = self.entries.iter().filter_map(call_for).collect();
        if calls.is_empty() {
            return None;
        }
        self.in_flight = Some(calls.iter().map(Call::key).collect());
        Some(Batch::new(calls))
    }

    /// Merge the outcome of `batch` into the view.
    ///
    /// On failure the view is rolled back to the last settled snapshot and the
    /// error is kept for `last_error`.
    pub fn settle(
        &mut self,
        batch: Batch,
        outcome: Result<Vec<Settlement>, ApiError>,
    ) -> Result<(), ReconcileError> {
        self.in_flight = None;
        let settlements = match outcome {
            Ok(settlements) => settlements,
            Err(source) => {
                self.entries = self.settled.clone();
                self.last_error = Some(source.to_string());
                return Err(ReconcileError::BatchFailed {
                    calls: batch.len(),
                    source,
                });
            }
        };

        for (call, settlement) in batch.into_calls().into_iter().zip(settlements) {
            self.apply(&call, settlement);
        }
        self.last_error = None;
        Ok(())
    }

    fn apply(&mut self, call: &Call, settlement: Settlement) {
        let key = call.key();
        let (todo, created) = match settlement {
            Settlement::Deleted(_) => {
                self.entries.retain(|entry| entry.key != key);
                self.settled.retain(|entry| entry.key != key);
                return;
            }
            Settlement::Created(todo) => (todo, true),
            Settlement::Updated(todo) => (todo, false),
        };
        let Some(index) = self.index_of(key) else {
            tracing::debug!(%key, "settled entry no longer in view");
            return;
        };
        self.confirm(key, &todo);
        let entry = &mut self.entries[index];
        let current = call.revision() == Some(entry.revision);
        let next = match (&entry.state, created) {
            (ViewState::New { discarded: true }, true) => ViewState::Deleting { id: todo.id },
            // Creates go out unchecked, so a check made before dispatch still
            // differs from the server's record and needs an update.
            (ViewState::New { discarded: false }, true)
                if !current || entry.label != todo.label || entry.is_checked != todo.is_checked =>
            {
                ViewState::Dirty { id: todo.id }
            }
            (ViewState::New { discarded: false }, true) | (ViewState::Dirty { .. }, false) if current => {
                adopt(entry, todo);
                return;
            }
            // Stale update, or the entry was removed meanwhile: keep it pending.
            _ => return,
        };
        entry.state = next;
    }

    /// Record `todo` as the server's copy of entry `key`.
    ///
    /// Keys only grow and new entries are appended, so both `entries` and
    /// `settled` stay sorted by key.
    fn confirm(&mut self, key: ViewKey, todo: &Todo) {
        let revision = self.get(key).map_or(0, TodoView::revision);
        let record = TodoView {
            key,
            label: todo.label.clone(),
            is_checked: todo.is_checked,
            state: ViewState::Persisted { id: todo.id.clone() },
            revision,
        };
        match self.settled.binary_search_by_key(&key, |entry| entry.key) {
            Ok(index) => self.settled[index] = record,
            Err(index) => self.settled.insert(index, record),
        }
    }

    fn edit(&mut self, key: ViewKey, change: impl FnOnce(&mut TodoView)) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) else {
            return false;
        };
        let next = match &entry.state {
            ViewState::New { discarded: false } => entry.state.clone(),
            ViewState::Persisted { id } | ViewState::Dirty { id } => ViewState::Dirty { id: id.clone() },
            ViewState::New { discarded: true } | ViewState::Deleting { .. } => return false,
        };
        change(entry);
        entry.state = next;
        entry.touch();
        true
    }

    fn index_of(&self, key: ViewKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    fn is_dispatched(&self, key: ViewKey) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|keys| keys.contains(&key))
    }

    fn allocate_key(&mut self) -> ViewKey {
        let key = ViewKey(self.next_key);
        self.next_key += 1;
        key
    }
}

/// Replace the entry's fields with the server's record.
fn adopt(entry: &mut TodoView, todo: Todo) {
    entry.label = todo.label;
    entry.is_checked = todo.is_checked;
    entry.state = ViewState::Persisted { id: todo.id };
}

/// The call a pending entry needs, checked in order: delete, create, update.
fn call_for(entry: &TodoView) -> Option<Call> {
    match &entry.state {
        ViewState::Deleting { id } => Some(Call::Delete {
            key: entry.key,
            input: DeleteTodo { id: id.clone() },
        }),
        ViewState::New { discarded: false } => Some(Call::Create {
            key: entry.key,
            revision: entry.revision,
            input: CreateTodo {
                label: entry.label.clone(),
                is_checked: false,
            },
        }),
        ViewState::Dirty { id } => Some(Call::Update {
            key: entry.key,
            revision: entry.revision,
            todo: Todo {
                id: id.clone(),
                label: entry.label.clone(),
                is_checked: entry.is_checked,
            },
        }),
        ViewState::New { discarded: true } | ViewState::Persisted { .. } => None,
    }
}
