//! Client core for the todo list resolver.
//!
//! # Overview
//! Two layers:
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//!   `RemoteBackend` pairs it with a `Transport` to get an async
//!   `TodoBackend`.
//! - `TodoList` / `TodoSession` hold the panel's view of the list, apply edits
//!   optimistically and reconcile them with the backend in batches.
//!
//! # Design
//! - DTOs are defined independently from the server crate; integration tests
//!   catch schema drift.
//! - The view state machine in `view` is synchronous and free of I/O; only
//!   `reconcile` and `session` await the backend.

pub mod backend;
pub mod client;
pub mod error;
pub mod http;
pub mod reconcile;
pub mod session;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

pub use backend::{RemoteBackend, TodoBackend, Transport};
pub use client::TodoClient;
pub use error::{ApiError, ReconcileError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use reconcile::{dispatch, reconcile, Batch, Call, Settlement};
pub use session::TodoSession;
pub use types::{CreateTodo, DeleteTodo, InvocationContext, Todo};
pub use view::{Summary, TodoList, TodoView, ViewKey, ViewState};
