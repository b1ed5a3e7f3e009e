//! Domain DTOs for the todo resolver.
//!
//! # Design
//! These types mirror the server's schema but are defined independently so
//! the client does not link the server's Axum stack. Integration tests catch
//! any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A persisted todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub label: String,
    pub is_checked: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub label: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// Request payload and response of the `delete` operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteTodo {
    pub id: String,
}

/// Where the widget is embedded. The server names the list after the last
/// `/`-separated segment of `local_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    pub local_id: String,
}

/// Request body sent for every operation.
#[derive(Debug, Serialize)]
pub(crate) struct Invocation<'a, P: Serialize> {
    pub context: &'a InvocationContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a P>,
}
