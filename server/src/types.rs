//! Wire and storage schema for todo records.
//!
//! # Design
//! The same `Todo` shape is returned to callers and persisted in the
//! key-value store, so a stored list is exactly the `get-all` response body.
//! Field names are camelCase on the wire (`isChecked`).

use serde::{Deserialize, Serialize};

/// A single todo item. `id` is assigned by the service on create and never
/// changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub label: String,
    pub is_checked: bool,
}

/// Payload of the `create` operation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub label: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// Payload and result of the `delete` operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodo {
    pub id: String,
}
