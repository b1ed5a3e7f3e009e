//! Invocation envelope and list key derivation.
//!
//! Every call arrives as `{"context": {...}, "payload": ...}`. The context
//! identifies where the widget is embedded; the list it operates on is named
//! by the last `/`-separated segment of `localId`.

use std::fmt;

use serde::Deserialize;

use crate::error::ServiceError;

/// Host-supplied context of a single invocation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    pub local_id: Option<String>,
}

/// Request body of every operation. `payload` is absent for `get-all` and
/// `delete-all`.
#[derive(Debug, Deserialize)]
pub struct Invocation<P> {
    #[serde(default)]
    pub context: InvocationContext,
    pub payload: P,
}

/// Body of operations that take no input. Any `payload` sent anyway is ignored.
#[derive(Debug, Deserialize)]
pub struct BareInvocation {
    #[serde(default)]
    pub context: InvocationContext,
}

/// Name of a todo list in the key-value store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListKey(String);

impl ListKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl InvocationContext {
    /// Derive the list key from `localId`.
    ///
    /// Rejects a missing `localId` and one whose last segment is blank,
    /// rather than falling back to a shared default list.
    pub fn list_key(&self) -> Result<ListKey, ServiceError> {
        let local_id = self.local_id.as_deref().ok_or(ServiceError::MissingListKey)?;
        let segment = local_id.rsplit('/').next().unwrap_or_default().trim();
        if segment.is_empty() {
            return Err(ServiceError::MalformedListKey(local_id.to_string()));
        }
        Ok(ListKey(segment.to_string()))
    }
}
