//! Service errors and their HTTP mapping.
//!
//! # Design
//! A list key that cannot be derived is the caller's configuration problem and
//! maps to 400 before the store is touched. Store failures are opaque to the
//! service and map to 500 with the store's message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Errors returned by `ListService` operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The invocation context carried no `localId`.
    #[error("invocation context has no localId to derive a list key from")]
    MissingListKey,

    /// The `localId` ends in an empty segment.
    #[error("cannot derive a list key from localId '{0}'")]
    MalformedListKey(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::MissingListKey | ServiceError::MalformedListKey(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "operation failed");
        } else {
            tracing::warn!(error = %self, "rejected invocation");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
