//! Error types for the todo client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because it means the server does not
//! know the operation at all, usually a version mismatch. Other non-2xx
//! responses land in `HttpError` with the raw status code and body.
//! `Transport` covers failures before any response arrived.

/// Errors returned by `TodoClient` parse methods and by backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the operation is not served there.
    #[error("operation not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors returned by a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// At least one call of the batch failed. The view was rolled back to
    /// its last settled state.
    #[error("reconciliation batch of {calls} call(s) failed: {source}")]
    BatchFailed {
        calls: usize,
        #[source]
        source: ApiError,
    },
}
