//! Asynchronous seams between the reconciliation client and the resolver.
//!
//! # Design
//! `TodoBackend` is the five-operation surface the reconciler calls.
//! `RemoteBackend` implements it by pairing the stateless `TodoClient` with a
//! `Transport` that executes one `HttpRequest`, so the host picks the HTTP
//! stack and tests can substitute an in-memory backend.

use async_trait::async_trait;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeleteTodo, Todo};

/// Executes a single HTTP round-trip.
///
/// Non-2xx statuses must come back as `Ok` responses; only failures to get
/// a response at all are `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// The resolver's operations, one call each.
#[async_trait]
pub trait TodoBackend: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Todo>, ApiError>;

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError>;

    async fn update(&self, input: &Todo) -> Result<Todo, ApiError>;

    async fn delete(&self, input: &DeleteTodo) -> Result<DeleteTodo, ApiError>;

    async fn delete_all(&self) -> Result<(), ApiError>;
}

/// `TodoBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteBackend<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> RemoteBackend<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> TodoBackend for RemoteBackend<T> {
    async fn get_all(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_get_all()?;
        self.client.parse_get_all(self.transport.execute(request).await?)
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create(input)?;
        self.client.parse_create(self.transport.execute(request).await?)
    }

    async fn update(&self, input: &Todo) -> Result<Todo, ApiError> {
        let request = self.client.build_update(input)?;
        self.client.parse_update(self.transport.execute(request).await?)
    }

    async fn delete(&self, input: &DeleteTodo) -> Result<DeleteTodo, ApiError> {
        let request = self.client.build_delete(input)?;
        self.client.parse_delete(self.transport.execute(request).await?)
    }

    async fn delete_all(&self) -> Result<(), ApiError> {
        let request = self.client.build_delete_all()?;
        self.client.parse_delete_all(self.transport.execute(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Replays canned responses and records the requests it saw.
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<Vec<Result<HttpResponse, ApiError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn replying(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn backend(responses: Vec<Result<HttpResponse, ApiError>>) -> RemoteBackend<Scripted> {
        RemoteBackend::new(
            TodoClient::new("http://todo.test", "site/page"),
            Scripted::replying(responses),
        )
    }

    #[tokio::test]
    async fn create_round_trips_through_transport() {
        let backend = backend(vec![Ok(HttpResponse::new(
            200,
            r#"{"id":"n1","label":"milk","isChecked":false}"#,
        ))]);
        let todo = backend
            .create(&CreateTodo {
                label: "milk".to_string(),
                is_checked: false,
            })
            .await
            .unwrap();
        assert_eq!(todo.id, "n1");

        let seen = backend.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "http://todo.test/invoke/create");
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let backend = backend(vec![Err(ApiError::Transport("connection refused".to_string()))]);
        let err = backend.get_all().await.unwrap_err();
        assert_eq!(err, ApiError::Transport("connection refused".to_string()));
    }

    #[tokio::test]
    async fn server_error_status_becomes_http_error() {
        let backend = backend(vec![Ok(HttpResponse::new(500, "boom"))]);
        let err = backend.delete_all().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::HttpError {
                status: 500,
                body: "boom".to_string()
            }
        );
    }
}
