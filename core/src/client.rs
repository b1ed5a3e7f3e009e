//! Stateless HTTP request builder and response parser for the todo resolver.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and the invocation context and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the actual HTTP round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeleteTodo, Invocation, InvocationContext, Todo};

/// Synchronous, stateless client for the todo resolver.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    context: InvocationContext,
}

impl TodoClient {
    pub fn new(base_url: &str, local_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            context: InvocationContext {
                local_id: local_id.to_string(),
            },
        }
    }

    pub fn context(&self) -> &InvocationContext {
        &self.context
    }

    pub fn build_get_all(&self) -> Result<HttpRequest, ApiError> {
        self.invoke::<()>("get-all", None)
    }

    pub fn build_create(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.invoke("create", Some(input))
    }

    /// The whole record is sent; the server replaces the stored one verbatim.
    pub fn build_update(&self, input: &Todo) -> Result<HttpRequest, ApiError> {
        self.invoke("update", Some(input))
    }

    pub fn build_delete(&self, input: &DeleteTodo) -> Result<HttpRequest, ApiError> {
        self.invoke("delete", Some(input))
    }

    pub fn build_delete_all(&self) -> Result<HttpRequest, ApiError> {
        self.invoke::<()>("delete-all", None)
    }

    pub fn parse_get_all(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<DeleteTodo, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_all(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn invoke<P: Serialize>(&self, operation: &str, payload: Option<&P>) -> Result<HttpRequest, ApiError> {
        let envelope = Invocation {
            context: &self.context,
            payload,
        };
        let body = serde_json::to_string(&envelope).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/invoke/{operation}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response, 200)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
