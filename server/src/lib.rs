//! Todo list resolver served over HTTP.
//!
//! # Overview
//! Exposes `get-all`, `create`, `update`, `delete` and `delete-all` as
//! `POST /invoke/{operation}`. Each request body is an invocation envelope
//! whose context names the list; the payload carries the operation input.
//!
//! # Design
//! Handlers derive the list key, call `ListService`, and wrap the result in
//! JSON. The service is shared as router state and holds the store behind
//! `Arc<dyn KeyValueStore>`, so tests can swap in any store.

pub mod config;
pub mod context;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tokio::net::TcpListener;

pub use context::{BareInvocation, Invocation, InvocationContext, ListKey};
pub use error::ServiceError;
pub use service::ListService;
pub use store::{KeyValueStore, MemoryStore, StoreAdapter, StoreError};
pub use types::{CreateTodo, DeleteTodo, Todo};

/// Router backed by a fresh in-memory store.
pub fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

pub fn app_with_store(store: Arc<dyn KeyValueStore>) -> Router {
    Router::new()
        .route("/invoke/get-all", post(get_all))
        .route("/invoke/create", post(create))
        .route("/invoke/update", post(update))
        .route("/invoke/delete", post(delete))
        .route("/invoke/delete-all", post(delete_all))
        .with_state(ListService::new(store))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app()).with_graceful_shutdown(shutdown).await
}

/// Resolve once `signal` fires. If the signal cannot be listened for, log
/// it and never resolve, so the server keeps running.
pub async fn shutdown_on<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

async fn get_all(
    State(service): State<ListService>,
    Json(invocation): Json<BareInvocation>,
) -> Result<Json<Vec<Todo>>, ServiceError> {
    let key = invocation.context.list_key()?;
    service.fetch_all(&key).await.map(Json)
}

async fn create(
    State(service): State<ListService>,
    Json(invocation): Json<Invocation<CreateTodo>>,
) -> Result<Json<Todo>, ServiceError> {
    let key = invocation.context.list_key()?;
    service.create(&key, invocation.payload).await.map(Json)
}

async fn update(
    State(service): State<ListService>,
    Json(invocation): Json<Invocation<Todo>>,
) -> Result<Json<Todo>, ServiceError> {
    let key = invocation.context.list_key()?;
    service.update(&key, invocation.payload).await.map(Json)
}

async fn delete(
    State(service): State<ListService>,
    Json(invocation): Json<Invocation<DeleteTodo>>,
) -> Result<Json<DeleteTodo>, ServiceError> {
    let key = invocation.context.list_key()?;
    service.delete(&key, invocation.payload).await.map(Json)
}

async fn delete_all(
    State(service): State<ListService>,
    Json(invocation): Json<BareInvocation>,
) -> Result<StatusCode, ServiceError> {
    let key = invocation.context.list_key()?;
    service.delete_all(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
