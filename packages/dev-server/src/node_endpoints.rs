//! Node Endpoints for HTTP Dev Server
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/nodes/` - List every node
//! - `POST /api/nodes/` - Create a node
//! - `PUT /api/nodes/:id/` - Replace a node
//! - `DELETE /api/nodes/:id/` - Delete a node
//! - `POST /api/nodes/batch/` - Create a templated batch of nodes
//!
//! Successful answers use the `{success, nodes?, error?}` envelope; delete
//! answers `{success: true}` with status 200.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Serialize;

use crate::{AppState, HttpError};
use opcsim_core::client::ApiResponse;
use opcsim_core::models::{BatchSettings, NodeDescriptor};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub nodes: usize,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        nodes: state.store.read().await.len(),
    })
}

async fn list_nodes(State(state): State<AppState>) -> Json<ApiResponse> {
    let nodes = state.store.read().await.list();
    Json(ApiResponse::with_nodes(nodes))
}

/// Create a node
///
/// ```bash
/// curl -X POST http://localhost:3001/api/nodes/ \
///   -H "Content-Type: application/json" \
///   -d '{"name":"Temp","node_id":"ns=2;s=Temp","node_type":"variable",
///        "data_type":"double","value":"21.5"}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    Json(node): Json<NodeDescriptor>,
) -> Result<Json<ApiResponse>, HttpError> {
    state.store.write().await.create(node)?;
    Ok(Json(ApiResponse::ok()))
}

async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(node): Json<NodeDescriptor>,
) -> Result<Json<ApiResponse>, HttpError> {
    state.store.write().await.update(id, node)?;
    Ok(Json(ApiResponse::ok()))
}

async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse>, HttpError> {
    state.store.write().await.delete(id)?;
    Ok(Json(ApiResponse::ok()))
}

/// Create a batch of nodes
///
/// ```bash
/// curl -X POST http://localhost:3001/api/nodes/batch/ \
///   -H "Content-Type: application/json" \
///   -d '{"nameTemplate":"Sensor_{i}","nodeIdTemplate":"ns=2;s=Sensor{i}",
///        "startIndex":1,"endIndex":3,"valueTemplate":"0.0"}'
/// ```
async fn create_batch(
    State(state): State<AppState>,
    Json(settings): Json<BatchSettings>,
) -> Result<Json<ApiResponse>, HttpError> {
    state.store.write().await.create_batch(&settings)?;
    Ok(Json(ApiResponse::ok()))
}

/// Create node routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/nodes/", get(list_nodes).post(create_node))
        .route("/api/nodes/batch/", post(create_batch))
        .route("/api/nodes/:id/", put(update_node).delete(delete_node))
        .with_state(state)
}
