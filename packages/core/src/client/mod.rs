//! Backend Client
//!
//! The node backend owns persistence; this module talks to it.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `GET /api/nodes/` |
//! | create    | `POST /api/nodes/` |
//! | update    | `PUT /api/nodes/{id}/` (full replace) |
//! | delete    | `DELETE /api/nodes/{id}/` |
//! | batch     | `POST /api/nodes/batch/` |
//!
//! Every answer except delete uses the [`ApiResponse`] envelope
//! `{success, nodes?, error?}`. Delete signals success through the HTTP status
//! and sends `{error}` on failure.

mod error;
mod http;

pub use error::{ApiError, GENERIC_FAILURE_MESSAGE};
pub use http::{HttpNodeApi, CSRF_HEADER};

use crate::models::{BatchSettings, NodeDescriptor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Path of the node collection
pub const NODES_PATH: &str = "/api/nodes/";

/// Path of the batch endpoint
pub const BATCH_PATH: &str = "/api/nodes/batch/";

/// Path of one node
pub fn node_path(id: i64) -> String {
    format!("{}{}/", NODES_PATH, id)
}

/// Response envelope shared by every node endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Successful answer without a payload
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Successful listing
    pub fn with_nodes(nodes: Vec<NodeDescriptor>) -> Self {
        Self {
            success: true,
            nodes: Some(nodes),
            error: None,
        }
    }

    /// Failed answer carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            nodes: None,
            error: Some(message.into()),
        }
    }

    /// `Ok(self)` on success, otherwise the backend's message as an error
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::backend(self.error.unwrap_or_default()))
        }
    }
}

/// Operations the node backend offers
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Every node the backend knows, in backend order
    async fn list_nodes(&self) -> Result<Vec<NodeDescriptor>, ApiError>;

    async fn create_node(&self, node: &NodeDescriptor) -> Result<(), ApiError>;

    /// Replace the node stored under `id`
    async fn update_node(&self, id: i64, node: &NodeDescriptor) -> Result<(), ApiError>;

    async fn delete_node(&self, id: i64) -> Result<(), ApiError>;

    /// Create every node of a batch in one request
    async fn create_batch(&self, settings: &BatchSettings) -> Result<(), ApiError>;
}
