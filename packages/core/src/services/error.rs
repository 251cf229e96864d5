//! Service Layer Error Types
//!
//! Errors surfaced by `NodeService`. Validation failures never reach the
//! backend; backend failures leave the registry and editing context unchanged.

use crate::behaviors::FieldErrors;
use crate::client::ApiError;
use crate::operations::BatchErrors;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum NodeServiceError {
    /// Single-node field validation failed
    #[error(transparent)]
    Validation(#[from] FieldErrors),

    /// Batch validation failed
    #[error(transparent)]
    Batch(#[from] BatchErrors),

    /// Backend or transport failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Another batch submission from this service is still in flight
    #[error("A batch submission is already in progress")]
    BatchInProgress,

    /// Edit or delete of a node the backend has not assigned an id
    #[error("Node {node_id} has not been saved yet")]
    NotPersisted { node_id: String },
}

impl NodeServiceError {
    /// Create a not-persisted error
    pub fn not_persisted(node_id: impl Into<String>) -> Self {
        Self::NotPersisted {
            node_id: node_id.into(),
        }
    }

    /// Message suitable for showing to a user
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn batch_errors(&self) -> Option<&BatchErrors> {
        match self {
            Self::Batch(errors) => Some(errors),
            _ => None,
        }
    }
}
