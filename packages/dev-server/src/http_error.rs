//! HTTP error handling for dev server
//!
//! Errors are sent in the backend envelope shape (`{success: false, error}`)
//! so the node client reads them the same way it reads a real backend.

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

/// HTTP error response
#[derive(Debug, Serialize)]
pub struct HttpError {
    /// Always `false`
    pub success: bool,
    /// User-facing error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Structured detail, e.g. the per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with structured details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(message, code)
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NODE_NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" | "BATCH_VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "DUPLICATE_NODE_ID" => StatusCode::CONFLICT,
            "CSRF_FAILED" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NodeNotFound { .. } => HttpError::new(message, "NODE_NOT_FOUND"),
            StoreError::DuplicateNodeId { .. } => HttpError::new(message, "DUPLICATE_NODE_ID"),
            StoreError::Validation(errors) => HttpError::with_details(
                message,
                "VALIDATION_ERROR",
                serde_json::to_value(&errors).unwrap_or(Value::Null),
            ),
            StoreError::Batch(errors) => HttpError::with_details(
                message,
                "BATCH_VALIDATION_ERROR",
                serde_json::to_value(&errors).unwrap_or(Value::Null),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_codes_map_to_status() {
        assert_eq!(HttpError::new("x", "NODE_NOT_FOUND").status(), StatusCode::NOT_FOUND);
        assert_eq!(HttpError::new("x", "CSRF_FAILED").status(), StatusCode::FORBIDDEN);
        assert_eq!(HttpError::new("x", "DUPLICATE_NODE_ID").status(), StatusCode::CONFLICT);
        assert_eq!(HttpError::new("x", "SOMETHING").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_serializes_as_failed_envelope() {
        let json = serde_json::to_value(HttpError::from(StoreError::node_not_found(4))).unwrap();
        assert_eq!(
            json,
            json!({ "success": false, "error": "Node not found: 4", "code": "NODE_NOT_FOUND" })
        );
    }
}
