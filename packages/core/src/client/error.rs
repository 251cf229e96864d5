//! Backend client errors

use thiserror::Error;

/// Shown when the backend gave no usable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed, please try again";

/// Errors raised while talking to the node backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection, timeout or other transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered `success: false`
    #[error("Backend rejected the request: {message}")]
    Backend { message: String },

    /// Non-success HTTP status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Response body could not be parsed
    #[error("Invalid response from backend: {0}")]
    Decode(String),
}

impl ApiError {
    /// Create a backend rejection error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a status error
    pub fn status(status: u16, message: Option<String>) -> Self {
        Self::Status { status, message }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Message suitable for showing to a user: the backend's own message when
    /// it sent one, otherwise a generic failure message
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message } if !message.trim().is_empty() => message.clone(),
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether the failure happened before a well-formed answer arrived
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}
