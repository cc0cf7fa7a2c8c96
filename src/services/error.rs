use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request failed with status {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RemoteError {
    /// Builds an error from a non-success response. The body is searched for
    /// the message fields used by the VK service (`error`) and by Supabase
    /// (`error_description`, `msg`, `message`).
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

        match status.as_u16() {
            404 => RemoteError::NotFound(message),
            401 | 403 => RemoteError::Unauthorized(message),
            409 => RemoteError::Conflict(message),
            code => RemoteError::ServiceError {
                status: code,
                message,
            },
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RemoteError::NotFound(msg)
            | RemoteError::Unauthorized(msg)
            | RemoteError::Conflict(msg)
            | RemoteError::NetworkError(msg)
            | RemoteError::InvalidResponse(msg)
            | RemoteError::InternalError(msg) => msg,
            RemoteError::ServiceError { message, .. } => message,
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(json) => ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}

impl From<RemoteError> for ApplicationError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::NotFound(_) => ApplicationError::NotFound,
            RemoteError::Unauthorized(_) => ApplicationError::Unauthorized,
            RemoteError::Conflict(msg) => ApplicationError::Conflict(msg),
            RemoteError::NetworkError(msg) => ApplicationError::Network(msg),
            RemoteError::ServiceError { status, message } => {
                ApplicationError::Remote { status, message }
            }
            RemoteError::InvalidResponse(msg) | RemoteError::InternalError(msg) => {
                ApplicationError::InternalError(msg)
            }
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RemoteError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            RemoteError::NetworkError(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            RemoteError::InvalidResponse(error.to_string())
        } else if let Some(status) = error.status() {
            RemoteError::from_status(status, "")
        } else {
            RemoteError::InternalError(error.to_string())
        }
    }
}
