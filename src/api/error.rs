use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Session expired, please log in again: {0}")]
    AuthExpired(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        // Backend errors usually arrive as {"error": "..."}
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        let msg = if message.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::AuthExpired(msg),
            StatusCode::FORBIDDEN => ApiError::Forbidden(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            status if status.is_server_error() => ApiError::Server {
                status: status.as_u16(),
                message: msg,
            },
            _ => ApiError::BadRequest(msg),
        }
    }

    /// Worth retrying for idempotent requests
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Server { .. })
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
