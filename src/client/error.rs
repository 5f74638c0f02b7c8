//! Error types for backend requests.

use thiserror::Error;

/// Errors that can occur while talking to the dashboard backend.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Base URL could not be used to build endpoint URLs
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed or the transfer was interrupted
    #[error("connection failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Body was not what the endpoint promises
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(timeout_seconds)
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ClientError::Http(status.as_u16())
        } else {
            ClientError::Transport(e.to_string())
        }
    }

    /// True for failures where the backend never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::Transport(_))
    }
}
