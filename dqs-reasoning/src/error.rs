//! Reasoning client error types
//!
//! Transport, provider and decoding failures, plus their mapping onto the
//! collaborator taxonomy the request handler understands.

use dqs_core::CollaboratorError;
use thiserror::Error;

/// The main error type for the reasoning client
#[derive(Error, Debug)]
pub enum ReasoningError {
    /// Provider returned a non-success response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network or connection error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Response could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for reasoning client operations
pub type ReasoningResult<T> = Result<T, ReasoningError>;

/// Provider error body (`{"error": {"message": ..., "type": ...}}`)
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ReasoningError {
    /// Build an error from a non-success response
    pub fn from_response(status: u16, body: &str, retry_after: Option<u64>) -> Self {
        if status == 429 {
            return ReasoningError::RateLimited {
                retry_after: retry_after.unwrap_or(60),
            };
        }

        let message = match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) => parsed.error.message,
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.to_string(),
        };

        ReasoningError::Api { status, message }
    }
}

impl From<ReasoningError> for CollaboratorError {
    fn from(err: ReasoningError) -> Self {
        match err {
            ReasoningError::Api { status, message } => CollaboratorError::Provider { status, message },
            ReasoningError::Network(e) => CollaboratorError::Unreachable(e.to_string()),
            ReasoningError::Timeout(secs) => CollaboratorError::Timeout(secs),
            ReasoningError::RateLimited { retry_after } => CollaboratorError::RateLimited {
                retry_after_secs: retry_after,
            },
            ReasoningError::InvalidResponse(msg) => CollaboratorError::MalformedResponse(msg),
            ReasoningError::Configuration(msg) => CollaboratorError::Unreachable(msg),
            ReasoningError::Url(e) => CollaboratorError::Unreachable(e.to_string()),
        }
    }
}
