use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Human-readable reason without the category prefix.
    pub fn reason(&self) -> String {
        match self {
            CoreError::Validation(msg) | CoreError::Serialization(msg) => msg.clone(),
            CoreError::Collaborator(err) => err.to_string(),
        }
    }
}

/// Failures raised while invoking the reasoning collaborator or reading its answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("reasoning service unreachable: {0}")]
    Unreachable(String),

    #[error("reasoning service timed out after {0} seconds")]
    Timeout(u64),

    #[error("reasoning service returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("reasoning service rate limited the request (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("malformed reasoning response: {0}")]
    MalformedResponse(String),

    #[error("prompt rendering failed: {0}")]
    Prompt(String),
}

impl CollaboratorError {
    /// Short category label used in logs and fallback envelopes.
    pub fn category(&self) -> &'static str {
        match self {
            CollaboratorError::Unreachable(_) => "Unreachable",
            CollaboratorError::Timeout(_) => "Timeout",
            CollaboratorError::Provider { .. } => "ProviderError",
            CollaboratorError::RateLimited { .. } => "RateLimited",
            CollaboratorError::MalformedResponse(_) => "MalformedResponse",
            CollaboratorError::Prompt(_) => "PromptError",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
