use std::any::Any;

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dqs_core::{CollaboratorError, CoreError};
use thiserror::Error;

use crate::dto::{ErrorDetail, ErrorEnvelope};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid payload format: {0}")]
    InvalidPayload(String),

    #[error("Failed to analyze data quality: {0}")]
    Analysis(String),

    #[error("{message}")]
    Unexpected { message: String, kind: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Analysis(_) | ApiError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the fallback error for a panic caught in the request path.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };

        ApiError::Unexpected {
            message,
            kind: "Panic".to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::InvalidPayload(msg),
            CoreError::Collaborator(err) => err.into(),
            other => ApiError::Analysis(other.reason()),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        tracing::debug!(category = err.category(), "Reasoning collaborator failed");
        ApiError::Analysis(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::InvalidPayload(msg) => tracing::warn!("Invalid payload: {}", msg),
            ApiError::Analysis(msg) => tracing::error!("Analysis failed: {}", msg),
            ApiError::Unexpected { message, kind } => {
                tracing::error!(kind = %kind, "Unhandled failure: {}", message)
            }
        }

        match self {
            ApiError::Unexpected { message, kind } => {
                (status, Json(ErrorEnvelope::new(message, kind))).into_response()
            }
            other => (
                status,
                Json(ErrorDetail {
                    detail: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
