//! HTTP surface of the DQS-AI Agent
//!
//! `POST /analyze-dqs` normalizes dataset-quality metadata and asks the
//! reasoning collaborator for an assessment; `GET /` and `GET /health`
//! describe the running service.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod observability;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use dqs_core::{InsightMode, ReasoningCollaborator};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use dto::*;
pub use error::{ApiError, ApiResult};
use observability::{request_logging_middleware, LogConfig, RequestLoggingState};

/// Static facts about the service reported by the auxiliary endpoints.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub model: String,
    pub api_key_configured: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub collaborator: Arc<dyn ReasoningCollaborator>,
    pub service: ServiceInfo,
    pub insight_mode: InsightMode,
}

impl AppState {
    pub fn new(collaborator: Arc<dyn ReasoningCollaborator>, service: ServiceInfo) -> Self {
        Self {
            collaborator,
            service,
            insight_mode: InsightMode::default(),
        }
    }

    pub fn with_insight_mode(mut self, mode: InsightMode) -> Self {
        self.insight_mode = mode;
        self
    }
}

/// Router with default request-logging settings.
pub fn routes(state: AppState) -> Router {
    routes_with_logging(state, &LogConfig::default())
}

pub fn routes_with_logging(state: AppState, log: &LogConfig) -> Router {
    use handlers::{health, insights};

    Router::new()
        .route(
            ANALYZE_PATH,
            post(insights::analyze).fallback(health::method_not_allowed),
        )
        .route("/", get(health::root).fallback(health::method_not_allowed))
        .route(
            HEALTH_PATH,
            get(health::health).fallback(health::method_not_allowed),
        )
        .fallback(health::not_found)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            RequestLoggingState::new(log),
            request_logging_middleware,
        ))
}

fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    use axum::response::IntoResponse;

    ApiError::from_panic(&*err).into_response()
}
