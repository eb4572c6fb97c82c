use axum::{extract::State, http::StatusCode, Json};

use crate::{dto::*, AppState};

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: SERVICE_MESSAGE.to_string(),
        endpoints: EndpointsInfo {
            analyze: ANALYZE_PATH.to_string(),
            health: HEALTH_PATH.to_string(),
        },
        model: state.service.model.clone(),
        api_key_configured: state.service.api_key_configured,
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.service.model.clone(),
        api_key_configured: state.service.api_key_configured,
    })
}

pub async fn not_found() -> (StatusCode, Json<ErrorDetail>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDetail {
            detail: "Not Found".to_string(),
        }),
    )
}

pub async fn method_not_allowed() -> (StatusCode, Json<ErrorDetail>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorDetail {
            detail: "Method Not Allowed".to_string(),
        }),
    )
}
