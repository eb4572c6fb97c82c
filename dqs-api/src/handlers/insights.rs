use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use dqs_core::{ExtractedMetadata, ReasoningInput};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    dto::AnalyzeResponse,
    error::{ApiError, ApiResult},
    AppState,
};

/// POST /analyze-dqs
///
/// The body is read as raw bytes so a missing or wrong `Content-Type` does
/// not change the outcome; anything that is not a JSON object is a 422.
#[instrument(skip_all)]
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let body = body?;
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

    let metadata = ExtractedMetadata::normalize(&payload)?;
    info!(
        dataset_id = %metadata.dataset.dataset_id,
        columns = metadata.columns.len(),
        "Metadata normalized"
    );

    let input = ReasoningInput::from_metadata(&metadata)?;
    let output = state.collaborator.assess(&input).await?;
    let insights = state.insight_mode.shape(output)?;

    info!(mode = ?state.insight_mode, "Data quality analysis completed");
    Ok(Json(AnalyzeResponse::success(insights)))
}
