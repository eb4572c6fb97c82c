use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SERVICE_MESSAGE: &str = "DQS-AI Agent is running";
pub const ANALYZE_PATH: &str = "/analyze-dqs";
pub const HEALTH_PATH: &str = "/health";

// Success envelope for POST /analyze-dqs
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub genai_insights: Value,
}

impl AnalyzeResponse {
    pub fn success(genai_insights: Value) -> Self {
        Self {
            status: "success".to_string(),
            genai_insights,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointsInfo {
    pub analyze: String,
    pub health: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub endpoints: EndpointsInfo,
    pub model: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub api_key_configured: bool,
}

// Error envelopes
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            kind: kind.into(),
        }
    }
}
