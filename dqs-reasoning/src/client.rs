//! HTTP client for the Groq chat-completions API
//!
//! One request per call: no retries and no client-side rate limiting. Timeouts
//! come from [`ReasoningConfig`].

use std::sync::Arc;

use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::config::ReasoningConfig;
use crate::error::{ReasoningError, ReasoningResult};
use crate::types::{CompletionRequest, CompletionResponse, Message};

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    config: Arc<ReasoningConfig>,
}

impl GroqClient {
    /// Create a new client; fails if the configuration is invalid
    pub fn new(config: ReasoningConfig) -> ReasoningResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let api_key = config.api_key.as_deref().unwrap_or_default();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| ReasoningError::Configuration(format!("Invalid API key: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Send a chat completion and return the first choice's text
    pub async fn chat(&self, messages: Vec<Message>) -> ReasoningResult<String> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let url = self.url("chat/completions");
        debug!(model = %self.config.model, url = %url, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Chat completion request failed");
            return Err(ReasoningError::from_response(status.as_u16(), &text, retry_after));
        }

        let completion: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ReasoningError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Chat completion succeeded"
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ReasoningError::InvalidResponse("No completion in response".to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> ReasoningError {
        if err.is_timeout() {
            ReasoningError::Timeout(self.config.timeout.as_secs())
        } else {
            ReasoningError::Network(err)
        }
    }
}

fn parse_retry_after(headers: &header::HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
