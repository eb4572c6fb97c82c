//! Reasoning client configuration
//!
//! Connection and sampling settings for the Groq chat-completions API.

use std::time::Duration;

use crate::error::{ReasoningError, ReasoningResult};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Groq keys are issued with this prefix.
pub const API_KEY_PREFIX: &str = "gsk_";

/// Configuration for the reasoning client
#[derive(Clone)]
pub struct ReasoningConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// API credential
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("dqs-reasoning/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ReasoningConfig {
    /// Create a new configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Whether a credential is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ReasoningResult<()> {
        match self.api_key.as_deref() {
            None | Some("") => {
                return Err(ReasoningError::Configuration(
                    "API key is not set".to_string(),
                ))
            }
            Some(key) if !key.starts_with(API_KEY_PREFIX) => {
                return Err(ReasoningError::Configuration(format!(
                    "API key must start with {}",
                    API_KEY_PREFIX
                )))
            }
            Some(_) => {}
        }

        if self.base_url.is_empty() {
            return Err(ReasoningError::Configuration(
                "Base URL cannot be empty".to_string(),
            ));
        }

        // Validate URL format
        url::Url::parse(&self.base_url)?;

        if self.model.trim().is_empty() {
            return Err(ReasoningError::Configuration(
                "Model cannot be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ReasoningError::Configuration(format!(
                "Temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }

        if self.timeout.is_zero() {
            return Err(ReasoningError::Configuration(
                "Timeout cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ReasoningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}
