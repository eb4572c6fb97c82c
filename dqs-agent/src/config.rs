use std::{fmt, time::Duration};

use anyhow::Result;
use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, Environment, File};
use dqs_api::observability::LogConfig;
use dqs_core::InsightMode;
use dqs_reasoning::{ReasoningConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log: LogConfig,
    pub insight_mode: InsightMode,
    pub groq: GroqSettings,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GroqSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Config {
    /// Layered load: config/default, config/local, `DQS_*` environment,
    /// then `GROQ_API_KEY` / `GROQ_MODEL`.
    pub fn load() -> Result<Self> {
        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("DQS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("groq.api_key", std::env::var("GROQ_API_KEY").ok())?
            .set_override_option("groq.model", std::env::var("GROQ_MODEL").ok())?;

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn reasoning_config(&self) -> ReasoningConfig {
        let mut reasoning = ReasoningConfig::default()
            .with_base_url(&self.groq.base_url)
            .with_model(&self.groq.model)
            .with_temperature(self.groq.temperature)
            .with_timeout(Duration::from_secs(self.groq.timeout_secs));
        reasoning.api_key = self.groq.api_key.clone().filter(|key| !key.trim().is_empty());

        match self.groq.max_tokens {
            Some(max_tokens) => reasoning.with_max_tokens(max_tokens),
            None => reasoning,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log: LogConfig::default(),
            insight_mode: InsightMode::default(),
            groq: GroqSettings::default(),
        }
    }
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for GroqSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
