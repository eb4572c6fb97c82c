//! Structured logging and request correlation
//!
//! - JSON, pretty or compact output selected by [`LogConfig`]
//! - `X-Request-ID` propagation with a task-local [`LogContext`]
//! - Redaction of credentials in headers and logged text
//!
//! # Examples
//!
//! ```rust,no_run
//! use dqs_api::observability::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default()).expect("Failed to initialize logging");
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc, time::Instant};
use tokio::task_local;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// HTTP header for request correlation ID
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Headers whose values never reach the logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "proxy-authorization",
];

/// Patterns redacted from logged text
pub const SENSITIVE_PATTERNS: &[&str] = &[
    r"(?i)api[_-]?key\s*[:=]\s*[^\s,&}]+",
    r"(?i)token\s*[:=]\s*[^\s,&}]+",
    r"(?i)bearer\s+[^\s,}]+",
    r"gsk_[A-Za-z0-9]+",
];

const REDACTED: &str = "[REDACTED]";

// ============================================================================
// Configuration
// ============================================================================

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for production (machine-readable)
    Json,
    /// Pretty format for development (human-readable)
    Pretty,
    /// Compact format for minimal output
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log format
    pub format: LogFormat,
    /// Default log level
    pub level: String,
    /// Per-module directives (e.g. "dqs_api=debug,tower_http=info"); wins over `RUST_LOG`
    pub filter: Option<String>,
    /// Extra redaction patterns (regex)
    pub custom_redaction_patterns: Vec<String>,
    /// Extra headers to redact
    pub custom_sensitive_headers: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: "info".to_string(),
            filter: None,
            custom_redaction_patterns: Vec::new(),
            custom_sensitive_headers: Vec::new(),
        }
    }
}

// ============================================================================
// Request Context
// ============================================================================

/// Context attached to the task serving one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub request_id: String,
}

impl LogContext {
    pub fn new() -> Self {
        Self::with_request_id(Uuid::new_v4().to_string())
    }

    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

task_local! {
    static LOG_CONTEXT: LogContext;
}

/// Context of the current request, or a fresh one outside a request scope
pub fn current_context() -> LogContext {
    LOG_CONTEXT.try_with(|ctx| ctx.clone()).unwrap_or_default()
}

// ============================================================================
// Sensitive Data Redaction
// ============================================================================

/// Redacts credentials from headers and free text before they are logged
#[derive(Debug, Clone)]
pub struct SensitiveDataRedactor {
    patterns: Vec<Regex>,
    sensitive_headers: Vec<String>,
}

impl SensitiveDataRedactor {
    pub fn new() -> Self {
        let patterns = SENSITIVE_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            patterns,
            sensitive_headers: SENSITIVE_HEADERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_config(config: &LogConfig) -> Self {
        let mut redactor = Self::new();

        for pattern in &config.custom_redaction_patterns {
            match Regex::new(pattern) {
                Ok(regex) => redactor.patterns.push(regex),
                Err(e) => tracing::warn!(pattern = %pattern, error = %e, "Ignoring invalid redaction pattern"),
            }
        }

        redactor
            .sensitive_headers
            .extend(config.custom_sensitive_headers.iter().map(|h| h.to_ascii_lowercase()));

        redactor
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();
        for pattern in &self.patterns {
            result = pattern.replace_all(&result, REDACTED).into_owned();
        }
        result
    }

    pub fn redact_headers(&self, headers: &HeaderMap) -> BTreeMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                let name = name.as_str();
                let value = if self.sensitive_headers.iter().any(|h| h.eq_ignore_ascii_case(name)) {
                    REDACTED.to_string()
                } else {
                    self.redact(value.to_str().unwrap_or("[INVALID UTF-8]"))
                };
                (name.to_string(), value)
            })
            .collect()
    }
}

impl Default for SensitiveDataRedactor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Request/Response Logging
// ============================================================================

/// Middleware state for request logging
#[derive(Clone, Default)]
pub struct RequestLoggingState {
    redactor: Arc<SensitiveDataRedactor>,
}

impl RequestLoggingState {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            redactor: Arc::new(SensitiveDataRedactor::with_config(config)),
        }
    }
}

/// Extract or generate request ID from headers
fn extract_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Logs every request and response and stamps `X-Request-ID` on the response
pub async fn request_logging_middleware(
    State(state): State<RequestLoggingState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = extract_request_id(request.headers());

    let method = request.method().clone();
    let uri = state.redactor.redact(&request.uri().to_string());

    info!(
        request.method = %method,
        request.uri = %uri,
        request.id = %request_id,
        "Incoming request"
    );
    debug!(
        request.id = %request_id,
        headers = ?state.redactor.redact_headers(request.headers()),
        "Request headers"
    );

    let span = info_span!("request", request_id = %request_id);
    let context = LogContext::with_request_id(request_id.clone());
    let mut response = LOG_CONTEXT
        .scope(context, next.run(request).instrument(span))
        .await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            response.status = status.as_u16(),
            response.duration_ms = duration_ms,
            request.id = %request_id,
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            response.status = status.as_u16(),
            response.duration_ms = duration_ms,
            request.id = %request_id,
            "Request completed with client error"
        );
    } else {
        tracing::info!(
            response.status = status.as_u16(),
            response.duration_ms = duration_ms,
            request.id = %request_id,
            "Request completed successfully"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Install the global subscriber described by `config`
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = match &config.filter {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
    };

    match config.format {
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_thread_ids(true)
                .with_filter(env_filter);

            tracing_subscriber::registry().with(json_layer).try_init()?;
        }
        LogFormat::Pretty => {
            let pretty_layer = fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(env_filter);

            tracing_subscriber::registry().with(pretty_layer).try_init()?;
        }
        LogFormat::Compact => {
            let compact_layer = fmt::layer()
                .compact()
                .with_filter(env_filter);

            tracing_subscriber::registry().with(compact_layer).try_init()?;
        }
    }

    info!("Logging system initialized with format: {:?}", config.format);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
