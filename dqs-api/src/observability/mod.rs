//! Observability: structured logging and request correlation

pub mod logging;

pub use logging::{
    current_context, init_logging, request_logging_middleware, LogConfig, LogContext, LogFormat,
    RequestLoggingState, SensitiveDataRedactor, REQUEST_ID_HEADER,
};
