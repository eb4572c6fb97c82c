//! DQS reasoning client
//!
//! Talks to Groq's OpenAI-compatible chat-completions API and exposes it as a
//! [`dqs_core::ReasoningCollaborator`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dqs_core::{ExtractedMetadata, ReasoningCollaborator, ReasoningInput};
//! use dqs_reasoning::{GroqClient, GroqCollaborator, ReasoningConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ReasoningConfig::new(std::env::var("GROQ_API_KEY")?);
//!     let collaborator = GroqCollaborator::new(GroqClient::new(config)?);
//!
//!     let payload = serde_json::json!({
//!         "dataset": {
//!             "dataset_id": "d1",
//!             "dataset_name": "orders",
//!             "row_count": 10,
//!             "column_count": 2,
//!             "ingestion_timestamp": "2024-01-01T00:00:00"
//!         }
//!     });
//!     let metadata = ExtractedMetadata::normalize(&payload)?;
//!     let assessment = collaborator.assess(&ReasoningInput::from_metadata(&metadata)?).await?;
//!     println!("{}", assessment);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::GroqClient;
pub use collaborator::GroqCollaborator;
pub use config::{ReasoningConfig, API_KEY_PREFIX, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use error::{ReasoningError, ReasoningResult};
pub use prompt::data_quality_prompt;
pub use types::{CompletionRequest, CompletionResponse, Message};
