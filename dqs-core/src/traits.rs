use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ExtractedMetadata;
use crate::error::{CollaboratorError, Result};

/// What the reasoning collaborator receives: one named variable holding the
/// serialized metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningInput {
    pub metadata: serde_json::Value,
}

impl ReasoningInput {
    pub fn from_metadata(metadata: &ExtractedMetadata) -> Result<Self> {
        Ok(Self {
            metadata: metadata.to_value()?,
        })
    }

    /// Template context with `metadata` rendered as indented JSON.
    pub fn prompt_context(&self) -> serde_json::Value {
        let rendered = serde_json::to_string_pretty(&self.metadata)
            .unwrap_or_else(|_| self.metadata.to_string());
        serde_json::json!({ "metadata": rendered })
    }
}

/// External generative step that turns metadata into an assessment.
///
/// Implementations return the model's text; shaping it into JSON is the
/// caller's concern.
#[async_trait]
pub trait ReasoningCollaborator: Send + Sync {
    async fn assess(&self, input: &ReasoningInput) -> std::result::Result<String, CollaboratorError>;
}
