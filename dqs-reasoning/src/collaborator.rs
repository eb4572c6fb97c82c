use async_trait::async_trait;
use dqs_core::{CollaboratorError, PromptTemplate, ReasoningCollaborator, ReasoningInput};
use tracing::{debug, instrument};

use crate::client::GroqClient;
use crate::prompt::data_quality_prompt;
use crate::types::Message;

/// [`ReasoningCollaborator`] backed by a Groq chat model.
#[derive(Debug, Clone)]
pub struct GroqCollaborator {
    client: GroqClient,
    prompt: PromptTemplate,
}

impl GroqCollaborator {
    pub fn new(client: GroqClient) -> Self {
        Self {
            client,
            prompt: data_quality_prompt(),
        }
    }

    /// Replace the default data-quality prompt. The template must use a
    /// `{{metadata}}` placeholder.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn model(&self) -> &str {
        &self.client.config().model
    }
}

#[async_trait]
impl ReasoningCollaborator for GroqCollaborator {
    #[instrument(skip_all, fields(model = %self.model()))]
    async fn assess(&self, input: &ReasoningInput) -> Result<String, CollaboratorError> {
        let prompt = self.prompt.render(&input.prompt_context())?;
        debug!(prompt_chars = prompt.len(), "Rendered data quality prompt");

        let output = self.client.chat(vec![Message::user(prompt)]).await?;
        Ok(output)
    }
}
