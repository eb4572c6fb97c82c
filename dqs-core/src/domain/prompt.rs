use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CollaboratorError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PromptTemplate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub template: String,
    pub variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, description: Option<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = Self::extract_variables(&template);

        Self {
            name: name.into(),
            description,
            template,
            variables,
        }
    }

    fn extract_variables(template: &str) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for cap in PLACEHOLDER.captures_iter(template) {
            if !variables.iter().any(|v| v == &cap[1]) {
                variables.push(cap[1].to_string());
            }
        }
        variables
    }

    /// Substitute every `{{variable}}` from `context` in a single pass, so
    /// substituted text is never re-scanned for placeholders.
    pub fn render(&self, context: &serde_json::Value) -> Result<String, CollaboratorError> {
        if let Some(missing) = self.variables.iter().find(|var| context.get(var.as_str()).is_none()) {
            return Err(CollaboratorError::Prompt(format!("Missing variable: {}", missing)));
        }

        let rendered = PLACEHOLDER.replace_all(&self.template, |cap: &Captures| {
            match context.get(&cap[1]) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
                None => cap[0].to_string(),
            }
        });

        Ok(rendered.into_owned())
    }
}
