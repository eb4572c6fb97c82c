//! Target shape of the assessment the reasoning collaborator is asked to
//! produce, and the policy applied to its raw output.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CollaboratorError;

/// Data-quality axes the assessment reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Completeness,
    Accuracy,
    Consistency,
    Validity,
    Timeliness,
    Uniqueness,
    Integrity,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Completeness,
        Dimension::Accuracy,
        Dimension::Consistency,
        Dimension::Validity,
        Dimension::Timeliness,
        Dimension::Uniqueness,
        Dimension::Integrity,
    ];

    /// Dimensions that carry a numeric score. Integrity is narrative only.
    pub const SCORED: [Dimension; 6] = [
        Dimension::Completeness,
        Dimension::Accuracy,
        Dimension::Consistency,
        Dimension::Validity,
        Dimension::Timeliness,
        Dimension::Uniqueness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Completeness => "Completeness",
            Dimension::Accuracy => "Accuracy",
            Dimension::Consistency => "Consistency",
            Dimension::Validity => "Validity",
            Dimension::Timeliness => "Timeliness",
            Dimension::Uniqueness => "Uniqueness",
            Dimension::Integrity => "Integrity",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionIssue {
    pub issue: String,
    #[serde(default)]
    pub affected_columns: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RemediationAction {
    pub action: String,
    #[validate(range(min = 1, max = 3, message = "priority must be between 1 and 3"))]
    pub priority: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QualityAssessment {
    pub data_quality_issues: BTreeMap<String, DimensionIssue>,
    #[validate(length(equal = 3, message = "exactly 3 remediation actions are required"), nested)]
    pub remediation_actions: Vec<RemediationAction>,
    #[serde(default)]
    pub regulatory_compliance_risks: Vec<String>,
    #[validate(range(min = 0.0, max = 1.0, message = "composite_dqs must be within [0, 1]"))]
    pub composite_dqs: f64,
    pub dimension_scores: BTreeMap<String, f64>,
}

impl QualityAssessment {
    /// Structural and range checks beyond what deserialization enforces.
    pub fn check(&self) -> Result<(), CollaboratorError> {
        self.validate()
            .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;

        if let Some(missing) = Dimension::ALL
            .iter()
            .find(|d| !self.data_quality_issues.contains_key(d.as_str()))
        {
            return Err(CollaboratorError::MalformedResponse(format!(
                "data_quality_issues is missing the {} dimension",
                missing
            )));
        }

        for dimension in Dimension::SCORED {
            match self.dimension_scores.get(dimension.as_str()) {
                None => {
                    return Err(CollaboratorError::MalformedResponse(format!(
                        "dimension_scores is missing {}",
                        dimension
                    )))
                }
                Some(score) if !(0.0..=1.0).contains(score) => {
                    return Err(CollaboratorError::MalformedResponse(format!(
                        "dimension score for {} is outside [0, 1]: {}",
                        dimension, score
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// How collaborator output is turned into the `genai_insights` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightMode {
    /// Return the model's text verbatim.
    Raw,
    /// Return parsed JSON when the text is JSON, the text otherwise.
    #[default]
    Lenient,
    /// Require a valid [`QualityAssessment`].
    Strict,
}

impl FromStr for InsightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(InsightMode::Raw),
            "lenient" => Ok(InsightMode::Lenient),
            "strict" => Ok(InsightMode::Strict),
            other => Err(format!("unknown insight mode: {}", other)),
        }
    }
}

impl InsightMode {
    pub fn shape(&self, output: String) -> Result<Value, CollaboratorError> {
        match self {
            InsightMode::Raw => Ok(Value::String(output)),
            InsightMode::Lenient => Ok(serde_json::from_str(strip_code_fences(&output))
                .unwrap_or(Value::String(output))),
            InsightMode::Strict => {
                let assessment: QualityAssessment =
                    serde_json::from_str(strip_code_fences(&output))
                        .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;
                assessment.check()?;
                serde_json::to_value(assessment)
                    .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
            }
        }
    }
}

/// Models often wrap JSON in a Markdown fence; peel it off if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
