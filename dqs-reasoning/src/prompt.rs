use dqs_core::PromptTemplate;

pub const DATA_QUALITY_PROMPT_NAME: &str = "data-quality-assessment";

const DATA_QUALITY_TEMPLATE: &str = r#"
You are a data quality expert in the payments domain.

Given the extracted metadata of a dataset, do the following:
1. Identify key data quality issues across dimensions:
   - Completeness
   - Accuracy
   - Consistency
   - Validity
   - Timeliness
   - Uniqueness
   - Integrity
2. Provide a brief explanation for each issue in plain language.
3. Suggest 3 prioritized remediation actions.
4. Mention any regulatory or compliance risks if applicable.
5. Score each dimension except Integrity between 0 and 1, and give a
   composite data quality score between 0 and 1.

Dataset Metadata:
{{metadata}}

Respond with a single JSON object and nothing else, using exactly this shape:
{
  "data_quality_issues": {
    "<Dimension>": {"issue": "...", "affected_columns": ["..."], "description": "..."}
  },
  "remediation_actions": [
    {"action": "...", "priority": 1, "description": "..."}
  ],
  "regulatory_compliance_risks": ["..."],
  "composite_dqs": 0.0,
  "dimension_scores": {"<Dimension>": 0.0}
}
data_quality_issues must contain all seven dimensions, remediation_actions
exactly three entries with priorities 1 to 3, and dimension_scores the six
scored dimensions.
"#;

/// Prompt sent for every analysis request; its only variable is `metadata`.
pub fn data_quality_prompt() -> PromptTemplate {
    PromptTemplate::new(
        DATA_QUALITY_PROMPT_NAME,
        Some("Assess dataset metadata across the seven data-quality dimensions".to_string()),
        DATA_QUALITY_TEMPLATE,
    )
}
