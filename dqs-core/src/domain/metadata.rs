//! Dataset-quality metadata as submitted by callers.
//!
//! Every section here is a plain value object. Construction from untyped JSON
//! lives in [`crate::domain::normalize`]; this module only fixes the shape and
//! the defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;

pub const DEFAULT_DETECTED_DOMAIN: &str = "Payments";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Dataset identifier: a UUID when the caller sent one, otherwise kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetId {
    Uuid(Uuid),
    Opaque(String),
}

impl DatasetId {
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(uuid) => DatasetId::Uuid(uuid),
            Err(_) => DatasetId::Opaque(raw.to_string()),
        }
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetId::Uuid(uuid) => write!(f, "{}", uuid),
            DatasetId::Opaque(raw) => write!(f, "{}", raw),
        }
    }
}

/// A point in time when the input was recognisable as one, else the raw text.
///
/// Deserialization goes through [`Timestamp::parse`], so a value survives a
/// serde round trip with the same variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Text(String),
}

impl Timestamp {
    /// RFC 3339 keeps its offset, naive ISO-8601 stays naive, anything else is text.
    pub fn parse(raw: &str) -> Self {
        if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
            return Timestamp::Zoned(zoned);
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(Timestamp::Naive)
            .unwrap_or_else(|| Timestamp::Text(raw.to_string()))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Timestamp::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DatasetDescriptor {
    pub dataset_id: DatasetId,
    pub dataset_name: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub row_count: i64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub column_count: i64,
    pub detected_domain: String,
    pub ingestion_timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub column_name: String,
    pub inferred_data_type: String,
    #[serde(default)]
    pub null_count: i64,
    #[serde(default)]
    pub null_ratio: f64,
    #[serde(default)]
    pub unique_count: i64,
    #[serde(default)]
    pub unique_ratio: f64,
    #[serde(default)]
    pub sample_values_masked: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub negative_value_ratio: f64,
}

/// Most frequent values of a categorical column, either ranked or with counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopValues {
    Ranked(Vec<String>),
    Counts(BTreeMap<String, i64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub distinct_values: i64,
    pub top_values: TopValues,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalStats {
    #[serde(default)]
    pub min_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub max_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub future_timestamp_ratio: f64,
    #[serde(default)]
    pub stale_record_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStats {
    #[serde(default)]
    pub regex_match_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossColumnStats {
    #[serde(default)]
    pub duplicates_detected: bool,
    /// Column pairs whose nulls tend to appear together.
    #[serde(default)]
    pub dependent_nulls: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFlags {
    #[serde(default)]
    pub kyc_fields_present: bool,
    #[serde(default)]
    pub monetary_fields_present: bool,
    #[serde(default)]
    pub personal_data_present: bool,
}

/// Root aggregate handed to the reasoning collaborator.
///
/// Stats mappings are keyed by column name but are not cross-checked against
/// `columns`; a key without a matching column is accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub dataset: DatasetDescriptor,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub numeric_stats: BTreeMap<String, NumericStats>,
    #[serde(default)]
    pub categorical_stats: BTreeMap<String, CategoricalStats>,
    #[serde(default)]
    pub temporal_stats: BTreeMap<String, TemporalStats>,
    #[serde(default)]
    pub patterns: BTreeMap<String, PatternStats>,
    #[serde(default)]
    pub cross_column_stats: Option<CrossColumnStats>,
    #[serde(default)]
    pub compliance_flags: ComplianceFlags,
}

impl ExtractedMetadata {
    /// Serialize into a nested JSON mapping.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
