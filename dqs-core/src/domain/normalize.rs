//! Builds [`ExtractedMetadata`] from an arbitrary JSON payload.
//!
//! Only recognised keys are read at each nesting level; everything else is
//! ignored. Sections are decoded in a fixed order and the first violation
//! aborts normalization with [`CoreError::Validation`] naming its JSON path.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};
use validator::Validate;

use super::metadata::*;
use crate::error::{CoreError, Result};

impl ExtractedMetadata {
    /// Normalize a raw payload.
    ///
    /// Order: dataset, columns, numeric_stats, categorical_stats,
    /// temporal_stats, patterns, cross_column_stats, compliance_flags.
    pub fn normalize(raw: &Value) -> Result<Self> {
        let root = Fields::of(raw, "")?;

        let dataset = root.required("dataset", decode_dataset)?;
        let columns = root
            .optional("columns", |value, path| list(value, path, decode_column))?
            .unwrap_or_default();
        let numeric_stats = root.stats("numeric_stats", decode_numeric)?;
        let categorical_stats = root.stats("categorical_stats", decode_categorical)?;
        let temporal_stats = root.stats("temporal_stats", decode_temporal)?;
        let patterns = root.stats("patterns", decode_pattern)?;
        let cross_column_stats = root.optional("cross_column_stats", decode_cross_column)?.flatten();
        let compliance_flags = root
            .optional("compliance_flags", decode_compliance)?
            .unwrap_or_default();

        Ok(Self {
            dataset,
            columns,
            numeric_stats,
            categorical_stats,
            temporal_stats,
            patterns,
            cross_column_stats,
            compliance_flags,
        })
    }
}

// ============================================================================
// Sections
// ============================================================================

fn decode_dataset(value: &Value, path: &str) -> Result<DatasetDescriptor> {
    let fields = Fields::of(value, path)?;
    let dataset = DatasetDescriptor {
        dataset_id: fields.required("dataset_id", dataset_id)?,
        dataset_name: fields.required("dataset_name", string)?,
        row_count: fields.required("row_count", integer)?,
        column_count: fields.required("column_count", integer)?,
        detected_domain: fields
            .optional("detected_domain", string)?
            .unwrap_or_else(|| DEFAULT_DETECTED_DOMAIN.to_string()),
        ingestion_timestamp: fields.required("ingestion_timestamp", timestamp)?,
    };
    check(&dataset, path)?;
    Ok(dataset)
}

fn decode_column(value: &Value, path: &str) -> Result<ColumnDescriptor> {
    let fields = Fields::of(value, path)?;
    Ok(ColumnDescriptor {
        column_name: fields.required("column_name", string)?,
        inferred_data_type: fields.required("inferred_data_type", string)?,
        null_count: fields.or_default("null_count", integer)?,
        null_ratio: fields.or_default("null_ratio", float)?,
        unique_count: fields.or_default("unique_count", integer)?,
        unique_ratio: fields.or_default("unique_ratio", float)?,
        sample_values_masked: fields.or_default("sample_values_masked", |v, p| list(v, p, string))?,
    })
}

fn decode_numeric(value: &Value, path: &str) -> Result<NumericStats> {
    let fields = Fields::of(value, path)?;
    Ok(NumericStats {
        min_value: fields.optional("min_value", float)?,
        max_value: fields.optional("max_value", float)?,
        mean: fields.optional("mean", float)?,
        negative_value_ratio: fields.or_default("negative_value_ratio", float)?,
    })
}

fn decode_categorical(value: &Value, path: &str) -> Result<CategoricalStats> {
    let fields = Fields::of(value, path)?;
    Ok(CategoricalStats {
        distinct_values: fields.required("distinct_values", integer)?,
        top_values: fields.required("top_values", top_values)?,
    })
}

fn decode_temporal(value: &Value, path: &str) -> Result<TemporalStats> {
    let fields = Fields::of(value, path)?;
    Ok(TemporalStats {
        min_timestamp: fields.optional("min_timestamp", timestamp)?,
        max_timestamp: fields.optional("max_timestamp", timestamp)?,
        future_timestamp_ratio: fields.or_default("future_timestamp_ratio", float)?,
        stale_record_ratio: fields.or_default("stale_record_ratio", float)?,
    })
}

fn decode_pattern(value: &Value, path: &str) -> Result<PatternStats> {
    let fields = Fields::of(value, path)?;
    Ok(PatternStats {
        regex_match_ratio: fields.or_default("regex_match_ratio", float)?,
    })
}

/// `{}` means nothing was reported, same as an absent key.
fn decode_cross_column(value: &Value, path: &str) -> Result<Option<CrossColumnStats>> {
    let fields = Fields::of(value, path)?;
    if fields.map.is_empty() {
        return Ok(None);
    }
    Ok(Some(CrossColumnStats {
        duplicates_detected: fields.or_default("duplicates_detected", boolean)?,
        dependent_nulls: fields.or_default("dependent_nulls", |v, p| list(v, p, column_pair))?,
    }))
}

fn decode_compliance(value: &Value, path: &str) -> Result<ComplianceFlags> {
    let fields = Fields::of(value, path)?;
    Ok(ComplianceFlags {
        kyc_fields_present: fields.or_default("kyc_fields_present", boolean)?,
        monetary_fields_present: fields.or_default("monetary_fields_present", boolean)?,
        personal_data_present: fields.or_default("personal_data_present", boolean)?,
    })
}

// ============================================================================
// Field access
// ============================================================================

/// Recognised-key view over one JSON object. `null` reads as absent.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn of(value: &'a Value, path: &'a str) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(mismatch(path, "an object", other)),
        }
    }

    fn child_path(&self, key: &str) -> String {
        join(self.path, key)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn required<T>(&self, key: &str, decode: impl Fn(&Value, &str) -> Result<T>) -> Result<T> {
        let path = self.child_path(key);
        match self.get(key) {
            Some(value) => decode(value, &path),
            None => Err(CoreError::Validation(format!("{}: missing required field", path))),
        }
    }

    fn optional<T>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &str) -> Result<T>,
    ) -> Result<Option<T>> {
        self.get(key)
            .map(|value| decode(value, &self.child_path(key)))
            .transpose()
    }

    fn or_default<T: Default>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &str) -> Result<T>,
    ) -> Result<T> {
        Ok(self.optional(key, decode)?.unwrap_or_default())
    }

    /// Mapping of column name to a stats bundle; each entry decoded in key order.
    fn stats<T>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &str) -> Result<T>,
    ) -> Result<BTreeMap<String, T>> {
        let Some(value) = self.get(key) else {
            return Ok(BTreeMap::new());
        };
        let path = self.child_path(key);
        let entries = Fields::of(value, &path)?;

        entries
            .map
            .iter()
            .map(|(column, stats)| Ok((column.clone(), decode(stats, &join(&path, column))?)))
            .collect()
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn check<T: Validate>(value: &T, path: &str) -> Result<()> {
    value.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let detail = fields
            .first()
            .and_then(|(field, errs)| errs.first().map(|err| format!("{}: {}", join(path, field), err)))
            .unwrap_or_else(|| format!("{}: {}", path, errors));
        CoreError::Validation(detail)
    })
}

// ============================================================================
// Primitive coercions
// ============================================================================

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn mismatch(path: &str, expected: &str, found: &Value) -> CoreError {
    let path = if path.is_empty() { "payload" } else { path };
    CoreError::Validation(format!(
        "{}: expected {}, found {}",
        path,
        expected,
        describe(found)
    ))
}

fn string(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(mismatch(path, "a string", other)),
    }
}

fn integer(value: &Value, path: &str) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(path, "an integer", value))
}

fn float(value: &Value, path: &str) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| mismatch(path, "a finite number", value))
}

fn boolean(value: &Value, path: &str) -> Result<bool> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" | "t" | "y" => Some(true),
            "false" | "no" | "off" | "0" | "f" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(path, "a boolean", value))
}

fn dataset_id(value: &Value, path: &str) -> Result<DatasetId> {
    Ok(DatasetId::parse(&string(value, path)?))
}

fn timestamp(value: &Value, path: &str) -> Result<Timestamp> {
    match value {
        Value::String(raw) => Ok(Timestamp::parse(raw)),
        Value::Number(n) => n
            .as_i64()
            .map(|secs| (secs, 0))
            .or_else(|| n.as_f64().and_then(split_unix_seconds))
            .and_then(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).single())
            .map(|dt| Timestamp::Zoned(dt.fixed_offset()))
            .ok_or_else(|| mismatch(path, "a timestamp", value)),
        other => Err(mismatch(path, "a timestamp or string", other)),
    }
}

/// Fractional unix seconds as whole seconds plus nanoseconds.
fn split_unix_seconds(secs: f64) -> Option<(i64, u32)> {
    if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    Some((whole as i64, nanos))
}

fn list<T>(value: &Value, path: &str, decode: impl Fn(&Value, &str) -> Result<T>) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| decode(item, &format!("{}[{}]", path, idx)))
            .collect(),
        other => Err(mismatch(path, "an array", other)),
    }
}

fn column_pair(value: &Value, path: &str) -> Result<(String, String)> {
    match value {
        Value::Array(items) if items.len() == 2 => Ok((
            string(&items[0], &format!("{}[0]", path))?,
            string(&items[1], &format!("{}[1]", path))?,
        )),
        other => Err(mismatch(path, "a pair of column names", other)),
    }
}

fn top_values(value: &Value, path: &str) -> Result<TopValues> {
    match value {
        Value::Array(_) => Ok(TopValues::Ranked(list(value, path, string)?)),
        Value::Object(counts) => counts
            .iter()
            .map(|(label, count)| Ok((label.clone(), integer(count, &join(path, label))?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(TopValues::Counts),
        other => Err(mismatch(path, "a list of values or a mapping of value counts", other)),
    }
}
