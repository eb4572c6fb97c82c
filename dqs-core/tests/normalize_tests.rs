use dqs_core::{
    ComplianceFlags, CoreError, CrossColumnStats, DatasetId, ExtractedMetadata, ReasoningInput,
    Timestamp, TopValues,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::*;
use serde_json::{json, Value};
use uuid::Uuid;

// ===== Fixtures =====

fn base_payload() -> Value {
    json!({
        "dataset": {
            "dataset_id": "d1",
            "dataset_name": "x",
            "row_count": 10,
            "column_count": 2,
            "ingestion_timestamp": "2024-01-01T00:00:00"
        },
        "compliance_flags": {}
    })
}

#[fixture]
fn minimal_payload() -> Value {
    base_payload()
}

#[fixture]
fn full_payload() -> Value {
    json!({
        "dataset": {
            "dataset_id": "6f1c2a7e-9b1d-4c55-8a0e-2f4f6f0d9a11",
            "dataset_name": "card_transactions",
            "row_count": 1000,
            "column_count": 4,
            "detected_domain": "Unknown",
            "ingestion_timestamp": "2024-05-01T12:30:00Z"
        },
        "columns": [
            {
                "column_name": "txn_id",
                "inferred_data_type": "string",
                "null_count": 0,
                "null_ratio": 0.0,
                "unique_count": 1000,
                "unique_ratio": 1.0,
                "sample_values_masked": ["***", "***", "***"]
            },
            {
                "column_name": "amount",
                "inferred_data_type": "numeric",
                "null_count": 12,
                "null_ratio": 0.012
            }
        ],
        "numeric_stats": {
            "amount": {"min_value": -5.0, "max_value": 9800.5, "mean": 112.4, "negative_value_ratio": 0.01}
        },
        "categorical_stats": {
            "currency": {"distinct_values": 3, "top_values": ["USD", "EUR", "GBP"]}
        },
        "temporal_stats": {
            "created_at": {
                "min_timestamp": "2021-01-01T00:00:00.000Z",
                "max_timestamp": "2024-05-01T00:00:00.000Z",
                "future_timestamp_ratio": 0.0,
                "stale_record_ratio": 0.4
            }
        },
        "patterns": {
            "txn_id": {"regex_match_ratio": 0.97}
        },
        "cross_column_stats": {
            "duplicates_detected": true,
            "dependent_nulls": [["amount", "currency"]]
        },
        "compliance_flags": {
            "kyc_fields_present": false,
            "monetary_fields_present": true,
            "personal_data_present": true
        }
    })
}

fn validation_reason(result: Result<ExtractedMetadata, CoreError>) -> String {
    match result {
        Err(CoreError::Validation(reason)) => reason,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

// ===== Defaults =====

#[rstest]
fn test_minimal_payload_applies_defaults(minimal_payload: Value) {
    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();

    assert_eq!(metadata.dataset.dataset_id, DatasetId::Opaque("d1".to_string()));
    assert_eq!(metadata.dataset.detected_domain, "Payments");
    assert!(metadata.columns.is_empty());
    assert!(metadata.numeric_stats.is_empty());
    assert!(metadata.categorical_stats.is_empty());
    assert!(metadata.temporal_stats.is_empty());
    assert!(metadata.patterns.is_empty());
    assert!(metadata.cross_column_stats.is_none());
    assert_eq!(metadata.compliance_flags, ComplianceFlags::default());
}

#[rstest]
fn test_compliance_flags_key_may_be_omitted(mut minimal_payload: Value) {
    minimal_payload.as_object_mut().unwrap().remove("compliance_flags");

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert_eq!(metadata.compliance_flags, ComplianceFlags::default());
}

#[rstest]
fn test_null_sections_read_as_absent(mut minimal_payload: Value) {
    let root = minimal_payload.as_object_mut().unwrap();
    root.insert("columns".to_string(), Value::Null);
    root.insert("numeric_stats".to_string(), Value::Null);
    root.insert("cross_column_stats".to_string(), Value::Null);
    root.insert("compliance_flags".to_string(), Value::Null);

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert!(metadata.columns.is_empty());
    assert!(metadata.numeric_stats.is_empty());
    assert!(metadata.cross_column_stats.is_none());
}

#[rstest]
fn test_column_defaults(mut minimal_payload: Value) {
    minimal_payload["columns"] = json!([
        {"column_name": "amount", "inferred_data_type": "numeric", "null_ratio": null}
    ]);

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    let column = &metadata.columns[0];
    assert_eq!(column.null_count, 0);
    assert_eq!(column.null_ratio, 0.0);
    assert_eq!(column.unique_count, 0);
    assert_eq!(column.unique_ratio, 0.0);
    assert!(column.sample_values_masked.is_empty());
}

// ===== Full payload =====

#[rstest]
fn test_full_payload_normalizes(full_payload: Value) {
    let metadata = ExtractedMetadata::normalize(&full_payload).unwrap();

    assert_eq!(
        metadata.dataset.dataset_id,
        DatasetId::Uuid(Uuid::parse_str("6f1c2a7e-9b1d-4c55-8a0e-2f4f6f0d9a11").unwrap())
    );
    assert!(matches!(metadata.dataset.ingestion_timestamp, Timestamp::Zoned(_)));
    assert_eq!(metadata.dataset.detected_domain, "Unknown");

    let names: Vec<&str> = metadata.columns.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(names, vec!["txn_id", "amount"]);

    assert_eq!(metadata.numeric_stats["amount"].min_value, Some(-5.0));
    assert_eq!(
        metadata.categorical_stats["currency"].top_values,
        TopValues::Ranked(vec!["USD".into(), "EUR".into(), "GBP".into()])
    );
    assert_eq!(metadata.temporal_stats["created_at"].stale_record_ratio, 0.4);
    assert_eq!(metadata.patterns["txn_id"].regex_match_ratio, 0.97);

    let cross = metadata.cross_column_stats.as_ref().unwrap();
    assert!(cross.duplicates_detected);
    assert_eq!(cross.dependent_nulls, vec![("amount".to_string(), "currency".to_string())]);

    assert!(metadata.compliance_flags.monetary_fields_present);
    assert!(metadata.compliance_flags.personal_data_present);
    assert!(!metadata.compliance_flags.kyc_fields_present);
}

#[rstest]
fn test_stats_keys_need_not_match_columns(mut minimal_payload: Value) {
    minimal_payload["patterns"] = json!({"ghost_column": {"regex_match_ratio": 0.5}});

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert!(metadata.columns.is_empty());
    assert_eq!(metadata.patterns["ghost_column"].regex_match_ratio, 0.5);
}

#[rstest]
fn test_categorical_top_values_as_counts(mut minimal_payload: Value) {
    minimal_payload["categorical_stats"] =
        json!({"status": {"distinct_values": "2", "top_values": {"ok": 90, "failed": "10"}}});

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    let stats = &metadata.categorical_stats["status"];
    assert_eq!(stats.distinct_values, 2);
    match &stats.top_values {
        TopValues::Counts(counts) => {
            assert_eq!(counts["ok"], 90);
            assert_eq!(counts["failed"], 10);
        }
        other => panic!("expected counts, got {:?}", other),
    }
}

#[rstest]
fn test_ratios_are_not_range_checked(mut minimal_payload: Value) {
    minimal_payload["columns"] =
        json!([{"column_name": "a", "inferred_data_type": "string", "null_ratio": 3.5}]);

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert_eq!(metadata.columns[0].null_ratio, 3.5);
}

#[rstest]
fn test_numeric_strings_are_coerced(mut minimal_payload: Value) {
    minimal_payload["dataset"]["row_count"] = json!("250");
    minimal_payload["compliance_flags"] = json!({"kyc_fields_present": "yes"});

    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert_eq!(metadata.dataset.row_count, 250);
    assert!(metadata.compliance_flags.kyc_fields_present);
}

// ===== Cross-column presence =====

#[rstest]
fn test_cross_column_absent_when_omitted(minimal_payload: Value) {
    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert_eq!(metadata.cross_column_stats, None);
}

#[rstest]
fn test_cross_column_absent_when_empty(mut minimal_payload: Value) {
    minimal_payload["cross_column_stats"] = json!({});
    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert_eq!(metadata.cross_column_stats, None);
}

#[rstest]
fn test_cross_column_present_with_defaults(mut minimal_payload: Value) {
    minimal_payload["cross_column_stats"] = json!({"duplicates_detected": false});
    let metadata = ExtractedMetadata::normalize(&minimal_payload).unwrap();
    assert_eq!(metadata.cross_column_stats, Some(CrossColumnStats::default()));
}

// ===== Failures =====

#[rstest]
fn test_missing_dataset_fails(mut minimal_payload: Value) {
    minimal_payload.as_object_mut().unwrap().remove("dataset");

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, "dataset: missing required field");
}

#[test]
fn test_non_object_payload_fails() {
    let reason = validation_reason(ExtractedMetadata::normalize(&json!([1, 2])));
    assert_eq!(reason, "payload: expected an object, found array");
}

#[rstest]
#[case("dataset_id")]
#[case("dataset_name")]
#[case("row_count")]
#[case("column_count")]
#[case("ingestion_timestamp")]
fn test_missing_dataset_field_fails(mut minimal_payload: Value, #[case] field: &str) {
    minimal_payload["dataset"].as_object_mut().unwrap().remove(field);

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, format!("dataset.{}: missing required field", field));
}

#[rstest]
fn test_uncoercible_count_fails(mut minimal_payload: Value) {
    minimal_payload["dataset"]["row_count"] = json!("ten");

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, "dataset.row_count: expected an integer, found string \"ten\"");
}

#[rstest]
fn test_negative_count_fails(mut minimal_payload: Value) {
    minimal_payload["dataset"]["column_count"] = json!(-1);

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, "dataset.column_count: must not be negative");
}

#[rstest]
fn test_one_malformed_numeric_entry_fails_everything(mut full_payload: Value) {
    full_payload["numeric_stats"]["fee"] = json!({"mean": "abc"});

    let reason = validation_reason(ExtractedMetadata::normalize(&full_payload));
    assert_eq!(reason, "numeric_stats.fee.mean: expected a finite number, found string \"abc\"");
}

#[rstest]
fn test_stats_entry_must_be_object(mut minimal_payload: Value) {
    minimal_payload["temporal_stats"] = json!({"created_at": "2024"});

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert!(reason.starts_with("temporal_stats.created_at: expected an object"));
}

#[rstest]
fn test_columns_must_be_array(mut minimal_payload: Value) {
    minimal_payload["columns"] = json!({"column_name": "a"});

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, "columns: expected an array, found object");
}

#[rstest]
fn test_column_failure_reports_first_bad_entry(mut minimal_payload: Value) {
    minimal_payload["columns"] = json!([
        {"column_name": "a", "inferred_data_type": "string"},
        {"column_name": "b"},
        {"inferred_data_type": "string"}
    ]);

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, "columns[1].inferred_data_type: missing required field");
}

#[rstest]
fn test_dataset_is_checked_before_later_sections(mut minimal_payload: Value) {
    minimal_payload["dataset"]["dataset_name"] = json!(42);
    minimal_payload["columns"] = json!("bad");
    minimal_payload["compliance_flags"] = json!("bad");

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert!(reason.starts_with("dataset.dataset_name"));
}

#[rstest]
fn test_patterns_checked_before_cross_column(mut minimal_payload: Value) {
    minimal_payload["patterns"] = json!({"c": {"regex_match_ratio": []}});
    minimal_payload["cross_column_stats"] = json!({"dependent_nulls": [["only_one"]]});

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert!(reason.starts_with("patterns.c.regex_match_ratio"));
}

#[rstest]
fn test_malformed_dependent_null_pair(mut minimal_payload: Value) {
    minimal_payload["cross_column_stats"] = json!({"dependent_nulls": [["a", "b", "c"]]});

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert!(reason.starts_with("cross_column_stats.dependent_nulls[0]: expected a pair"));
}

#[rstest]
fn test_non_object_compliance_flags_fail(mut minimal_payload: Value) {
    minimal_payload["compliance_flags"] = json!(true);

    let reason = validation_reason(ExtractedMetadata::normalize(&minimal_payload));
    assert_eq!(reason, "compliance_flags: expected an object, found boolean true");
}

// ===== Unknown keys, idempotence, round-trip =====

#[rstest]
fn test_unknown_keys_are_dropped(mut full_payload: Value) {
    full_payload["owner"] = json!("risk-team");
    full_payload["dataset"]["source_system"] = json!({"kind": "postgres"});
    full_payload["columns"][0]["pii"] = json!(true);
    full_payload["numeric_stats"]["amount"]["median"] = json!(80.0);
    full_payload["cross_column_stats"]["correlations"] = json!([]);
    full_payload["compliance_flags"]["gdpr"] = json!("maybe");

    let with_extras = ExtractedMetadata::normalize(&full_payload).unwrap();
    let value = with_extras.to_value().unwrap();
    assert!(value.get("owner").is_none());
    assert!(value["dataset"].get("source_system").is_none());
    assert!(value["numeric_stats"]["amount"].get("median").is_none());
}

#[rstest]
fn test_normalize_is_idempotent(full_payload: Value) {
    let first = ExtractedMetadata::normalize(&full_payload).unwrap();
    let second = ExtractedMetadata::normalize(&full_payload).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn test_serialized_form_normalizes_back(full_payload: Value, minimal_payload: Value) {
    for payload in [full_payload, minimal_payload] {
        let metadata = ExtractedMetadata::normalize(&payload).unwrap();
        let input = ReasoningInput::from_metadata(&metadata).unwrap();
        let again = ExtractedMetadata::normalize(&input.metadata).unwrap();
        assert_eq!(metadata, again);
    }
}

#[rstest]
fn test_serialized_form_keeps_populated_sections(full_payload: Value) {
    let metadata = ExtractedMetadata::normalize(&full_payload).unwrap();
    let value = metadata.to_value().unwrap();

    for key in [
        "dataset",
        "columns",
        "numeric_stats",
        "categorical_stats",
        "temporal_stats",
        "patterns",
        "cross_column_stats",
        "compliance_flags",
    ] {
        assert!(!value[key].is_null(), "{} was dropped", key);
    }
}

proptest! {
    #[test]
    fn prop_unknown_keys_never_reject(
        key in "[a-z_]{1,12}",
        extra in prop_oneof![
            Just(json!(null)),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[ -~]{0,16}".prop_map(Value::from),
        ],
    ) {
        prop_assume!(![
            "dataset", "columns", "numeric_stats", "categorical_stats",
            "temporal_stats", "patterns", "cross_column_stats", "compliance_flags",
            "dataset_id", "dataset_name", "row_count", "column_count",
            "detected_domain", "ingestion_timestamp",
            "kyc_fields_present", "monetary_fields_present", "personal_data_present",
        ].contains(&key.as_str()));

        let mut payload = base_payload();
        payload[key.as_str()] = extra.clone();
        payload["dataset"][key.as_str()] = extra.clone();
        payload["compliance_flags"][key.as_str()] = extra;

        prop_assert!(ExtractedMetadata::normalize(&payload).is_ok());
    }

    #[test]
    fn prop_row_count_roundtrips(rows in 0i64..1_000_000_000) {
        let mut payload = base_payload();
        payload["dataset"]["row_count"] = json!(rows.to_string());

        let metadata = ExtractedMetadata::normalize(&payload).unwrap();
        prop_assert_eq!(metadata.dataset.row_count, rows);
    }
}
