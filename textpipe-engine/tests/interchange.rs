//! Import validation of export files
//!
//! Import is all or nothing: every case below must be rejected as a whole with the coarse
//! error category, never partially loaded.

use rstest::rstest;
use serde_json::{json, Value};
use textpipe_engine::{
    export_json, import_json, InterchangeError, OperationId, TransformationPipeline,
    CURRENT_VERSION,
};

fn valid_envelope() -> Value {
    json!({
        "version": CURRENT_VERSION,
        "exportedAt": "2024-05-01T12:00:00.000Z",
        "pipelines": [{
            "id": "p1",
            "name": "Clean list",
            "icon": "🧹",
            "steps": [
                { "id": "s1", "operationId": "trim", "config": { "lines": true }, "enabled": true },
                { "id": "s2", "operationId": "dedupe-lines", "config": {}, "enabled": false }
            ]
        }]
    })
}

fn with(mut envelope: Value, pointer: &str, value: Value) -> Value {
    if let Some(slot) = envelope.pointer_mut(pointer) {
        *slot = value;
    }
    envelope
}

fn without(mut envelope: Value, parent: &str, key: &str) -> Value {
    if let Some(Value::Object(map)) = envelope.pointer_mut(parent) {
        map.remove(key);
    }
    envelope
}

#[test]
fn test_valid_file_imports() {
    let pipelines = import_json(&valid_envelope().to_string()).unwrap();
    assert_eq!(pipelines.len(), 1);
    let pipeline = &pipelines[0];
    assert_eq!(pipeline.name, "Clean list");
    assert_eq!(pipeline.steps[1].operation_id, OperationId::DedupeLines);
    assert!(!pipeline.steps[1].enabled);
}

#[test]
fn test_empty_pipeline_list_imports() {
    let envelope = with(valid_envelope(), "/pipelines", json!([]));
    assert_eq!(import_json(&envelope.to_string()).unwrap(), Vec::new());
}

#[test]
fn test_unknown_config_keys_survive_import() {
    let envelope = with(
        valid_envelope(),
        "/pipelines/0/steps/0/config",
        json!({ "lines": true, "futureOption": [1, 2] }),
    );
    let pipelines = import_json(&envelope.to_string()).unwrap();
    assert_eq!(
        pipelines[0].steps[0].config.get("futureOption"),
        Some(&json!([1, 2]))
    );
}

#[rstest]
#[case::date_only("2024-05-01")]
#[case::offset("2024-05-01T14:00:00+02:00")]
#[case::no_zone("2024-05-01T12:00:00")]
fn test_accepted_timestamps(#[case] timestamp: &str) {
    let envelope = with(valid_envelope(), "/exportedAt", json!(timestamp));
    assert!(import_json(&envelope.to_string()).is_ok());
}

#[rstest]
#[case::newer_version(with(valid_envelope(), "/version", json!(CURRENT_VERSION + 1)))]
#[case::older_version(with(valid_envelope(), "/version", json!(0)))]
#[case::string_version(with(valid_envelope(), "/version", json!("1")))]
#[case::bad_timestamp(with(valid_envelope(), "/exportedAt", json!("not a date")))]
#[case::missing_timestamp(without(valid_envelope(), "", "exportedAt"))]
#[case::pipelines_not_a_list(with(valid_envelope(), "/pipelines", json!({})))]
#[case::unknown_operation(with(valid_envelope(), "/pipelines/0/steps/0/operationId", json!("rot13")))]
#[case::missing_step_id(without(valid_envelope(), "/pipelines/0/steps/0", "id"))]
#[case::missing_config(without(valid_envelope(), "/pipelines/0/steps/0", "config"))]
#[case::missing_enabled(without(valid_envelope(), "/pipelines/0/steps/1", "enabled"))]
#[case::config_not_an_object(with(valid_envelope(), "/pipelines/0/steps/0/config", json!("lines")))]
#[case::enabled_not_a_bool(with(valid_envelope(), "/pipelines/0/steps/0/enabled", json!("yes")))]
#[case::duplicate_step_ids(with(valid_envelope(), "/pipelines/0/steps/1/id", json!("s1")))]
#[case::not_an_envelope(json!([1, 2, 3]))]
fn test_structural_violations_are_rejected(#[case] envelope: Value) {
    let result = import_json(&envelope.to_string());
    assert!(
        matches!(result, Err(InterchangeError::InvalidFormat)),
        "expected InvalidFormat for {}",
        envelope
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Invalid configuration format"
    );
}

#[rstest]
#[case("")]
#[case("{")]
#[case("version: 1")]
fn test_malformed_json_is_rejected(#[case] input: &str) {
    let err = import_json(input).unwrap_err();
    assert!(matches!(err, InterchangeError::InvalidJson));
    assert_eq!(err.to_string(), "Invalid JSON format");
}

#[test]
fn test_export_round_trip_keeps_order_and_flags() {
    let pipeline = TransformationPipeline::builder()
        .name("Numbered")
        .step(OperationId::FilterLines)
        .step(OperationId::SortLines)
        .step(OperationId::NumberLines)
        .build()
        .unwrap();
    let toggled = pipeline.toggle_step(&pipeline.steps[1].id.clone());

    for pretty in [false, true] {
        let json = export_json(&[toggled.clone(), pipeline.clone()], pretty).unwrap();
        let imported = import_json(&json).unwrap();
        assert_eq!(imported, vec![toggled.clone(), pipeline.clone()]);
    }
}

#[test]
fn test_export_envelope_shape() {
    let json = export_json(&[], false).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], json!(CURRENT_VERSION));
    assert!(value["exportedAt"].is_string());
    assert_eq!(value["pipelines"], json!([]));
}
