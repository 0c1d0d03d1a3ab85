use job_manifest::*;
use serde_json::json;
use std::io::Write;
use test_utils::*;

/// Manifest parser tests: JSON/YAML loading, typing, error categories

#[test]
fn test_parse_json_manifest() {
    let manifest = ManifestParser::from_json(&base_manifest().to_string()).unwrap();
    assert_eq!(manifest.request_type, RequestType::ImageLabelBinary);
    assert_eq!(manifest.job_mode, JobMode::Batch);
    assert_eq!(manifest.task_bid_price.as_str(), "1");
    assert_eq!(manifest.oracle_stake.as_str(), "0.05");
}

#[test]
fn test_decimal_text_accepted() {
    let document = manifest_with(json!({"task_bid_price": "12.50", "oracle_stake": " 3 "}));
    let manifest = ManifestParser::from_json(&document.to_string()).unwrap();
    assert_eq!(manifest.task_bid_price.as_str(), "12.50");
    assert_eq!(manifest.oracle_stake.as_str(), "3");
}

#[test]
fn test_json_parsing_error_logging() {
    let _ = env_logger::try_init();

    let error = ManifestParser::from_json("").unwrap_err();
    assert!(error.to_string().contains("input string is empty"));

    let error =
        ManifestParser::from_json(r#"{"job_mode": "batch", "request_type": }"#).unwrap_err();
    assert!(error.to_string().contains("JSON parsing error"));
    assert!(error.to_string().contains("line 1"));

    let error = ManifestParser::from_json(r#"{"job_mode": "batch""#).unwrap_err();
    assert!(error.to_string().contains("Unexpected end of file"));
}

#[test]
fn test_invalid_data_structure() {
    let _ = env_logger::try_init();
    let document = manifest_with(json!({"job_total_tasks": "three"}));
    let error = ManifestParser::from_json(&document.to_string()).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::ShapeError);
    assert!(error.details().unwrap().contains("Invalid data structure"));

    let document = manifest_with(json!({"request_type": "image_label_sound"}));
    let error = ManifestParser::from_json(&document.to_string()).unwrap_err();
    assert!(error.details().unwrap().contains("image_label_sound"));
}

#[test]
fn test_nested_unknown_field() {
    let document = manifest_with(json!({
        "request_type": "multi_challenge",
        "multi_challenge_manifests": [{"request_type": "image_label_binary", "job_mode": "batch"}]
    }));
    let error = ManifestParser::from_json(&document.to_string()).unwrap_err();
    assert!(error.details().unwrap().contains("job_mode"));
}

#[test]
fn test_answer_set_order_preserved() {
    let document = manifest_with(json!({
        "requester_restricted_answer_set": {"zebra": {}, "apple": {}, "mango": {}}
    }));
    let manifest = ManifestParser::from_json(&document.to_string()).unwrap();
    let keys: Vec<_> = manifest
        .requester_restricted_answer_set
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["zebra", "apple", "mango"]);
}

#[test]
fn test_from_file() {
    let _ = env_logger::try_init();
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{}", base_manifest()).unwrap();

    let manifest = ManifestParser::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(manifest.job_total_tasks, 3);

    let error = ManifestParser::from_file("").unwrap_err();
    assert!(error.to_string().contains("File path cannot be empty"));
}

#[test]
fn test_unknown_extension_defaults_to_json() {
    let mut file = tempfile::Builder::new().suffix(".manifest").tempfile().unwrap();
    write!(file, "{}", base_manifest()).unwrap();
    assert!(ManifestParser::from_file(file.path().to_str().unwrap()).is_ok());
}

#[cfg(not(feature = "yaml-support"))]
#[test]
fn test_yaml_requires_feature() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(file, "job_mode: batch").unwrap();
    let error = ManifestParser::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(error.to_string().contains("YAML support not enabled"));
}

#[cfg(feature = "yaml-support")]
#[test]
fn test_parse_yaml_manifest() {
    let yaml = format!(
        "job_mode: batch\nrequest_type: image_label_area_select\njob_total_tasks: 2\n\
         task_bid_price: 0.5\noracle_stake: 0.05\nrecording_oracle_addr: \"{0}\"\n\
         reputation_oracle_addr: \"{0}\"\nreputation_agent_addr: \"{0}\"\n",
        ORACLE_ADDR
    );
    let manifest = ManifestParser::from_yaml(&yaml).unwrap();
    assert_eq!(manifest.request_type, RequestType::ImageLabelAreaSelect);
    assert_eq!(manifest.job_total_tasks, 2);
}

#[test]
fn test_to_json_roundtrip() {
    let manifest = ManifestParser::from_json(&base_manifest().to_string()).unwrap();
    let json = ManifestParser::to_json(&manifest).unwrap();
    assert_eq!(ManifestParser::from_json(&json).unwrap(), manifest);
}
