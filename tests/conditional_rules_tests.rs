use job_manifest::*;
use serde_json::json;
use test_utils::*;

/// Conditional rule tests over complete manifests, offline mode

fn offline(document: serde_json::Value) -> Result<ValidatedManifest> {
    let _ = env_logger::try_init();
    let stub = StubFetcher::new();
    stub_validator(&stub, ValidatorConfig::default())
        .validate_value(document, ValidationMode::Offline)
}

#[test]
fn test_base_manifest_accepted() {
    let validated = offline(base_manifest()).unwrap();
    assert_eq!(validated.manifest.request_type, RequestType::ImageLabelBinary);
    assert_eq!(validated.manifest.requester_max_repeats, 7);
}

#[test]
fn test_taskdata_and_taskdata_uri_exclusive() {
    let document = manifest_with(json!({
        "taskdata": [taskdata_entry("https://domain.com/file1.jpeg")],
        "taskdata_uri": "https://domain.com/taskdata.json"
    }));
    let error = offline(document).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::RuleViolation);
    assert_eq!(error.stage, ValidationStage::Rule);
    assert!(error.details().unwrap().contains("https://domain.com/taskdata.json"));

    let only_inline =
        manifest_with(json!({"taskdata": [taskdata_entry("https://domain.com/file1.jpeg")]}));
    assert!(offline(only_inline).is_ok());

    let only_uri = manifest_with(json!({"taskdata_uri": "https://domain.com/taskdata.json"}));
    assert!(offline(only_uri).is_ok());

    // Neither is legal as far as this rule is concerned
    assert!(offline(base_manifest()).is_ok());
}

#[test]
fn test_groundtruth_and_groundtruth_uri_exclusive() {
    let document = manifest_with(json!({
        "groundtruth": "{\"https://domain.com/1.jpg\": [\"true\"]}",
        "groundtruth_uri": "https://domain.com/groundtruth.json"
    }));
    let error = offline(document).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::RuleViolation);
    assert_eq!(error.details(), Some("Specify only groundtruth_uri or groundtruth, not both."));
}

#[test]
fn test_multiple_choice_answer_set_cardinality() {
    let with_answers = |count: usize| {
        manifest_with(json!({
            "request_type": "image_label_multiple_choice",
            "requester_restricted_answer_set": answer_set(count)
        }))
    };

    let error = offline(with_answers(1)).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::RuleViolation);
    assert!(error.details().unwrap().contains("needs at least 2+ options"));

    assert!(offline(with_answers(2)).is_ok());
    assert!(offline(with_answers(4)).is_ok());

    let error = offline(with_answers(5)).unwrap_err();
    assert!(error.details().unwrap().contains("can not handle more than 4 options"));
}

#[test]
fn test_area_select_default_label_injected() {
    let document = manifest_with(json!({"request_type": "image_label_area_select"}));
    let validated = offline(document).unwrap();
    let answers = validated.manifest.requester_restricted_answer_set.unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers.get("label"), Some(&json!({})));

    let explicit = manifest_with(json!({
        "request_type": "image_label_area_select",
        "requester_restricted_answer_set": {"dog": {"en": "Dog"}}
    }));
    let validated = offline(explicit).unwrap();
    let answers = validated.manifest.requester_restricted_answer_set.unwrap();
    assert!(answers.contains_key("dog"));
    assert!(!answers.contains_key("label"));
}

#[test]
fn test_choice_bounds_inverted() {
    let document = manifest_with(json!({
        "request_type": "image_label_multiple_choice",
        "requester_restricted_answer_set": answer_set(3),
        "request_config": {
            "multiple_choice_min_choices": 3,
            "multiple_choice_max_choices": 2
        }
    }));
    let error = offline(document).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::RuleViolation);
    assert_eq!(error.field(), Some("request_config.multiple_choice_min_choices"));
}

#[test]
fn test_multi_challenge_requires_nested_manifests() {
    let empty = manifest_with(json!({
        "request_type": "multi_challenge",
        "multi_challenge_manifests": []
    }));
    let error = offline(empty).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::RuleViolation);

    let single = manifest_with(json!({
        "request_type": "multi_challenge",
        "multi_challenge_manifests": [{
            "request_type": "image_label_area_select",
            "requester_question": {"en": "select the cat"}
        }]
    }));
    let validated = offline(single).unwrap();
    let nested = validated.manifest.nested();
    assert_eq!(nested.len(), 1);
    assert!(nested[0]
        .requester_restricted_answer_set
        .as_ref()
        .unwrap()
        .contains_key("label"));
}

#[test]
fn test_nested_rule_failure_is_prefixed() {
    let document = manifest_with(json!({
        "request_type": "multi_challenge",
        "multi_challenge_manifests": [
            {"request_type": "image_label_binary"},
            {
                "request_type": "image_label_binary",
                "groundtruth": "{}",
                "groundtruth_uri": "https://domain.com/groundtruth.json"
            }
        ]
    }));
    let error = offline(document).unwrap_err();
    assert_eq!(error.field(), Some("multi_challenge_manifests[1].groundtruth"));
}

#[test]
fn test_question_example_lists() {
    let list = json!(["https://domain.com/1.jpg", "https://domain.com/2.jpg"]);

    let binary = manifest_with(json!({"requester_question_example": list.clone()}));
    assert!(offline(binary).is_ok());

    let choice = manifest_with(json!({
        "request_type": "image_label_multiple_choice",
        "requester_restricted_answer_set": answer_set(2),
        "requester_question_example": list
    }));
    let error = offline(choice).unwrap_err();
    assert_eq!(error.details(), Some("Lists are not allowed in this challenge type"));

    let single = manifest_with(json!({
        "request_type": "image_label_multiple_choice",
        "requester_restricted_answer_set": answer_set(2),
        "requester_question_example": "https://domain.com/1.jpg"
    }));
    assert!(offline(single).is_ok());
}

#[test]
fn test_missing_discriminator() {
    let mut document = base_manifest();
    document.as_object_mut().unwrap().remove("request_type");
    let error = offline(document).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::MissingDiscriminator);
    assert_eq!(error.stage, ValidationStage::Shape);

    let empty = manifest_with(json!({"job_mode": ""}));
    let error = offline(empty).unwrap_err();
    assert_eq!(error.code, ManifestErrorCode::MissingDiscriminator);
    assert_eq!(error.field(), Some("job_mode"));
}

#[test]
fn test_shape_errors_precede_rules() {
    // Both a bad price and a rule violation: the shape stage reports first
    let document = manifest_with(json!({
        "task_bid_price": "a lot",
        "groundtruth": "{}",
        "groundtruth_uri": "https://domain.com/groundtruth.json"
    }));
    let error = offline(document).unwrap_err();
    assert_eq!(error.stage, ValidationStage::Shape);
    assert_eq!(error.field(), Some("task_bid_price"));
}
