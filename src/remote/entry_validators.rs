use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ManifestError, ValidationStage};
use crate::manifest::model::{QuestionExample, RestrictedAnswerSet, TaskData};
use crate::manifest::request_type::RequestType;
use crate::manifest::shape::ShapeValidator;
use crate::remote::content_type::ContentTypeChecker;

const ANSWER_EXAMPLE_URI: &str = "answer_example_uri";

#[derive(Deserialize)]
#[allow(dead_code)]
enum BinaryLabel {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct AreaSelectShape {
    entity_name: i64,
    entity_type: String,
    entity_coords: Vec<f64>,
}

fn remote_shape<S: Into<String>>(value: &Value, details: S) -> ManifestError {
    ManifestError::shape(details)
        .in_stage(ValidationStage::Remote)
        .with_context("value", value.clone())
}

fn typed<T: DeserializeOwned>(value: &Value, expected: &str) -> Result<T, ManifestError> {
    serde_json::from_value(value.clone())
        .map_err(|e| remote_shape(value, format!("expected {}: {}", expected, e)))
}

/// Shape of one ground truth entry; the entry key is the image URI when present
pub fn validate_groundtruth_entry(
    key: Option<&str>,
    value: &Value,
    request_type: RequestType,
    check_content_type: bool,
    checker: &ContentTypeChecker<'_>,
) -> Result<(), ManifestError> {
    match request_type {
        RequestType::ImageLabelBinary => {
            typed::<Vec<BinaryLabel>>(value, "a list of \"true\"/\"false\" labels")?;
        }
        RequestType::ImageLabelMultipleChoice => {
            typed::<Vec<Vec<String>>>(value, "a list of answer lists")?;
        }
        RequestType::ImageLabelAreaSelect => {
            typed::<Vec<Vec<AreaSelectShape>>>(value, "a list of shape lists")?;
        }
        _ => {}
    }

    if check_content_type {
        let uri = key.ok_or_else(|| {
            remote_shape(value, "groundtruth entry has no image URI key to check")
        })?;
        checker.check(uri)?;
    }

    Ok(())
}

/// One remote task data entry
pub fn validate_taskdata_entry(
    value: &Value,
    check_content_type: bool,
    checker: &ContentTypeChecker<'_>,
) -> Result<(), ManifestError> {
    let entry: TaskData = typed(value, "a taskdata object")?;
    ShapeValidator::check_task_data(&entry).map_err(|e| e.in_stage(ValidationStage::Remote))?;

    if check_content_type {
        let uri = entry.datapoint_uri.as_deref().filter(|uri| !uri.is_empty()).ok_or_else(|| {
            remote_shape(value, "datapoint_uri is missing.").at_field("datapoint_uri")
        })?;
        checker.check(uri)?;
    }

    Ok(())
}

pub fn validate_question_example_uris(
    example: &QuestionExample,
    checker: &ContentTypeChecker<'_>,
) -> Result<(), ManifestError> {
    example.uris().into_iter().try_for_each(|uri| checker.check(uri))
}

/// Probe every `answer_example_uri` held by an answer entry
pub fn validate_answer_set_uris(
    answer_set: &RestrictedAnswerSet,
    checker: &ContentTypeChecker<'_>,
) -> Result<(), ManifestError> {
    for (key, answer) in answer_set {
        let uri = answer
            .get(ANSWER_EXAMPLE_URI)
            .and_then(Value::as_str)
            .filter(|uri| !uri.is_empty());
        if let Some(uri) = uri {
            checker
                .check(uri)
                .map_err(|e| e.at_field(format!("{}.{}", key, ANSWER_EXAMPLE_URI)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::error::{FetchError, ManifestErrorCode};
    use crate::remote::fetcher::ResourceFetcher;
    use serde_json::json;

    struct AllPng;

    impl ResourceFetcher for AllPng {
        fn get_json(&self, uri: &str) -> Result<Value, FetchError> {
            Err(FetchError::Status(uri.to_string(), 404))
        }

        fn head_content_type(&self, uri: &str) -> Result<Option<String>, FetchError> {
            if uri.ends_with(".html") {
                Ok(Some("text/html".to_string()))
            } else {
                Ok(Some("image/png".to_string()))
            }
        }
    }

    #[test]
    fn test_groundtruth_shapes() {
        let config = ValidatorConfig::default();
        let checker = ContentTypeChecker::new(&AllPng, &config);

        let binary = RequestType::ImageLabelBinary;
        let labels = json!(["true", "false"]);
        assert!(validate_groundtruth_entry(None, &labels, binary, false, &checker).is_ok());
        let error =
            validate_groundtruth_entry(None, &json!(["yes"]), binary, false, &checker).unwrap_err();
        assert_eq!(error.stage, ValidationStage::Remote);
        assert_eq!(error.code, ManifestErrorCode::ShapeError);

        let choice = RequestType::ImageLabelMultipleChoice;
        let labels = json!([["cat"], ["dog", "cat"]]);
        assert!(validate_groundtruth_entry(None, &labels, choice, false, &checker).is_ok());
        let flat = json!(["cat"]);
        assert!(validate_groundtruth_entry(None, &flat, choice, false, &checker).is_err());

        let area = RequestType::ImageLabelAreaSelect;
        let shape = json!([[
            {"entity_name": 0, "entity_type": "cat", "entity_coords": [1, 2.5, 3, 4]}
        ]]);
        assert!(validate_groundtruth_entry(None, &shape, area, false, &checker).is_ok());
        let bad = json!([[{"entity_name": "zero", "entity_type": "cat", "entity_coords": []}]]);
        assert!(validate_groundtruth_entry(None, &bad, area, false, &checker).is_err());

        let text = RequestType::TextFreeEntry;
        let anything = json!({"any": 1});
        assert!(validate_groundtruth_entry(None, &anything, text, false, &checker).is_ok());
    }

    #[test]
    fn test_groundtruth_content_type_needs_key() {
        let config = ValidatorConfig::default();
        let checker = ContentTypeChecker::new(&AllPng, &config);
        let binary = RequestType::ImageLabelBinary;

        let labels = json!(["true"]);
        let png = Some("https://x.com/a.png");
        assert!(validate_groundtruth_entry(png, &labels, binary, true, &checker).is_ok());
        assert!(validate_groundtruth_entry(None, &labels, binary, true, &checker).is_err());

        let html = Some("https://x.com/a.html");
        let error =
            validate_groundtruth_entry(html, &labels, binary, true, &checker).unwrap_err();
        assert_eq!(error.code, ManifestErrorCode::UnsupportedContentType);
        assert_eq!(checker.probes(), 2);
    }

    #[test]
    fn test_taskdata_entry() {
        let config = ValidatorConfig::default();
        let checker = ContentTypeChecker::new(&AllPng, &config);
        let entry = json!({
            "task_key": "407fdd93-687a-46bb-b578-89eb96b4109d",
            "datapoint_uri": "https://domain.com/file1.png",
            "datapoint_hash": "f4acbe8562907183a484498ba901bfe5c5503aaa"
        });
        assert!(validate_taskdata_entry(&entry, true, &checker).is_ok());

        let error =
            validate_taskdata_entry(&json!({"task_key": "nope"}), false, &checker).unwrap_err();
        assert_eq!(error.stage, ValidationStage::Remote);

        let text_only = json!({
            "task_key": "407fdd93-687a-46bb-b578-89eb96b4109d",
            "datapoint_hash": "f4acbe8562907183a484498ba901bfe5c5503aaa",
            "datapoint_text": {"en": "hello"}
        });
        assert!(validate_taskdata_entry(&text_only, false, &checker).is_ok());
        let error = validate_taskdata_entry(&text_only, true, &checker).unwrap_err();
        assert_eq!(error.field(), Some("datapoint_uri"));
    }

    #[test]
    fn test_example_and_answer_set_uris() {
        let config = ValidatorConfig::default();
        let checker = ContentTypeChecker::new(&AllPng, &config);

        let example =
            QuestionExample::Many(vec!["https://x.com/1.png".into(), "https://x.com/2.png".into()]);
        assert!(validate_question_example_uris(&example, &checker).is_ok());
        assert_eq!(checker.probes(), 2);

        let answers = json!({
            "cat": {"en": "Cat", "answer_example_uri": "https://x.com/cat.png"},
            "dog": {"en": "Dog", "answer_example_uri": "https://x.com/dog.html"}
        });
        let error = validate_answer_set_uris(answers.as_object().unwrap(), &checker).unwrap_err();
        assert_eq!(error.code, ManifestErrorCode::UnsupportedContentType);
        assert_eq!(error.field(), Some("dog.answer_example_uri"));
    }
}
