use regex::Regex;
use reqwest::Url;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::ManifestError;
use crate::manifest::model::{Decimal, Manifest, NestedManifest, RestrictedAnswerSet, TaskData};
use crate::manifest::request_type::RequestType;
use crate::utils::JsonUtils;

/// Collaborator validating one opaque sub-document (audience, webhook, internal config)
pub trait SubDocumentValidator {
    /// Manifest field holding the sub-document
    fn field(&self) -> &str;

    /// Validate and possibly rewrite the sub-document
    fn validate(&self, value: Value) -> Result<Value, ManifestError>;
}

/// Requires the named sub-document to be a JSON object
pub struct ObjectShape {
    field: String,
}

impl ObjectShape {
    pub fn new<S: Into<String>>(field: S) -> Self {
        Self { field: field.into() }
    }
}

impl SubDocumentValidator for ObjectShape {
    fn field(&self) -> &str {
        &self.field
    }

    fn validate(&self, value: Value) -> Result<Value, ManifestError> {
        if value.is_object() {
            Ok(value)
        } else {
            let details = format!(
                "{} must be an object, got {}",
                self.field,
                JsonUtils::type_name(&value)
            );
            Err(ManifestError::shape_field(self.field.clone(), value, details))
        }
    }
}

static DECIMAL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$"));

/// Leaf format checks that serde typing alone does not express
pub struct ShapeValidator;

impl ShapeValidator {
    const MIN_DATAPOINT_URI_LENGTH: usize = 10;
    const MIN_DATAPOINT_HASH_LENGTH: usize = 10;

    /// Reject documents whose discriminators are absent, null or empty
    pub fn check_discriminators(document: &Value) -> Result<(), ManifestError> {
        let root = document.as_object().ok_or_else(|| {
            ManifestError::shape(format!(
                "manifest must be a JSON object, got {}",
                JsonUtils::type_name(document)
            ))
        })?;

        for field in ["request_type", "job_mode"] {
            if !JsonUtils::is_present(root.get(field)) {
                return Err(ManifestError::missing_discriminator(field));
            }
        }

        if let Some(Value::Array(nested)) = root.get("multi_challenge_manifests") {
            // Non-object challenges are left to typing, which reports them as shape errors
            for (index, challenge) in nested.iter().enumerate() {
                let Some(challenge) = challenge.as_object() else {
                    continue;
                };
                if !JsonUtils::is_present(challenge.get("request_type")) {
                    return Err(ManifestError::missing_discriminator("request_type")
                        .under(format!("multi_challenge_manifests[{}]", index)));
                }
            }
        }

        Ok(())
    }

    /// Run collaborator validators over their sub-documents, in registration order
    pub fn apply_sub_validators(
        mut document: Value,
        validators: &[Box<dyn SubDocumentValidator>],
    ) -> Result<Value, ManifestError> {
        let Some(root) = document.as_object_mut() else {
            return Ok(document);
        };
        for validator in validators {
            let field = validator.field().to_string();
            if let Some(value) = root.remove(&field) {
                let value = validator.validate(value).map_err(|e| e.at_field(field.clone()))?;
                root.insert(field, value);
            }
        }
        Ok(document)
    }

    pub fn check_manifest(manifest: &Manifest) -> Result<(), ManifestError> {
        Self::check_decimal("task_bid_price", &manifest.task_bid_price)?;
        Self::check_decimal("oracle_stake", &manifest.oracle_stake)?;

        let urls = [
            ("taskdata_uri", &manifest.taskdata_uri),
            ("groundtruth_uri", &manifest.groundtruth_uri),
            ("rejected_uri", &manifest.rejected_uri),
            ("batch_result_delivery_webhook", &manifest.batch_result_delivery_webhook),
            ("online_result_delivery_webhook", &manifest.online_result_delivery_webhook),
            ("instant_result_delivery_webhook", &manifest.instant_result_delivery_webhook),
        ];
        for (field, value) in urls {
            if let Some(uri) = value {
                Self::check_url(field, uri)?;
            }
        }

        if let Some(example) = &manifest.requester_question_example {
            for uri in example.uris() {
                Self::check_url("requester_question_example", uri)?;
            }
        }

        if let Some(answer_set) = &manifest.requester_restricted_answer_set {
            Self::check_answer_set(answer_set)?;
        }

        if let Some(taskdata) = &manifest.taskdata {
            for (index, entry) in taskdata.iter().enumerate() {
                Self::check_task_data(entry).map_err(|e| e.under(format!("taskdata[{}]", index)))?;
            }
        }

        for (index, nested) in manifest.nested().iter().enumerate() {
            Self::check_nested(nested)
                .map_err(|e| e.under(format!("multi_challenge_manifests[{}]", index)))?;
        }

        Ok(())
    }

    fn check_nested(nested: &NestedManifest) -> Result<(), ManifestError> {
        if !RequestType::BASE.contains(&nested.request_type) {
            return Err(ManifestError::shape_field(
                "request_type",
                Value::String(nested.request_type.as_str().to_string()),
                "multi_challenge cannot be nested",
            ));
        }
        if let Some(uri) = &nested.groundtruth_uri {
            Self::check_url("groundtruth_uri", uri)?;
        }
        if let Some(example) = &nested.requester_question_example {
            for uri in example.uris() {
                Self::check_url("requester_question_example", uri)?;
            }
        }
        if let Some(answer_set) = &nested.requester_restricted_answer_set {
            Self::check_answer_set(answer_set)?;
        }
        Ok(())
    }

    /// TaskData rules, shared by inline entries and remote taskdata collections
    pub fn check_task_data(entry: &TaskData) -> Result<(), ManifestError> {
        if entry.datapoint_hash.chars().count() < Self::MIN_DATAPOINT_HASH_LENGTH {
            return Err(ManifestError::shape_field(
                "datapoint_hash",
                Value::String(entry.datapoint_hash.clone()),
                format!(
                    "datapoint_hash must be at least {} characters",
                    Self::MIN_DATAPOINT_HASH_LENGTH
                ),
            ));
        }

        let has_text = entry.datapoint_text.as_ref().is_some_and(|text| !text.is_empty());
        match entry.datapoint_uri.as_deref() {
            None | Some("") if !has_text => Err(ManifestError::shape_field(
                "datapoint_uri",
                Value::Null,
                "datapoint_uri is missing.",
            )),
            Some(uri)
                if !uri.is_empty() && uri.len() < Self::MIN_DATAPOINT_URI_LENGTH && !has_text =>
            {
                Err(ManifestError::shape_field(
                    "datapoint_uri",
                    Value::String(uri.to_string()),
                    "datapoint_uri length is less than 10",
                ))
            }
            Some(uri) if !uri.is_empty() => Self::check_url("datapoint_uri", uri),
            _ => Ok(()),
        }
    }

    /// Each answer entry must be an object of string attributes
    pub fn check_answer_set(answer_set: &RestrictedAnswerSet) -> Result<(), ManifestError> {
        for (key, answer) in answer_set {
            let field = format!("requester_restricted_answer_set.{}", key);
            let attributes = answer.as_object().ok_or_else(|| {
                ManifestError::shape_field(
                    field.clone(),
                    answer.clone(),
                    "answer entry must be an object",
                )
            })?;
            if let Some((name, value)) = attributes.iter().find(|(_, value)| !value.is_string()) {
                return Err(ManifestError::shape_field(
                    format!("{}.{}", field, name),
                    value.clone(),
                    "answer attributes must be strings",
                ));
            }
        }
        Ok(())
    }

    /// Absolute http(s) URL with a host
    pub fn check_url(field: &str, uri: &str) -> Result<(), ManifestError> {
        let invalid = |reason: String| {
            ManifestError::shape_field(field, Value::String(uri.to_string()), reason)
        };
        let parsed = Url::parse(uri).map_err(|e| invalid(format!("not a valid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported URL scheme '{}'", parsed.scheme())));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid("URL has no host".to_string()));
        }
        Ok(())
    }

    pub fn check_decimal(field: &str, value: &Decimal) -> Result<(), ManifestError> {
        let pattern = DECIMAL_RE.as_ref().map_err(|e| ManifestError::from(e.clone()))?;
        if pattern.is_match(value.as_str()) {
            Ok(())
        } else {
            Err(ManifestError::shape_field(
                field,
                Value::String(value.as_str().to_string()),
                format!("{} is not a decimal number", field),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn task(uri: Option<&str>, text: bool) -> TaskData {
        TaskData {
            task_key: Uuid::new_v4(),
            datapoint_uri: uri.map(str::to_string),
            datapoint_hash: "sha1:deadbeef".to_string(),
            datapoint_text: text.then(|| [("en".to_string(), "hello".to_string())].into()),
        }
    }

    #[test]
    fn test_discriminators() {
        let document = json!({"request_type": "image_label_binary", "job_mode": "batch"});
        assert!(ShapeValidator::check_discriminators(&document).is_ok());

        let error =
            ShapeValidator::check_discriminators(&json!({"job_mode": "batch"})).unwrap_err();
        assert_eq!(error.code, crate::error::ManifestErrorCode::MissingDiscriminator);
        assert_eq!(error.field(), Some("request_type"));

        let document = json!({"request_type": "", "job_mode": "batch"});
        let error = ShapeValidator::check_discriminators(&document).unwrap_err();
        assert_eq!(error.code, crate::error::ManifestErrorCode::MissingDiscriminator);

        let error = ShapeValidator::check_discriminators(&json!({
            "request_type": "multi_challenge",
            "job_mode": "batch",
            "multi_challenge_manifests": [{"request_type": "image_label_binary"}, {}]
        }))
        .unwrap_err();
        assert_eq!(error.field(), Some("multi_challenge_manifests[1].request_type"));

        assert!(ShapeValidator::check_discriminators(&json!([])).is_err());

        let malformed = json!({
            "request_type": "multi_challenge",
            "job_mode": "batch",
            "multi_challenge_manifests": [5]
        });
        assert!(ShapeValidator::check_discriminators(&malformed).is_ok());
    }

    #[test]
    fn test_task_data_rules() {
        let entry = task(Some("https://domain.com/file1.jpeg"), false);
        assert!(ShapeValidator::check_task_data(&entry).is_ok());
        assert!(ShapeValidator::check_task_data(&task(None, true)).is_ok());
        assert!(ShapeValidator::check_task_data(&task(Some("http://a"), true)).is_ok());

        let error = ShapeValidator::check_task_data(&task(None, false)).unwrap_err();
        assert_eq!(error.details(), Some("datapoint_uri is missing."));

        let error = ShapeValidator::check_task_data(&task(Some("http://a"), false)).unwrap_err();
        assert_eq!(error.details(), Some("datapoint_uri length is less than 10"));

        let mut short_hash = task(Some("https://domain.com/file1.jpeg"), false);
        short_hash.datapoint_hash = "abc".to_string();
        assert!(ShapeValidator::check_task_data(&short_hash).is_err());
    }

    #[test]
    fn test_urls_and_decimals() {
        assert!(ShapeValidator::check_url("f", "https://example.com/a.json").is_ok());
        assert!(ShapeValidator::check_url("f", "ftp://example.com/a.json").is_err());
        assert!(ShapeValidator::check_url("f", "not a url").is_err());

        assert!(ShapeValidator::check_decimal("p", &Decimal::new("1.5")).is_ok());
        assert!(ShapeValidator::check_decimal("p", &Decimal::new("-3")).is_ok());
        assert!(ShapeValidator::check_decimal("p", &Decimal::new("1e-3")).is_ok());
        assert!(ShapeValidator::check_decimal("p", &Decimal::new("one")).is_err());
    }

    #[test]
    fn test_answer_set_shape() {
        let good = json!({"cat": {"en": "Cat", "answer_example_uri": "https://x.com/cat.png"}});
        assert!(ShapeValidator::check_answer_set(good.as_object().unwrap()).is_ok());

        let bad = json!({"cat": {"en": 1}});
        let error = ShapeValidator::check_answer_set(bad.as_object().unwrap()).unwrap_err();
        assert_eq!(error.field(), Some("requester_restricted_answer_set.cat.en"));
    }

    #[test]
    fn test_object_shape_sub_validator() {
        let validators: Vec<Box<dyn SubDocumentValidator>> =
            vec![Box::new(ObjectShape::new("restricted_audience"))];
        let ok = ShapeValidator::apply_sub_validators(
            json!({"restricted_audience": {"lang": []}}),
            &validators,
        );
        assert!(ok.is_ok());

        let error =
            ShapeValidator::apply_sub_validators(json!({"restricted_audience": 5}), &validators)
                .unwrap_err();
        assert_eq!(error.field(), Some("restricted_audience"));
    }
}
