use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::manifest::request_type::{JobMode, RequestType};

/// Answer key → answer attributes (e.g. `{"en": "cat", "answer_example_uri": "..."}`),
/// kept in document order
pub type RestrictedAnswerSet = serde_json::Map<String, Value>;

/// Localized strings keyed by language code
pub type LocalizedText = BTreeMap<String, String>;

/// Key of the answer entry injected for `image_label_area_select`
pub const DEFAULT_ANSWER_LABEL: &str = "label";

fn default_uuid() -> Uuid {
    Uuid::new_v4()
}

fn default_max_repeats() -> i64 {
    100
}

fn default_min_repeats() -> i64 {
    1
}

fn default_accuracy_target() -> f64 {
    0.1
}

fn default_trust() -> f64 {
    0.1
}

fn default_choices() -> i64 {
    1
}

/// Decimal amount accepted as a JSON number or a numeric string, stored as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DecimalRepr", into = "String")]
pub struct Decimal(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Number(serde_json::Number),
    Text(String),
}

impl From<DecimalRepr> for Decimal {
    fn from(repr: DecimalRepr) -> Self {
        match repr {
            DecimalRepr::Number(number) => Decimal(number.to_string()),
            DecimalRepr::Text(text) => Decimal(text.trim().to_string()),
        }
    }
}

impl From<Decimal> for String {
    fn from(decimal: Decimal) -> Self {
        decimal.0
    }
}

impl Decimal {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Decimal(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `requester_question_example`: one URI, or a list for job types that allow it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionExample {
    Single(String),
    Many(Vec<String>),
}

impl QuestionExample {
    pub fn is_list(&self) -> bool {
        matches!(self, QuestionExample::Many(_))
    }

    pub fn uris(&self) -> Vec<&str> {
        match self {
            QuestionExample::Single(uri) => vec![uri.as_str()],
            QuestionExample::Many(uris) => uris.iter().map(String::as_str).collect(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            QuestionExample::Single(uri) => Value::String(uri.clone()),
            QuestionExample::Many(uris) => {
                Value::Array(uris.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExampleExtraFields {
    Single(BTreeMap<String, String>),
    Many(Vec<BTreeMap<String, String>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Webhook {
    pub webhook_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_completed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_completed: Option<Vec<String>>,
}

/// One labeling unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskData {
    pub task_key: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datapoint_uri: Option<String>,
    pub datapoint_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datapoint_text: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Point,
    BoundingBox,
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    Int,
    Float,
    #[default]
    Str,
}

/// Shape/answer parameterization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    #[serde(default)]
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_shapes_per_image: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_shapes_per_image: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_to_coords: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_selection_area_per_shape: Option<i64>,
    #[serde(default = "default_choices")]
    pub multiple_choice_max_choices: i64,
    #[serde(default = "default_choices")]
    pub multiple_choice_min_choices: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_threshold: Option<f64>,
    #[serde(default)]
    pub answer_type: AnswerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig_figs: Option<i64>,
    #[serde(default)]
    pub keep_answers_order: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            version: 0,
            shape_type: None,
            min_points: None,
            max_points: None,
            min_shapes_per_image: None,
            max_shapes_per_image: None,
            restrict_to_coords: None,
            minimum_selection_area_per_shape: None,
            multiple_choice_max_choices: default_choices(),
            multiple_choice_min_choices: default_choices(),
            overlap_threshold: None,
            answer_type: AnswerType::default(),
            max_value: None,
            min_value: None,
            max_length: None,
            min_length: None,
            sig_figs: None,
            keep_answers_order: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MitlValue {
    Scalar(ConfigScalar),
    Nested(BTreeMap<String, ConfigScalar>),
}

/// Internal tuning knobs carried through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InternalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<BTreeMap<String, ConfigScalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reco: Option<BTreeMap<String, ConfigScalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<BTreeMap<String, ConfigScalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<BTreeMap<String, ConfigScalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitl: Option<BTreeMap<String, MitlValue>>,
}

/// One challenge inside a `multi_challenge` job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedManifest {
    #[serde(default = "default_uuid")]
    pub job_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_restricted_answer_set: Option<RestrictedAnswerSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_description: Option<String>,
    #[serde(default = "default_max_repeats")]
    pub requester_max_repeats: i64,
    #[serde(default = "default_min_repeats")]
    pub requester_min_repeats: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_question: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_question_example: Option<QuestionExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_example_extra_fields: Option<ExampleExtraFields>,
    #[serde(default)]
    pub unsafe_content: bool,
    #[serde(default = "default_accuracy_target")]
    pub requester_accuracy_target: f64,
    pub request_type: RequestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_config: Option<RequestConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groundtruth_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groundtruth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confcalc_configuration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<Webhook>,
}

/// Root job manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub job_mode: JobMode,
    #[serde(default = "default_uuid")]
    pub job_api_key: Uuid,
    #[serde(default = "default_uuid")]
    pub job_id: Uuid,
    pub job_total_tasks: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default)]
    pub only_sign_results: bool,
    #[serde(default)]
    pub public_results: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_restricted_answer_set: Option<RestrictedAnswerSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_description: Option<String>,
    #[serde(default = "default_max_repeats")]
    pub requester_max_repeats: i64,
    #[serde(default = "default_min_repeats")]
    pub requester_min_repeats: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_question: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_question_example: Option<QuestionExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_example_extra_fields: Option<ExampleExtraFields>,

    #[serde(default)]
    pub unsafe_content: bool,
    pub task_bid_price: Decimal,
    pub oracle_stake: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<i64>,
    #[serde(default = "default_accuracy_target")]
    pub requester_accuracy_target: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_smart_bounty_addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmtoken_addr: Option<String>,
    #[serde(default = "default_trust")]
    pub minimum_trust_server: f64,
    #[serde(default = "default_trust")]
    pub minimum_trust_client: f64,
    pub recording_oracle_addr: String,
    pub reputation_oracle_addr: String,
    pub reputation_agent_addr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_pgp_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ro_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_result_delivery_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_result_delivery_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_result_delivery_webhook: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_challenge_manifests: Option<Vec<NestedManifest>>,

    pub request_type: RequestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_config: Option<RequestConfig>,

    /// Inline task data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taskdata: Option<Vec<TaskData>>,
    /// Remote task data collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taskdata_uri: Option<String>,

    /// Remote ground truth collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groundtruth_uri: Option<String>,
    /// Inline JSON-serialized ground truth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groundtruth: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_uri: Option<String>,
    #[serde(default)]
    pub rejected_count: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_config: Option<InternalConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confcalc_configuration_id: Option<String>,

    #[serde(default)]
    pub restricted_audience: serde_json::Map<String, Value>,

    #[serde(default)]
    pub is_verification: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<Webhook>,
}

impl Manifest {
    /// Nested challenges, empty for single-challenge jobs
    pub fn nested(&self) -> &[NestedManifest] {
        self.multi_challenge_manifests.as_deref().unwrap_or_default()
    }

    /// Serialize to a JSON value (the normalized document after validation)
    pub fn to_value(&self) -> Result<Value, crate::error::ManifestError> {
        Ok(serde_json::to_value(self)?)
    }
}
