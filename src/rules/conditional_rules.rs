//! Discriminator-aware cross-field rules.
//!
//! Every rule is a pure function of the typed fields it inspects. The one rule
//! that normalizes (`validate_restricted_answer_set`) takes its value by move
//! and hands back the value to keep.

use serde_json::{json, Value};
use std::collections::HashMap;

use crate::error::ManifestError;
use crate::manifest::model::{
    Manifest, NestedManifest, QuestionExample, RequestConfig, RestrictedAnswerSet, TaskData,
    DEFAULT_ANSWER_LABEL,
};
use crate::manifest::request_type::{AnswerSetRule, RequestType};

/// Fields shared by root manifests and nested challenges that the rules inspect
pub trait ChallengeFields {
    fn request_type(&self) -> RequestType;
    fn request_config(&self) -> Option<&RequestConfig>;
    fn restricted_answer_set(&self) -> Option<&RestrictedAnswerSet>;
    fn question_example(&self) -> Option<&QuestionExample>;
    fn groundtruth(&self) -> Option<&str>;
    fn groundtruth_uri(&self) -> Option<&str>;

    /// Nested challenges; always `None` below the root
    fn multi_challenge_manifests(&self) -> Option<&[NestedManifest]> {
        None
    }

    fn take_restricted_answer_set(&mut self) -> Option<RestrictedAnswerSet>;
    fn put_restricted_answer_set(&mut self, answer_set: Option<RestrictedAnswerSet>);
}

impl ChallengeFields for Manifest {
    fn request_type(&self) -> RequestType {
        self.request_type
    }

    fn request_config(&self) -> Option<&RequestConfig> {
        self.request_config.as_ref()
    }

    fn restricted_answer_set(&self) -> Option<&RestrictedAnswerSet> {
        self.requester_restricted_answer_set.as_ref()
    }

    fn question_example(&self) -> Option<&QuestionExample> {
        self.requester_question_example.as_ref()
    }

    fn groundtruth(&self) -> Option<&str> {
        self.groundtruth.as_deref()
    }

    fn groundtruth_uri(&self) -> Option<&str> {
        self.groundtruth_uri.as_deref()
    }

    fn multi_challenge_manifests(&self) -> Option<&[NestedManifest]> {
        self.multi_challenge_manifests.as_deref()
    }

    fn take_restricted_answer_set(&mut self) -> Option<RestrictedAnswerSet> {
        self.requester_restricted_answer_set.take()
    }

    fn put_restricted_answer_set(&mut self, answer_set: Option<RestrictedAnswerSet>) {
        self.requester_restricted_answer_set = answer_set;
    }
}

impl ChallengeFields for NestedManifest {
    fn request_type(&self) -> RequestType {
        self.request_type
    }

    fn request_config(&self) -> Option<&RequestConfig> {
        self.request_config.as_ref()
    }

    fn restricted_answer_set(&self) -> Option<&RestrictedAnswerSet> {
        self.requester_restricted_answer_set.as_ref()
    }

    fn question_example(&self) -> Option<&QuestionExample> {
        self.requester_question_example.as_ref()
    }

    fn groundtruth(&self) -> Option<&str> {
        self.groundtruth.as_deref()
    }

    fn groundtruth_uri(&self) -> Option<&str> {
        self.groundtruth_uri.as_deref()
    }

    fn take_restricted_answer_set(&mut self) -> Option<RestrictedAnswerSet> {
        self.requester_restricted_answer_set.take()
    }

    fn put_restricted_answer_set(&mut self, answer_set: Option<RestrictedAnswerSet>) {
        self.requester_restricted_answer_set = answer_set;
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `multi_challenge` needs nested manifests; choice types need `min <= max`
pub fn validate_request_type(
    request_type: RequestType,
    request_config: Option<&RequestConfig>,
    multi_challenge_manifests: Option<&[NestedManifest]>,
) -> Result<(), ManifestError> {
    if request_type.is_multi_challenge() {
        if multi_challenge_manifests.map_or(true, <[NestedManifest]>::is_empty) {
            return Err(ManifestError::rule_violation(
                "multi_challenge_manifests",
                json!([]),
                "multi_challenge requires multi_challenge_manifests.",
                None,
            ));
        }
    } else if request_type.has_choice_bounds() {
        let defaults = RequestConfig::default();
        let config = request_config.unwrap_or(&defaults);
        let (min, max) = (config.multiple_choice_min_choices, config.multiple_choice_max_choices);
        if min > max {
            let constraints = HashMap::from([
                ("multiple_choice_min_choices".to_string(), json!(min)),
                ("multiple_choice_max_choices".to_string(), json!(max)),
            ]);
            return Err(ManifestError::rule_violation(
                "request_config.multiple_choice_min_choices",
                json!(min),
                "multiple_choice_min_choices cannot be greater than multiple_choice_max_choices",
                Some(constraints),
            ));
        }
    }
    Ok(())
}

/// Apply the job type's answer-set cardinality rule, returning the normalized set
pub fn validate_restricted_answer_set(
    request_type: RequestType,
    answer_set: Option<RestrictedAnswerSet>,
) -> Result<Option<RestrictedAnswerSet>, ManifestError> {
    match request_type.answer_set_rule() {
        AnswerSetRule::DefaultSingleLabel => match answer_set {
            Some(set) if !set.is_empty() => Ok(Some(set)),
            _ => {
                let mut set = RestrictedAnswerSet::new();
                set.insert(DEFAULT_ANSWER_LABEL.to_string(), Value::Object(Default::default()));
                Ok(Some(set))
            }
        },
        AnswerSetRule::Bounded { min, max } => {
            let count = answer_set.as_ref().map_or(0, |set| set.len());
            let details = if count < min {
                Some(format!(
                    "{} needs at least {}+ options in requester_restricted_answer_set",
                    request_type, min
                ))
            } else if count > max {
                Some(format!(
                    "{} can not handle more than {} options requester_restricted_answer_set",
                    request_type, max
                ))
            } else {
                None
            };
            match details {
                Some(details) => {
                    let value = answer_set.map(Value::Object).unwrap_or(Value::Null);
                    let constraints = HashMap::from([
                        ("min".to_string(), json!(min)),
                        ("max".to_string(), json!(max)),
                    ]);
                    Err(ManifestError::rule_violation(
                        "requester_restricted_answer_set",
                        value,
                        details,
                        Some(constraints),
                    ))
                }
                None => Ok(answer_set),
            }
        }
        AnswerSetRule::Unconstrained => Ok(answer_set),
    }
}

/// Lists are only accepted for job types that show several examples
pub fn validate_question_example(
    request_type: RequestType,
    question_example: Option<&QuestionExample>,
) -> Result<(), ManifestError> {
    match question_example {
        Some(example) if example.is_list() && !request_type.allows_question_example_list() => {
            Err(ManifestError::rule_violation(
                "requester_question_example",
                example.to_value(),
                "Lists are not allowed in this challenge type",
                None,
            )
            .with_context("request_type", json!(request_type.as_str())))
        }
        _ => Ok(()),
    }
}

pub fn validate_groundtruth_exclusivity(
    groundtruth: Option<&str>,
    groundtruth_uri: Option<&str>,
) -> Result<(), ManifestError> {
    if let (Some(inline), Some(uri)) = (non_empty(groundtruth), non_empty(groundtruth_uri)) {
        return Err(ManifestError::rule_violation(
            "groundtruth",
            json!(inline),
            "Specify only groundtruth_uri or groundtruth, not both.",
            None,
        )
        .with_context("groundtruth_uri", json!(uri)));
    }
    Ok(())
}

pub fn validate_taskdata_exclusivity(
    taskdata: Option<&[TaskData]>,
    taskdata_uri: Option<&str>,
) -> Result<(), ManifestError> {
    let inline = taskdata.filter(|entries| !entries.is_empty());
    if let (Some(entries), Some(uri)) = (inline, non_empty(taskdata_uri)) {
        let entries = serde_json::to_value(entries)?;
        let details = format!("Specify only one of taskdata {} or taskdata_uri {}", entries, uri);
        return Err(
            ManifestError::rule_violation("taskdata_uri", json!(uri), details, None)
                .with_context("taskdata", entries),
        );
    }
    Ok(())
}
