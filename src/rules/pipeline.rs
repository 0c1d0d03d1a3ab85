use log::debug;

use crate::error::ManifestError;
use crate::manifest::model::{Manifest, NestedManifest};
use crate::rules::conditional_rules::{self, ChallengeFields};

/// One named step of the rule pipeline; owns its input and returns the value to keep
pub struct RuleStage<T> {
    pub name: &'static str,
    pub apply: fn(T) -> Result<T, ManifestError>,
}

fn request_type_stage<T: ChallengeFields>(challenge: T) -> Result<T, ManifestError> {
    conditional_rules::validate_request_type(
        challenge.request_type(),
        challenge.request_config(),
        challenge.multi_challenge_manifests(),
    )?;
    Ok(challenge)
}

fn groundtruth_stage<T: ChallengeFields>(challenge: T) -> Result<T, ManifestError> {
    conditional_rules::validate_groundtruth_exclusivity(
        challenge.groundtruth(),
        challenge.groundtruth_uri(),
    )?;
    Ok(challenge)
}

fn answer_set_stage<T: ChallengeFields>(mut challenge: T) -> Result<T, ManifestError> {
    let answer_set = challenge.take_restricted_answer_set();
    let normalized =
        conditional_rules::validate_restricted_answer_set(challenge.request_type(), answer_set)?;
    challenge.put_restricted_answer_set(normalized);
    Ok(challenge)
}

fn question_example_stage<T: ChallengeFields>(challenge: T) -> Result<T, ManifestError> {
    conditional_rules::validate_question_example(
        challenge.request_type(),
        challenge.question_example(),
    )?;
    Ok(challenge)
}

fn taskdata_stage(manifest: Manifest) -> Result<Manifest, ManifestError> {
    conditional_rules::validate_taskdata_exclusivity(
        manifest.taskdata.as_deref(),
        manifest.taskdata_uri.as_deref(),
    )?;
    Ok(manifest)
}

fn nested_stage(mut manifest: Manifest) -> Result<Manifest, ManifestError> {
    if let Some(nested) = manifest.multi_challenge_manifests.take() {
        let stages = RulePipeline::challenge_stages::<NestedManifest>();
        let normalized = nested
            .into_iter()
            .enumerate()
            .map(|(index, challenge)| {
                let prefix = format!("multi_challenge_manifests[{}]", index);
                RulePipeline::run(challenge, &stages, &prefix).map_err(|e| e.under(&prefix))
            })
            .collect::<Result<Vec<_>, _>>()?;
        manifest.multi_challenge_manifests = Some(normalized);
    }
    Ok(manifest)
}

/// Ordered conditional rule stages, first failure wins
pub struct RulePipeline;

impl RulePipeline {
    /// Stages applied to every challenge, root or nested
    pub fn challenge_stages<T: ChallengeFields>() -> Vec<RuleStage<T>> {
        vec![
            RuleStage { name: "request_type", apply: request_type_stage::<T> },
            RuleStage { name: "groundtruth", apply: groundtruth_stage::<T> },
            RuleStage { name: "requester_restricted_answer_set", apply: answer_set_stage::<T> },
            RuleStage { name: "requester_question_example", apply: question_example_stage::<T> },
        ]
    }

    /// Root stages in evaluation order
    pub fn manifest_stages() -> Vec<RuleStage<Manifest>> {
        vec![
            RuleStage { name: "request_type", apply: request_type_stage::<Manifest> },
            RuleStage { name: "taskdata", apply: taskdata_stage },
            RuleStage { name: "groundtruth", apply: groundtruth_stage::<Manifest> },
            RuleStage {
                name: "requester_restricted_answer_set",
                apply: answer_set_stage::<Manifest>,
            },
            RuleStage {
                name: "requester_question_example",
                apply: question_example_stage::<Manifest>,
            },
            RuleStage { name: "multi_challenge_manifests", apply: nested_stage },
        ]
    }

    pub fn run<T>(value: T, stages: &[RuleStage<T>], scope: &str) -> Result<T, ManifestError> {
        stages.iter().try_fold(value, |value, stage| {
            let value = (stage.apply)(value)?;
            debug!("✓ rule stage '{}' passed ({})", stage.name, scope);
            Ok(value)
        })
    }

    /// Run every conditional rule over a typed manifest, returning the normalized manifest
    pub fn apply(manifest: Manifest) -> Result<Manifest, ManifestError> {
        Self::run(manifest, &Self::manifest_stages(), "manifest")
    }
}
