pub mod conditional_rules;
pub mod pipeline;

pub use conditional_rules::{
    validate_groundtruth_exclusivity, validate_question_example, validate_request_type,
    validate_restricted_answer_set, validate_taskdata_exclusivity, ChallengeFields,
};
pub use pipeline::{RulePipeline, RuleStage};
