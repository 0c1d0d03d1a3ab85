use serde::{Deserialize, Serialize};
use std::fmt;

/// How a job type constrains `requester_restricted_answer_set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSetRule {
    /// Empty or absent sets are replaced by a single `{"label": {}}` entry
    DefaultSingleLabel,
    /// Entry count must lie in `min..=max`
    Bounded { min: usize, max: usize },
    Unconstrained,
}

/// Job type of a manifest or challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    ImageLabelBinary,
    ImageLabelMultipleChoice,
    TextFreeEntry,
    TextMultipleChoiceOneOption,
    TextMultipleChoiceMultipleOptions,
    ImageLabelAreaAdjust,
    ImageLabelAreaSelect,
    ImageLabelSinglePolygon,
    ImageLabelMultiplePolygons,
    ImageLabelSemanticSegmentationOneOption,
    ImageLabelSemanticSegmentationMultipleOptions,
    ImageLabelText,
    MultiChallenge,
}

impl RequestType {
    /// Job types allowed inside `multi_challenge_manifests`
    pub const BASE: [RequestType; 12] = [
        RequestType::ImageLabelBinary,
        RequestType::ImageLabelMultipleChoice,
        RequestType::TextFreeEntry,
        RequestType::TextMultipleChoiceOneOption,
        RequestType::TextMultipleChoiceMultipleOptions,
        RequestType::ImageLabelAreaAdjust,
        RequestType::ImageLabelAreaSelect,
        RequestType::ImageLabelSinglePolygon,
        RequestType::ImageLabelMultiplePolygons,
        RequestType::ImageLabelSemanticSegmentationOneOption,
        RequestType::ImageLabelSemanticSegmentationMultipleOptions,
        RequestType::ImageLabelText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::ImageLabelBinary => "image_label_binary",
            RequestType::ImageLabelMultipleChoice => "image_label_multiple_choice",
            RequestType::TextFreeEntry => "text_free_entry",
            RequestType::TextMultipleChoiceOneOption => "text_multiple_choice_one_option",
            RequestType::TextMultipleChoiceMultipleOptions => {
                "text_multiple_choice_multiple_options"
            }
            RequestType::ImageLabelAreaAdjust => "image_label_area_adjust",
            RequestType::ImageLabelAreaSelect => "image_label_area_select",
            RequestType::ImageLabelSinglePolygon => "image_label_single_polygon",
            RequestType::ImageLabelMultiplePolygons => "image_label_multiple_polygons",
            RequestType::ImageLabelSemanticSegmentationOneOption => {
                "image_label_semantic_segmentation_one_option"
            }
            RequestType::ImageLabelSemanticSegmentationMultipleOptions => {
                "image_label_semantic_segmentation_multiple_options"
            }
            RequestType::ImageLabelText => "image_label_text",
            RequestType::MultiChallenge => "multi_challenge",
        }
    }

    pub fn is_multi_challenge(&self) -> bool {
        matches!(self, RequestType::MultiChallenge)
    }

    pub fn answer_set_rule(&self) -> AnswerSetRule {
        match self {
            RequestType::ImageLabelAreaSelect => AnswerSetRule::DefaultSingleLabel,
            RequestType::ImageLabelMultipleChoice => AnswerSetRule::Bounded { min: 2, max: 4 },
            _ => AnswerSetRule::Unconstrained,
        }
    }

    /// Whether `multiple_choice_min_choices <= multiple_choice_max_choices` applies
    pub fn has_choice_bounds(&self) -> bool {
        matches!(
            self,
            RequestType::ImageLabelMultipleChoice | RequestType::ImageLabelAreaSelect
        )
    }

    /// Whether `requester_question_example` may be a list of URIs
    pub fn allows_question_example_list(&self) -> bool {
        matches!(
            self,
            RequestType::ImageLabelAreaSelect | RequestType::ImageLabelBinary
        )
    }

    /// Whether remote image URIs for this job type get their content type probed
    pub fn requires_content_type_check(&self) -> bool {
        match self {
            RequestType::ImageLabelBinary
            | RequestType::ImageLabelMultipleChoice
            | RequestType::ImageLabelAreaAdjust
            | RequestType::ImageLabelAreaSelect
            | RequestType::ImageLabelSinglePolygon
            | RequestType::ImageLabelMultiplePolygons
            | RequestType::ImageLabelSemanticSegmentationOneOption
            | RequestType::ImageLabelSemanticSegmentationMultipleOptions
            | RequestType::ImageLabelText => true,
            RequestType::TextFreeEntry
            | RequestType::TextMultipleChoiceOneOption
            | RequestType::TextMultipleChoiceMultipleOptions
            | RequestType::MultiChallenge => false,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    Batch,
    Online,
    InstantDelivery,
}
