pub mod manifest_parser;
pub mod model;
pub mod request_type;
pub mod shape;

pub use manifest_parser::ManifestParser;
pub use model::{
    AnswerType, ConfigScalar, Decimal, ExampleExtraFields, InternalConfig, LocalizedText, Manifest,
    MitlValue, NestedManifest, QuestionExample, RequestConfig, RestrictedAnswerSet, ShapeType,
    TaskData, Webhook, DEFAULT_ANSWER_LABEL,
};
pub use request_type::{AnswerSetRule, JobMode, RequestType};
pub use shape::{ObjectShape, ShapeValidator, SubDocumentValidator};
