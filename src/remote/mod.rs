pub mod content_type;
pub mod entry_validators;
pub mod fetcher;
pub mod walker;

pub use content_type::ContentTypeChecker;
pub use entry_validators::{
    validate_answer_set_uris, validate_groundtruth_entry, validate_question_example_uris,
    validate_taskdata_entry,
};
pub use fetcher::{HttpFetcher, ResourceFetcher};
pub use walker::DocumentWalker;
