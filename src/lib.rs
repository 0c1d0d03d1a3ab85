//! # job-manifest
//!
//! Validation engine for crowdsourced labeling job manifests.
//!
//! A manifest goes through three stages, in order:
//!
//! - **Shape**: discriminator presence, typing into [`Manifest`], leaf format checks
//!   and collaborator sub-document validators
//! - **Rule**: conditional cross-field rules keyed on `request_type`, producing the
//!   normalized manifest
//! - **Remote** (optional): ground truth and task data collections are fetched and
//!   walked entry by entry, example images are probed for their content type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use job_manifest::{ManifestValidator, ValidationMode, ValidatorConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let validator = ManifestValidator::new(ValidatorConfig::default())?;
//!
//!     match validator.validate_file("manifest.json", ValidationMode::Remote) {
//!         Ok(validated) => println!("{}", validated.to_json()?),
//!         Err(e) => println!("Rejected: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod remote;
pub mod rules;
pub mod utils;
pub mod validator;

// Model and parsing exports
pub use manifest::{
    JobMode, Manifest, ManifestParser, NestedManifest, ObjectShape, QuestionExample,
    RequestConfig, RequestType, RestrictedAnswerSet, ShapeValidator, SubDocumentValidator,
    TaskData,
};

// Rule exports
pub use rules::{ChallengeFields, RulePipeline, RuleStage};

// Remote verification exports
pub use remote::{ContentTypeChecker, DocumentWalker, HttpFetcher, ResourceFetcher};

// Orchestrator exports
pub use validator::{ManifestValidator, RemoteSummary, ValidatedManifest, ValidationMode};

// Configuration exports
pub use config::{ContentTypeScope, ValidatorConfig};

// Error exports
pub use error::{FetchError, ManifestError, ManifestErrorCode, ValidationStage};

// Result type alias
pub type Result<T> = std::result::Result<T, ManifestError>;

// Utility exports
pub use utils::JsonUtils;

/// Prelude module for convenient importing
pub mod prelude {
    pub use crate::{
        ContentTypeScope, Manifest, ManifestError, ManifestErrorCode, ManifestParser,
        ManifestValidator, RequestType, ResourceFetcher, Result, ValidatedManifest,
        ValidationMode, ValidationStage, ValidatorConfig,
    };
    pub use serde_json::{json, Value as JsonValue};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
