pub mod fetch_error;
pub mod manifest_error;

pub use fetch_error::FetchError;
pub use manifest_error::{ManifestError, ManifestErrorCode, ManifestErrorData, ValidationStage};

impl From<std::io::Error> for ManifestError {
    fn from(error: std::io::Error) -> Self {
        ManifestError::shape(error.to_string())
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(error: serde_json::Error) -> Self {
        ManifestError::shape(error.to_string())
    }
}

impl From<regex::Error> for ManifestError {
    fn from(error: regex::Error) -> Self {
        ManifestError::shape(error.to_string())
    }
}
