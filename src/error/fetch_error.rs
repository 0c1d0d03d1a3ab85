use thiserror::Error;

use crate::error::{ManifestError, ManifestErrorCode};

/// Failures of the remote I/O capability
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request to '{0}' failed: {1}")]
    Transport(String, String),

    #[error("'{0}' answered with HTTP status {1}")]
    Status(String, u16),

    #[error("body of '{0}' is not valid JSON: {1}")]
    InvalidBody(String, String),

    #[error("body of '{0}' exceeds {1} bytes")]
    BodyTooLarge(String, usize),
}

impl FetchError {
    pub fn uri(&self) -> &str {
        match self {
            FetchError::Transport(uri, _)
            | FetchError::Status(uri, _)
            | FetchError::InvalidBody(uri, _)
            | FetchError::BodyTooLarge(uri, _) => uri,
        }
    }
}

impl From<FetchError> for ManifestError {
    fn from(error: FetchError) -> Self {
        let code = match error {
            FetchError::Transport(..) | FetchError::Status(..) => ManifestErrorCode::TransportError,
            FetchError::InvalidBody(..) | FetchError::BodyTooLarge(..) => {
                ManifestErrorCode::ParseError
            }
        };
        let uri = serde_json::Value::String(error.uri().to_string());
        ManifestError::new(code, Some(error.to_string())).with_context("uri", uri)
    }
}
