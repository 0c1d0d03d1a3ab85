use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::io::Read;

use crate::config::ValidatorConfig;
use crate::error::{FetchError, ManifestError, ManifestErrorCode};

/// Remote I/O capability used by the validator; the only place the crate touches the network
pub trait ResourceFetcher {
    /// GET a URI and parse its body as JSON
    fn get_json(&self, uri: &str) -> Result<Value, FetchError>;

    /// HEAD a URI and return its declared Content-Type, if any
    fn head_content_type(&self, uri: &str) -> Result<Option<String>, FetchError>;
}

impl<T: ResourceFetcher + ?Sized> ResourceFetcher for &T {
    fn get_json(&self, uri: &str) -> Result<Value, FetchError> {
        (**self).get_json(uri)
    }

    fn head_content_type(&self, uri: &str) -> Result<Option<String>, FetchError> {
        (**self).head_content_type(uri)
    }
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: Client,
    max_document_size: usize,
}

impl HttpFetcher {
    pub fn new(config: &ValidatorConfig) -> Result<Self, ManifestError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ManifestError::new(
                    ManifestErrorCode::TransportError,
                    Some(format!("HTTP client build failed: {}", e)),
                )
            })?;

        Ok(Self {
            client,
            max_document_size: config.max_document_size,
        })
    }
}

impl ResourceFetcher for HttpFetcher {
    fn get_json(&self, uri: &str) -> Result<Value, FetchError> {
        debug!("GET {}", uri);
        let response = self
            .client
            .get(uri)
            .send()
            .map_err(|e| FetchError::Transport(uri.to_string(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} answered {}", uri, status);
            return Err(FetchError::Status(uri.to_string(), status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_document_size as u64 {
                return Err(FetchError::BodyTooLarge(uri.to_string(), self.max_document_size));
            }
        }

        // One byte past the limit is enough to detect an oversized chunked body
        let mut body = Vec::new();
        response
            .take(self.max_document_size as u64 + 1)
            .read_to_end(&mut body)
            .map_err(|e| FetchError::Transport(uri.to_string(), e.to_string()))?;
        if body.len() > self.max_document_size {
            return Err(FetchError::BodyTooLarge(uri.to_string(), self.max_document_size));
        }
        debug!("GET {} returned {} bytes", uri, body.len());

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::InvalidBody(uri.to_string(), e.to_string()))
    }

    fn head_content_type(&self, uri: &str) -> Result<Option<String>, FetchError> {
        debug!("HEAD {}", uri);
        let response = self
            .client
            .head(uri)
            .send()
            .map_err(|e| FetchError::Transport(uri.to_string(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HEAD {} answered {}", uri, status);
            return Err(FetchError::Status(uri.to_string(), status.as_u16()));
        }

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string))
    }
}
