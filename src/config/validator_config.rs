use std::time::Duration;

/// Which entries of a remote collection get their content type probed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentTypeScope {
    /// Probe the first entry only; collections are assumed homogeneous
    #[default]
    FirstEntry,
    /// Probe every entry
    EveryEntry,
}

/// Configuration for ManifestValidator
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Content types accepted for image URIs (Default: image/jpeg, image/jpg, image/png)
    pub supported_content_types: Vec<String>,

    /// Content type probing scope within one collection (Default: first entry)
    pub content_type_scope: ContentTypeScope,

    /// Per-request timeout; None leaves deadlines to the caller (Default: None)
    pub request_timeout: Option<Duration>,

    /// Maximum remote collection body size in bytes (Default: 50MB)
    pub max_document_size: usize,

    /// User-Agent sent with remote requests
    pub user_agent: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            supported_content_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
            content_type_scope: ContentTypeScope::FirstEntry,
            request_timeout: None,
            max_document_size: 50_000_000, // 50MB
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl ValidatorConfig {
    /// Create a new configuration with all default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration that probes every entry and bounds each request
    pub fn strict() -> Self {
        Self {
            content_type_scope: ContentTypeScope::EveryEntry,
            request_timeout: Some(Duration::from_secs(10)),
            max_document_size: 10_000_000, // 10MB
            ..Self::default()
        }
    }

    /// Create a configuration tolerant of slow or large remote collections
    pub fn offline_friendly() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(120)),
            max_document_size: 200_000_000, // 200MB
            ..Self::default()
        }
    }

    pub fn with_content_types<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_content_types = content_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scope(mut self, scope: ContentTypeScope) -> Self {
        self.content_type_scope = scope;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Whether a declared content type (parameters ignored) is in the allow-list
    pub fn is_supported_content_type(&self, content_type: &str) -> bool {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        self.supported_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.supported_content_types.is_empty() {
            return Err("supported_content_types must not be empty".to_string());
        }

        if self.supported_content_types.iter().any(|t| t.trim().is_empty()) {
            return Err("supported_content_types must not contain blank entries".to_string());
        }

        if self.max_document_size == 0 {
            return Err("max_document_size must be greater than 0".to_string());
        }

        if matches!(self.request_timeout, Some(timeout) if timeout.is_zero()) {
            return Err("request_timeout must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}
