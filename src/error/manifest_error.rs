use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Pipeline stage that produced a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStage {
    Shape,
    Rule,
    Remote,
}

impl ValidationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStage::Shape => "shape",
            ValidationStage::Rule => "rule",
            ValidationStage::Remote => "remote",
        }
    }
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manifest rejection codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManifestErrorCode {
    /// Static type or format violation
    ShapeError,
    /// `request_type` or `job_mode` absent where a rule needs it
    MissingDiscriminator,
    /// A named cross-field invariant failed
    RuleViolation,
    /// Network or HTTP failure reaching a URI
    TransportError,
    /// Remote body is not JSON, or not an object/array
    ParseError,
    /// Remote collection resolved with zero entries
    EmptyCollection,
    /// Declared content type is not in the allow-list
    UnsupportedContentType,
}

impl ManifestErrorCode {
    /// Returns the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestErrorCode::ShapeError => "SHAPE_ERROR",
            ManifestErrorCode::MissingDiscriminator => "MISSING_DISCRIMINATOR",
            ManifestErrorCode::RuleViolation => "RULE_VIOLATION",
            ManifestErrorCode::TransportError => "TRANSPORT_ERROR",
            ManifestErrorCode::ParseError => "PARSE_ERROR",
            ManifestErrorCode::EmptyCollection => "EMPTY_COLLECTION",
            ManifestErrorCode::UnsupportedContentType => "UNSUPPORTED_CONTENT_TYPE",
        }
    }

    /// Returns the standard human-readable message for the error code
    pub fn message(&self) -> &'static str {
        match self {
            ManifestErrorCode::ShapeError => "Invalid manifest shape",
            ManifestErrorCode::MissingDiscriminator => "Missing discriminator",
            ManifestErrorCode::RuleViolation => "Rule violated",
            ManifestErrorCode::TransportError => "Remote resource unreachable",
            ManifestErrorCode::ParseError => "Remote document unreadable",
            ManifestErrorCode::EmptyCollection => "Remote collection is empty",
            ManifestErrorCode::UnsupportedContentType => "Unsupported content type",
        }
    }

    /// Stage an error with this code is reported under unless overridden
    pub fn default_stage(&self) -> ValidationStage {
        match self {
            ManifestErrorCode::ShapeError | ManifestErrorCode::MissingDiscriminator => {
                ValidationStage::Shape
            }
            ManifestErrorCode::RuleViolation => ValidationStage::Rule,
            ManifestErrorCode::TransportError
            | ManifestErrorCode::ParseError
            | ManifestErrorCode::EmptyCollection
            | ManifestErrorCode::UnsupportedContentType => ValidationStage::Remote,
        }
    }
}

impl fmt::Display for ManifestErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Additional error context information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ManifestErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<HashMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl ManifestErrorData {
    /// Creates error data with just details
    pub fn with_details<S: Into<String>>(details: S) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::default()
        }
    }

    /// Creates error data describing an offending field
    pub fn with_field<F: Into<String>, D: Into<String>>(
        field: F,
        value: serde_json::Value,
        details: D,
    ) -> Self {
        Self {
            details: Some(details.into()),
            field: Some(field.into()),
            value: Some(value),
            ..Self::default()
        }
    }
}

/// Structured rejection returned by every validation stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestError {
    pub code: ManifestErrorCode,
    pub stage: ValidationStage,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ManifestErrorData>,
}

impl ManifestError {
    /// Creates a new error reported under the code's default stage
    pub fn new(code: ManifestErrorCode, details: Option<String>) -> Self {
        Self {
            code,
            stage: code.default_stage(),
            message: code.message().to_string(),
            data: details.map(ManifestErrorData::with_details),
        }
    }

    /// Static type or format violation
    pub fn shape<S: Into<String>>(details: S) -> Self {
        Self::new(ManifestErrorCode::ShapeError, Some(details.into()))
    }

    /// Static violation attributed to a specific field
    pub fn shape_field<F: Into<String>, D: Into<String>>(
        field: F,
        value: serde_json::Value,
        details: D,
    ) -> Self {
        Self::new(ManifestErrorCode::ShapeError, None)
            .with_data(ManifestErrorData::with_field(field, value, details))
    }

    pub fn missing_discriminator<F: Into<String>>(field: F) -> Self {
        let field = field.into();
        let details = format!("{} missing", field);
        Self::new(ManifestErrorCode::MissingDiscriminator, None).with_data(
            ManifestErrorData::with_field(field, serde_json::Value::Null, details),
        )
    }

    /// Creates a rule-specific error, optionally naming the bounds that failed
    pub fn rule_violation<F: Into<String>, D: Into<String>>(
        field: F,
        value: serde_json::Value,
        details: D,
        constraints: Option<HashMap<String, serde_json::Value>>,
    ) -> Self {
        let mut data = ManifestErrorData::with_field(field, value, details);
        data.constraints = constraints;
        Self::new(ManifestErrorCode::RuleViolation, None).with_data(data)
    }

    pub fn empty_collection<F: Into<String>>(field: F, uri: &str) -> Self {
        let field = field.into();
        let details = format!("fetched {} is empty", field);
        let value = serde_json::Value::String(uri.to_string());
        Self::new(ManifestErrorCode::EmptyCollection, None)
            .with_data(ManifestErrorData::with_field(field, value, details))
    }

    pub fn unsupported_content_type(uri: &str, content_type: &str) -> Self {
        let data = ManifestErrorData {
            value: Some(serde_json::Value::String(content_type.to_string())),
            ..ManifestErrorData::with_details(format!("Unsupported type {}", content_type))
        };
        Self::new(ManifestErrorCode::UnsupportedContentType, None)
            .with_data(data)
            .with_context("uri", serde_json::Value::String(uri.to_string()))
    }

    fn with_data(mut self, data: ManifestErrorData) -> Self {
        self.data = Some(data);
        self
    }

    /// Reports the error under a different stage (e.g. a shape failure of a remote entry)
    pub fn in_stage(mut self, stage: ValidationStage) -> Self {
        self.stage = stage;
        self
    }

    /// Sets the offending field if none was recorded yet
    pub fn at_field<F: Into<String>>(mut self, field: F) -> Self {
        let data = self.data.get_or_insert_with(ManifestErrorData::default);
        if data.field.is_none() {
            data.field = Some(field.into());
        }
        self
    }

    /// Prefixes the offending field path, e.g. `multi_challenge_manifests[0]`
    pub fn under<P: AsRef<str>>(mut self, prefix: P) -> Self {
        let data = self.data.get_or_insert_with(ManifestErrorData::default);
        let prefix = prefix.as_ref();
        data.field = Some(match data.field.take() {
            Some(field) => format!("{}.{}", prefix, field),
            None => prefix.to_string(),
        });
        self
    }

    /// Adds one context entry
    pub fn with_context<K: Into<String>>(mut self, key: K, value: serde_json::Value) -> Self {
        let data = self.data.get_or_insert_with(ManifestErrorData::default);
        data.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    pub fn field(&self) -> Option<&str> {
        self.data.as_ref()?.field.as_deref()
    }

    pub fn details(&self) -> Option<&str> {
        self.data.as_ref()?.details.as_deref()
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error [{}]: {}", self.stage, self.code, self.message)?;
        if let Some(data) = &self.data {
            if let Some(field) = &data.field {
                write!(f, " (field: {})", field)?;
            }
            if let Some(details) = &data.details {
                write!(f, " - {}", details)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ManifestError {}
