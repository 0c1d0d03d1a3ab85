use crate::error::ManifestError;
use crate::manifest::model::Manifest;
use crate::manifest::shape::ShapeValidator;
use crate::utils::JsonUtils;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::fs;

/// Manifest parser for JSON and YAML documents
pub struct ManifestParser;

impl ManifestParser {
    const PREVIEW_CHARS: usize = 200;
    const LARGE_FILE_BYTES: u64 = 10_000_000;

    /// Parse a typed Manifest from a JSON string
    pub fn from_json(json_str: &str) -> Result<Manifest, ManifestError> {
        Self::from_json_with_context(json_str, None)
    }

    /// Parse a typed Manifest from a JSON string with file context
    pub fn from_json_with_context(
        json_str: &str,
        file_path: Option<&str>,
    ) -> Result<Manifest, ManifestError> {
        let document = Self::parse_document_with_context(json_str, file_path)?;
        Self::into_manifest(document)
    }

    /// Parse a JSON string into an untyped document
    pub fn parse_document(json_str: &str) -> Result<Value, ManifestError> {
        Self::parse_document_with_context(json_str, None)
    }

    /// Parse a JSON string into an untyped document with file context
    pub fn parse_document_with_context(
        json_str: &str,
        file_path: Option<&str>,
    ) -> Result<Value, ManifestError> {
        let context = file_path
            .map(|p| format!(" (file: {})", p))
            .unwrap_or_default();
        debug!(
            "Attempting to parse manifest from JSON{} ({} bytes)",
            context,
            json_str.len()
        );

        if json_str.trim().is_empty() {
            error!("Manifest JSON string is empty{}", context);
            return Err(ManifestError::shape(format!(
                "JSON parsing error{}: input string is empty",
                context
            )));
        }

        debug!(
            "JSON content preview{}: {}",
            context,
            JsonUtils::preview(json_str, Self::PREVIEW_CHARS)
        );

        serde_json::from_str::<Value>(json_str).map_err(|e| {
            error!("Failed to parse manifest from JSON{}: {}", context, e);

            let detailed_error = match e.classify() {
                serde_json::error::Category::Io => {
                    format!("JSON parsing error{} - I/O issue: {}", context, e)
                }
                serde_json::error::Category::Syntax => {
                    format!(
                        "JSON parsing error{} - Syntax error at line {}, column {}: {}",
                        context,
                        e.line(),
                        e.column(),
                        e
                    )
                }
                serde_json::error::Category::Data => {
                    format!("JSON parsing error{} - Invalid data structure: {}", context, e)
                }
                serde_json::error::Category::Eof => {
                    format!("JSON parsing error{} - Unexpected end of file: {}", context, e)
                }
            };

            ManifestError::shape(detailed_error)
        })
    }

    /// Parse a typed Manifest from a YAML string
    #[cfg(feature = "yaml-support")]
    pub fn from_yaml(yaml_str: &str) -> Result<Manifest, ManifestError> {
        let document = Self::parse_yaml_document_with_context(yaml_str, None)?;
        Self::into_manifest(document)
    }

    /// Parse a YAML string into an untyped document with file context
    #[cfg(feature = "yaml-support")]
    pub fn parse_yaml_document_with_context(
        yaml_str: &str,
        file_path: Option<&str>,
    ) -> Result<Value, ManifestError> {
        let context = file_path
            .map(|p| format!(" (file: {})", p))
            .unwrap_or_default();
        debug!(
            "Attempting to parse manifest from YAML{} ({} bytes)",
            context,
            yaml_str.len()
        );

        if yaml_str.trim().is_empty() {
            error!("Manifest YAML string is empty{}", context);
            return Err(ManifestError::shape(format!(
                "YAML parsing error{}: input string is empty",
                context
            )));
        }

        serde_yaml::from_str::<Value>(yaml_str).map_err(|e| {
            error!("Failed to parse manifest from YAML{}: {}", context, e);
            let detailed_error = match e.location() {
                Some(location) => format!(
                    "YAML parsing error{} - Syntax error at line {}, column {}: {}",
                    context,
                    location.line(),
                    location.column(),
                    e
                ),
                None => format!("YAML parsing error{}: {}", context, e),
            };
            ManifestError::shape(detailed_error)
        })
    }

    /// Type an untyped document: discriminators first, then the full field set
    pub fn into_manifest(document: Value) -> Result<Manifest, ManifestError> {
        ShapeValidator::check_discriminators(&document)?;

        match serde_json::from_value::<Manifest>(document) {
            Ok(manifest) => {
                debug!(
                    "Typed manifest: request_type {}, {} nested challenges",
                    manifest.request_type,
                    manifest.nested().len()
                );
                Ok(manifest)
            }
            Err(e) => {
                error!("Manifest does not match the expected field set: {}", e);
                Err(ManifestError::shape(format!("Invalid data structure: {}", e)))
            }
        }
    }

    /// Read a manifest file into an untyped document (format based on extension)
    pub fn read_document(path: &str) -> Result<Value, ManifestError> {
        info!("Loading manifest from file: {}", path);

        if path.trim().is_empty() {
            error!("Manifest file path is empty");
            return Err(ManifestError::shape("File path cannot be empty"));
        }

        match fs::metadata(path) {
            Ok(metadata) => {
                debug!("File found: {} ({} bytes)", path, metadata.len());
                if metadata.len() == 0 {
                    warn!("Manifest file is empty: {}", path);
                }
                if metadata.len() > Self::LARGE_FILE_BYTES {
                    warn!(
                        "Manifest file is very large ({} bytes): {}",
                        metadata.len(),
                        path
                    );
                }
            }
            Err(e) => {
                error!("Cannot access manifest file '{}': {}", path, e);
                return Err(ManifestError::shape(format!(
                    "Failed to access file {}: {}",
                    path, e
                )));
            }
        }

        let content = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read manifest file '{}': {}", path, e);
            ManifestError::shape(format!("Failed to read file {}: {}", path, e))
        })?;

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            info!("Detected YAML format for file: {}", path);
            #[cfg(feature = "yaml-support")]
            {
                Self::parse_yaml_document_with_context(&content, Some(path))
            }
            #[cfg(not(feature = "yaml-support"))]
            {
                error!("YAML support not enabled for file: {}", path);
                Err(ManifestError::shape(format!(
                    "YAML support not enabled (file: {}). Enable 'yaml-support' feature.",
                    path
                )))
            }
        } else {
            if !path.ends_with(".json") {
                info!("Unknown file extension for {}, defaulting to JSON format", path);
            }
            Self::parse_document_with_context(&content, Some(path))
        }
    }

    /// Parse a typed Manifest from file
    pub fn from_file(path: &str) -> Result<Manifest, ManifestError> {
        let document = Self::read_document(path)?;
        let result = Self::into_manifest(document);

        match &result {
            Ok(_) => info!("Successfully loaded manifest from {}", path),
            Err(e) => error!("Failed to load manifest from {}: {}", path, e),
        }

        result
    }

    /// Serialize Manifest to a JSON string
    pub fn to_json(manifest: &Manifest) -> Result<String, ManifestError> {
        debug!("Serializing manifest to JSON");
        serde_json::to_string_pretty(manifest).map_err(|e| {
            error!("Failed to serialize manifest to JSON: {}", e);
            ManifestError::shape(format!("JSON serialization error: {}", e))
        })
    }
}
