use log::{debug, info};
use serde_json::Value;

use crate::config::ContentTypeScope;
use crate::error::{ManifestError, ManifestErrorCode};
use crate::remote::fetcher::ResourceFetcher;
use crate::utils::JsonUtils;

/// Fetches a remote JSON collection and hands each top-level entry to a validator
pub struct DocumentWalker<'a> {
    fetcher: &'a dyn ResourceFetcher,
    scope: ContentTypeScope,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(fetcher: &'a dyn ResourceFetcher, scope: ContentTypeScope) -> Self {
        Self { fetcher, scope }
    }

    /// GET `uri` once, validate every entry in document order, return the entry count.
    ///
    /// The validator receives `(key, value, check_content_type)`; keys are `None` for arrays.
    pub fn walk<V>(
        &self,
        uri: &str,
        validator: V,
        check_content_type: bool,
    ) -> Result<usize, ManifestError>
    where
        V: FnMut(Option<&str>, &Value, bool) -> Result<(), ManifestError>,
    {
        info!("Walking remote collection {}", uri);
        let document = self.fetcher.get_json(uri)?;
        let count = Self::traverse_entries(&document, self.scope, check_content_type, validator)
            .map_err(|e| e.with_context("uri", Value::String(uri.to_string())))?;
        debug!("{} entries validated from {}", count, uri);
        Ok(count)
    }

    /// Validate the top-level entries of an already fetched document
    pub fn traverse_entries<V>(
        document: &Value,
        scope: ContentTypeScope,
        check_content_type: bool,
        mut validator: V,
    ) -> Result<usize, ManifestError>
    where
        V: FnMut(Option<&str>, &Value, bool) -> Result<(), ManifestError>,
    {
        let flag = |index: usize| {
            check_content_type && (index == 0 || scope == ContentTypeScope::EveryEntry)
        };

        match document {
            Value::Object(entries) => {
                for (index, (key, value)) in entries.iter().enumerate() {
                    validator(Some(key.as_str()), value, flag(index))
                        .map_err(|e| e.with_context("entry", Value::String(key.clone())))?;
                }
                Ok(entries.len())
            }
            Value::Array(entries) => {
                for (index, value) in entries.iter().enumerate() {
                    validator(None, value, flag(index))
                        .map_err(|e| e.with_context("entry", Value::from(index)))?;
                }
                Ok(entries.len())
            }
            other => Err(ManifestError::new(
                ManifestErrorCode::ParseError,
                Some(format!(
                    "expected a JSON object or array, got {}",
                    JsonUtils::type_name(other)
                )),
            )),
        }
    }
}
