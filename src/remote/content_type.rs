use log::debug;
use std::cell::Cell;

use crate::config::ValidatorConfig;
use crate::error::ManifestError;
use crate::remote::fetcher::ResourceFetcher;

/// HEAD-only check that a URI serves an allowed content type
pub struct ContentTypeChecker<'a> {
    fetcher: &'a dyn ResourceFetcher,
    config: &'a ValidatorConfig,
    probes: Cell<usize>,
}

impl<'a> ContentTypeChecker<'a> {
    pub fn new(fetcher: &'a dyn ResourceFetcher, config: &'a ValidatorConfig) -> Self {
        Self {
            fetcher,
            config,
            probes: Cell::new(0),
        }
    }

    pub fn check(&self, uri: &str) -> Result<(), ManifestError> {
        self.probes.set(self.probes.get() + 1);
        let content_type = self.fetcher.head_content_type(uri)?.unwrap_or_default();
        debug!("{} declares content type '{}'", uri, content_type);

        if self.config.is_supported_content_type(&content_type) {
            Ok(())
        } else {
            Err(ManifestError::unsupported_content_type(uri, &content_type))
        }
    }

    /// HEAD requests issued so far
    pub fn probes(&self) -> usize {
        self.probes.get()
    }
}
