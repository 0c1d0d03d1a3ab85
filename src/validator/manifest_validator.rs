use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::error::{ManifestError, ManifestErrorData};
use crate::manifest::model::{Manifest, QuestionExample, RestrictedAnswerSet};
use crate::manifest::request_type::RequestType;
use crate::manifest::shape::{ObjectShape, ShapeValidator, SubDocumentValidator};
use crate::manifest::ManifestParser;
use crate::remote::{
    validate_answer_set_uris, validate_groundtruth_entry, validate_question_example_uris,
    validate_taskdata_entry, ContentTypeChecker, DocumentWalker, HttpFetcher, ResourceFetcher,
};
use crate::rules::RulePipeline;

/// Whether remote URIs are dereferenced after the static and conditional checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Offline,
    Remote,
}

/// What the remote verification step touched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoteSummary {
    /// Entries walked from the root `groundtruth_uri`
    pub groundtruth_entries: Option<usize>,
    /// Entries walked from `taskdata_uri`
    pub taskdata_entries: Option<usize>,
    /// Entries walked from each nested manifest's `groundtruth_uri`, in order
    pub nested_groundtruth_entries: Vec<Option<usize>>,
    /// HEAD requests issued
    pub content_type_probes: usize,
}

/// An accepted, normalized manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedManifest {
    pub manifest: Manifest,
    pub mode: ValidationMode,
    pub remote: RemoteSummary,
}

impl ValidatedManifest {
    pub fn to_json(&self) -> Result<String, ManifestError> {
        ManifestParser::to_json(&self.manifest)
    }
}

/// Static shape, then conditional rules, then optional remote verification
pub struct ManifestValidator<F: ResourceFetcher = HttpFetcher> {
    config: ValidatorConfig,
    fetcher: F,
    sub_validators: Vec<Box<dyn SubDocumentValidator>>,
}

impl ManifestValidator<HttpFetcher> {
    /// Create a validator that fetches over HTTP
    pub fn new(config: ValidatorConfig) -> Result<Self, ManifestError> {
        Self::check_config(&config)?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::assemble(config, fetcher))
    }
}

impl<F: ResourceFetcher> ManifestValidator<F> {
    /// Create a validator with a custom fetcher
    pub fn with_fetcher(config: ValidatorConfig, fetcher: F) -> Result<Self, ManifestError> {
        Self::check_config(&config)?;
        Ok(Self::assemble(config, fetcher))
    }

    fn assemble(config: ValidatorConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            sub_validators: vec![Box::new(ObjectShape::new("restricted_audience"))],
        }
    }

    fn check_config(config: &ValidatorConfig) -> Result<(), ManifestError> {
        config.validate().map_err(|e| {
            error!("Rejected validator configuration: {}", e);
            ManifestError::shape(format!("Invalid validator configuration: {}", e))
        })
    }

    /// Register a collaborator for one sub-document; runs after the ones already registered
    pub fn with_sub_validator<V: SubDocumentValidator + 'static>(mut self, validator: V) -> Self {
        self.sub_validators.push(Box::new(validator));
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn validate_json(
        &self,
        json_str: &str,
        mode: ValidationMode,
    ) -> Result<ValidatedManifest, ManifestError> {
        let document = ManifestParser::parse_document(json_str)?;
        self.validate_value(document, mode)
    }

    pub fn validate_file(
        &self,
        path: &str,
        mode: ValidationMode,
    ) -> Result<ValidatedManifest, ManifestError> {
        let document = ManifestParser::read_document(path)?;
        self.validate_value(document, mode)
    }

    pub fn validate_value(
        &self,
        document: Value,
        mode: ValidationMode,
    ) -> Result<ValidatedManifest, ManifestError> {
        let result = self.run(document, mode);
        match &result {
            Ok(validated) => info!(
                "Manifest {} accepted ({} validation)",
                validated.manifest.job_id,
                match mode {
                    ValidationMode::Offline => "offline",
                    ValidationMode::Remote => "remote",
                }
            ),
            Err(e) => error!("Manifest rejected: {}", e),
        }
        result
    }

    fn run(
        &self,
        document: Value,
        mode: ValidationMode,
    ) -> Result<ValidatedManifest, ManifestError> {
        debug!("Stage shape: typing manifest");
        ShapeValidator::check_discriminators(&document)?;
        let document = ShapeValidator::apply_sub_validators(document, &self.sub_validators)?;
        let manifest = ManifestParser::into_manifest(document)?;
        ShapeValidator::check_manifest(&manifest)?;

        debug!("Stage rule: applying conditional rules");
        let manifest = RulePipeline::apply(manifest)?;

        let remote = match mode {
            ValidationMode::Offline => RemoteSummary::default(),
            ValidationMode::Remote => {
                debug!("Stage remote: verifying remote resources");
                self.verify_remote(&manifest)?
            }
        };

        Ok(ValidatedManifest { manifest, mode, remote })
    }

    fn verify_remote(&self, manifest: &Manifest) -> Result<RemoteSummary, ManifestError> {
        let checker = ContentTypeChecker::new(&self.fetcher, &self.config);
        let walker = DocumentWalker::new(&self.fetcher, self.config.content_type_scope);
        let request_type = manifest.request_type;
        let gated = request_type.requires_content_type_check();
        let mut summary = RemoteSummary::default();

        if let Some(uri) = manifest.groundtruth_uri.as_deref() {
            let count = Self::walk_groundtruth(&walker, &checker, request_type, uri)?;
            summary.groundtruth_entries = Some(count);
        }

        if let Some(uri) = manifest.taskdata_uri.as_deref() {
            let count =
                Self::walk_collection(&walker, "taskdata_uri", uri, gated, |_, value, check| {
                    validate_taskdata_entry(value, check, &checker)
                })?;
            summary.taskdata_entries = Some(count);
        }

        Self::check_example_images(
            manifest.requester_question_example.as_ref(),
            manifest.requester_restricted_answer_set.as_ref(),
            &checker,
        )?;

        for (index, nested) in manifest.nested().iter().enumerate() {
            let prefix = format!("multi_challenge_manifests[{}]", index);
            let count = nested
                .groundtruth_uri
                .as_deref()
                .map(|uri| Self::walk_groundtruth(&walker, &checker, nested.request_type, uri))
                .transpose()
                .map_err(|e| e.under(&prefix))?;
            summary.nested_groundtruth_entries.push(count);

            Self::check_example_images(
                nested.requester_question_example.as_ref(),
                nested.requester_restricted_answer_set.as_ref(),
                &checker,
            )
            .map_err(|e| e.under(&prefix))?;
        }

        summary.content_type_probes = checker.probes();
        debug!("Remote verification summary: {:?}", summary);
        Ok(summary)
    }

    fn walk_groundtruth(
        walker: &DocumentWalker<'_>,
        checker: &ContentTypeChecker<'_>,
        request_type: RequestType,
        uri: &str,
    ) -> Result<usize, ManifestError> {
        Self::walk_collection(
            walker,
            "groundtruth_uri",
            uri,
            request_type.requires_content_type_check(),
            |key, value, check| {
                validate_groundtruth_entry(key, value, request_type, check, checker)
            },
        )
    }

    fn walk_collection<V>(
        walker: &DocumentWalker<'_>,
        field: &str,
        uri: &str,
        check_content_type: bool,
        validator: V,
    ) -> Result<usize, ManifestError>
    where
        V: FnMut(Option<&str>, &Value, bool) -> Result<(), ManifestError>,
    {
        let count = walker
            .walk(uri, validator, check_content_type)
            .map_err(|e| Self::remote_failure(field, e))?;
        if count == 0 {
            error!("Remote collection {} at {} is empty", field, uri);
            return Err(ManifestError::empty_collection(field, uri));
        }
        Ok(count)
    }

    fn check_example_images(
        example: Option<&QuestionExample>,
        answer_set: Option<&RestrictedAnswerSet>,
        checker: &ContentTypeChecker<'_>,
    ) -> Result<(), ManifestError> {
        if let Some(example) = example {
            validate_question_example_uris(example, checker)
                .map_err(|e| e.under("requester_question_example"))?;
        }
        if let Some(answer_set) = answer_set {
            validate_answer_set_uris(answer_set, checker)
                .map_err(|e| e.under("requester_restricted_answer_set"))?;
        }
        Ok(())
    }

    fn remote_failure(field: &str, mut error: ManifestError) -> ManifestError {
        let data = error.data.get_or_insert_with(ManifestErrorData::default);
        data.details = Some(match data.details.take() {
            Some(details) => format!("{} validation failed: {}", field, details),
            None => format!("{} validation failed", field),
        });
        error.under(field)
    }
}
