#![deny(missing_docs)]

//! # Mock Corpus Builder
//!
//! Materializes one mock record per operation under `<output>/mocks/`, plus the
//! informational `mock-config.json` manifest.
//!
//! For each response that declares content, the body is taken from (in order):
//! the first named example, the single `example`, a value synthesized from the
//! schema, or `{"message": "Mock response"}`.
//!
//! Existing records are overwritten, never merged.

use crate::error::{AppError, AppResult};
use crate::oas::loader::SpecDocument;
use crate::oas::models::{HttpMethod, MediaTypeObject, Operation};
use crate::paths::to_storage_key;
use crate::resolver::{MockRecord, DEFAULT_STATUS};
use crate::synthesis::Synthesizer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory (under the output root) holding the mock records.
pub const MOCKS_DIR: &str = "mocks";

/// File name of the manifest written next to the mocks.
pub const MOCK_CONFIG_FILE: &str = "mock-config.json";

/// Port advertised in the manifest; matches the `run` command's default.
pub const DEFAULT_PORT: u16 = 3000;

/// The `mock-config.json` manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockConfig {
    /// The whole source document.
    pub spec: JsonValue,
    /// Where the records live, relative to the manifest.
    pub mocks_directory: String,
    /// Status assumed when nothing else decides.
    pub default_response_status: u16,
    /// Whether the server answers with permissive CORS headers.
    pub cors: bool,
    /// Default port of the mock server.
    pub port: u16,
}

impl MockConfig {
    /// The manifest for `document` with the default settings.
    pub fn for_document(document: &SpecDocument) -> Self {
        MockConfig {
            spec: document.raw.clone(),
            mocks_directory: format!("./{}", MOCKS_DIR),
            default_response_status: DEFAULT_STATUS,
            cors: true,
            port: DEFAULT_PORT,
        }
    }
}

/// An operation whose record was not written because synthesis failed.
#[derive(Debug)]
pub struct SkippedOperation {
    /// Path template of the operation.
    pub template: String,
    /// Method of the operation.
    pub method: HttpMethod,
    /// Why it was skipped (an [`AppError::SchemaResolution`]).
    pub error: AppError,
}

/// Outcome of a corpus build.
#[derive(Debug, Default)]
pub struct CorpusReport {
    /// Record files written, in spec order.
    pub written: Vec<PathBuf>,
    /// Operations left without a record.
    pub skipped: Vec<SkippedOperation>,
    /// Location of the manifest.
    pub config_path: PathBuf,
}

/// Builds the corpus for `document` under `output_dir`, stamping dates with the current time.
pub fn build_corpus(document: &SpecDocument, output_dir: &Path) -> AppResult<CorpusReport> {
    let synthesizer = Synthesizer::new(&document.spec.components);
    build_corpus_with(document, output_dir, &synthesizer)
}

/// Builds the corpus using a caller-supplied synthesizer.
///
/// Stops at the first I/O error. A schema that cannot be resolved only skips
/// its own operation.
pub fn build_corpus_with(
    document: &SpecDocument,
    output_dir: &Path,
    synthesizer: &Synthesizer<'_>,
) -> AppResult<CorpusReport> {
    let mocks_dir = output_dir.join(MOCKS_DIR);
    fs::create_dir_all(&mocks_dir)?;

    let mut report = CorpusReport::default();

    for (template, method, operation) in document.spec.operations() {
        let record = match build_record(operation, synthesizer) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(error) => {
                log::warn!("Skipping mock for {} {}: {}", method, template, error);
                report.skipped.push(SkippedOperation {
                    template: template.to_string(),
                    method,
                    error,
                });
                continue;
            }
        };

        let path = to_storage_key(template, method).to_path(&mocks_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        log::debug!("Wrote mock {:?}", path);
        report.written.push(path);
    }

    report.config_path = write_mock_config(document, output_dir)?;
    Ok(report)
}

/// Builds the record of one operation.
///
/// Returns `None` when no response declares content.
pub fn build_record(
    operation: &Operation,
    synthesizer: &Synthesizer<'_>,
) -> AppResult<Option<MockRecord>> {
    let mut record = MockRecord::new();

    for (status, response) in &operation.responses {
        if let Some(media) = response.preferred_media() {
            record.insert(status.clone(), media_value(media, synthesizer)?);
        }
    }

    Ok(if record.is_empty() { None } else { Some(record) })
}

/// The mock body for one media type.
pub fn media_value(media: &MediaTypeObject, synthesizer: &Synthesizer<'_>) -> AppResult<JsonValue> {
    if let Some(value) = media.examples.values().next().and_then(|ex| ex.value.as_ref()) {
        return Ok(value.clone());
    }
    if let Some(example) = &media.example {
        return Ok(example.clone());
    }
    match &media.schema {
        Some(schema) => synthesizer.synthesize(schema),
        None => Ok(json!({ "message": "Mock response" })),
    }
}

/// Writes `mock-config.json` and returns its path.
pub fn write_mock_config(document: &SpecDocument, output_dir: &Path) -> AppResult<PathBuf> {
    let path = output_dir.join(MOCK_CONFIG_FILE);
    let config = MockConfig::for_document(document);
    fs::write(&path, serde_json::to_string_pretty(&config)?)?;
    Ok(path)
}
