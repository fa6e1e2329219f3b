#![deny(missing_docs)]

//! # Mock Resolution
//!
//! Decides the `(status, body)` pair served for one operation.
//!
//! 1. The operation's mock record is looked up by storage key.
//! 2. If a record exists, its preferred status (`200`, then `201`, then the first
//!    declared one) and the body stored under it are returned unmodified.
//! 3. Otherwise a cheap fallback is derived from `responses["200"]` alone: its
//!    JSON example if any, else a generic envelope. No schema synthesis happens
//!    here; that is the corpus builder's job.
//!
//! Errors are returned, never swallowed. The HTTP layer turns them into
//! [`internal_error_body`].

use crate::error::{AppError, AppResult};
use crate::oas::models::{HttpMethod, Operation, APPLICATION_JSON};
use crate::paths::{to_storage_key, StorageKey};
use crate::synthesis::iso_timestamp;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Status used when a record's first key is not a number (e.g. `default`).
pub const DEFAULT_STATUS: u16 = 200;

/// Status codes tried before falling back to the record's first entry.
const PREFERRED_STATUSES: [&str; 2] = ["200", "201"];

/// The contents of one override file: status code string -> response body.
///
/// Entry order is the file's declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockRecord(IndexMap<String, JsonValue>);

impl MockRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the body for `status`.
    pub fn insert(&mut self, status: impl Into<String>, body: JsonValue) {
        self.0.insert(status.into(), body);
    }

    /// Body stored for `status`.
    pub fn get(&self, status: &str) -> Option<&JsonValue> {
        self.0.get(status)
    }

    /// Whether the record holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Status code strings in declaration order.
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Picks the status to serve and its body.
    ///
    /// `"200"` if present, else `"201"`, else the first entry; a first key that
    /// is not a valid HTTP status maps to [`DEFAULT_STATUS`]. `None` for an
    /// empty record.
    pub fn preferred(&self) -> Option<(u16, &JsonValue)> {
        for status in PREFERRED_STATUSES {
            if let Some(body) = self.0.get(status) {
                return Some((parse_status(status).unwrap_or(DEFAULT_STATUS), body));
            }
        }
        let (status, body) = self.0.first()?;
        Some((parse_status(status).unwrap_or(DEFAULT_STATUS), body))
    }
}

impl FromIterator<(String, JsonValue)> for MockRecord {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        MockRecord(iter.into_iter().collect())
    }
}

fn parse_status(status: &str) -> Option<u16> {
    status
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|code| (100..=999).contains(code))
}

/// Read access to the override corpus.
pub trait OverrideLookup {
    /// Returns the record stored at `key`, `None` if there is none.
    ///
    /// A record that exists but cannot be read is an [`AppError::MockRead`].
    fn lookup(&self, key: &StorageKey) -> AppResult<Option<MockRecord>>;
}

/// Override corpus stored as files under a `mocks/` directory.
///
/// Files are read on every lookup, so edits are visible immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsOverrides {
    root: PathBuf,
}

impl FsOverrides {
    /// Serves records from `root` (usually `<generated>/mocks`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsOverrides { root: root.into() }
    }

    /// The mocks directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OverrideLookup for FsOverrides {
    fn lookup(&self, key: &StorageKey) -> AppResult<Option<MockRecord>> {
        let path = key.to_path(&self.root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::MockRead {
                    path,
                    reason: e.to_string(),
                })
            }
        };

        serde_json::from_str::<MockRecord>(&content)
            .map(Some)
            .map_err(|e| AppError::MockRead {
                path,
                reason: e.to_string(),
            })
    }
}

/// A resolved mock response.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: JsonValue,
}

/// Resolves the response for one operation.
///
/// # Arguments
///
/// * `template` - The OpenAPI path template (e.g. `/pets/{petId}`).
/// * `method` - The operation's method.
/// * `operation` - The operation, consulted only when no record exists.
/// * `overrides` - Access to the override corpus.
pub fn resolve(
    template: &str,
    method: HttpMethod,
    operation: &Operation,
    overrides: &impl OverrideLookup,
) -> AppResult<MockResponse> {
    let key = to_storage_key(template, method);

    if let Some(record) = overrides.lookup(&key)? {
        if let Some((status, body)) = record.preferred() {
            log::debug!("{} {} served from mock file {}", method, template, key);
            return Ok(MockResponse {
                status,
                body: body.clone(),
            });
        }
        log::debug!("Mock file {} is empty, using fallback", key);
    }

    Ok(MockResponse {
        status: DEFAULT_STATUS,
        body: fallback_body(operation, Utc::now()),
    })
}

/// The body served when an operation has no mock record.
///
/// The explicit example of `responses["200"]`'s `application/json` content (on
/// the media type, else on its schema), or the generic envelope
/// `{message, timestamp, data}`.
pub fn fallback_body(operation: &Operation, now: DateTime<Utc>) -> JsonValue {
    operation
        .responses
        .get("200")
        .and_then(|response| response.content.get(APPLICATION_JSON))
        .and_then(|media| {
            media
                .example
                .clone()
                .or_else(|| media.schema.as_ref().and_then(|s| s.example.clone()))
        })
        .unwrap_or_else(|| {
            json!({
                "message": "Mock response",
                "timestamp": iso_timestamp(now),
                "data": {}
            })
        })
}

/// The body of the 500 response sent when resolution fails.
pub fn internal_error_body() -> JsonValue {
    json!({
        "error": "Internal server error",
        "message": "Failed to generate mock response"
    })
}
