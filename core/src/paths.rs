#![deny(missing_docs)]

//! # Path Mapping
//!
//! Two transforms over the OpenAPI path-template grammar, where `{name}` is a
//! placeholder for exactly one path segment:
//!
//! - [`to_route_pattern`]: template -> actix-web resource pattern.
//! - [`to_storage_key`]: template + method -> location of the operation's mock record.
//!
//! The corpus builder and the resolver both go through [`to_storage_key`], so
//! a record written at generation time is found again at request time.
//!
//! Known limitation: a placeholder and a literal segment spelled like its
//! storage form share a key (`/users/{id}` and `/users/_id` both map to
//! `users/_id/get.json`), as do placeholders differing only by case on a
//! case-insensitive filesystem. These are not disambiguated.

use crate::oas::models::HttpMethod;
use regex::{Captures, Regex};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"))
}

/// Names of the placeholders in `template`, in order.
pub fn placeholders(template: &str) -> Vec<&str> {
    placeholder_re()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Converts an OpenAPI path template to an actix-web resource pattern.
///
/// `{name}` becomes the single-segment capture `{name}`; characters that actix
/// would read as pattern syntax (anything outside `[A-Za-z0-9_]`, notably `:`)
/// are replaced by `_` in the capture name. Literal text is kept verbatim.
///
/// e.g. `/users/{user-id}/posts` -> `/users/{user_id}/posts`
pub fn to_route_pattern(template: &str) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures<'_>| {
            let name: String = caps[1]
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
                .collect();
            format!("{{{}}}", name)
        })
        .into_owned()
}

/// Location of one operation's mock record, relative to the mocks directory.
///
/// Always `/`-separated, e.g. `pets/_petId/get.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// The key as a `/`-separated relative path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the key under `root` using the platform's separator.
    ///
    /// Empty, `.` and `..` segments are dropped, so the result never leaves `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the storage key of an operation.
///
/// Strips one leading `/`, turns every `{name}` into `_name`, keeps the other
/// separators, and appends `<method>.json`.
///
/// e.g. (`/users/{id}/posts`, GET) -> `users/_id/posts/get.json`
pub fn to_storage_key(template: &str, method: HttpMethod) -> StorageKey {
    let trimmed = template.strip_prefix('/').unwrap_or(template);
    let directory = placeholder_re().replace_all(trimmed, "_${1}");
    let file = format!("{}.json", method.as_lower());

    if directory.is_empty() {
        StorageKey(file)
    } else if directory.ends_with('/') {
        StorageKey(format!("{}{}", directory, file))
    } else {
        StorageKey(format!("{}/{}", directory, file))
    }
}
