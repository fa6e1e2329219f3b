#![deny(missing_docs)]

//! # Spec Source
//!
//! Reads the raw spec text from a local file or an `http(s)://` URL.
//! The text is returned verbatim; parsing happens in the core.

use crate::error::{CliError, CliResult};
use std::fs;

/// Whether `source` names a remote document.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads the spec text from `source`.
///
/// # Arguments
///
/// * `source` - A file path or `http(s)://` URL.
/// * `auth` - Headers for remote fetches, in OpenAPI Generator's `--auth`
///   format: `Name:value` pairs separated by commas.
pub fn read_spec_source(source: &str, auth: Option<&str>) -> CliResult<String> {
    if is_remote(source) {
        fetch(source, &auth_headers(auth.unwrap_or_default()))
    } else {
        fs::read_to_string(source).map_err(|e| {
            CliError::General(format!("Failed to read OpenAPI spec {}: {}", source, e))
        })
    }
}

/// Splits an `--auth` value into `(name, value)` header pairs.
///
/// Entries without a `:` are ignored.
pub fn auth_headers(auth: &str) -> Vec<(String, String)> {
    auth.split(',')
        .filter_map(|pair| pair.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

#[cfg(feature = "client")]
fn fetch(url: &str, headers: &[(String, String)]) -> CliResult<String> {
    let fetch_error = |e: ureq::Error| CliError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let mut request = ureq::get(url);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let mut response = request.call().map_err(fetch_error)?;
    response.body_mut().read_to_string().map_err(fetch_error)
}

#[cfg(not(feature = "client"))]
fn fetch(url: &str, _headers: &[(String, String)]) -> CliResult<String> {
    Err(CliError::Fetch {
        url: url.to_string(),
        reason: "this build has no HTTP client (enable the `client` feature)".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://petstore3.swagger.io/api/v3/openapi.json"));
        assert!(is_remote("http://localhost/openapi.yaml"));
        assert!(!is_remote("./openapi.yaml"));
        assert!(!is_remote("httpdocs/openapi.yaml"));
    }

    #[test]
    fn test_auth_headers() {
        assert_eq!(
            auth_headers("Authorization:Bearer abc, X-Api-Key:123,broken"),
            vec![
                ("Authorization".to_string(), "Bearer abc".to_string()),
                ("X-Api-Key".to_string(), "123".to_string()),
            ]
        );
        assert!(auth_headers("").is_empty());
    }

    #[test]
    fn test_read_local_file_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        fs::write(&path, "openapi: 3.0.0\n# comment kept\n").unwrap();

        let text = read_spec_source(path.to_str().unwrap(), None).unwrap();
        assert_eq!(text, "openapi: 3.0.0\n# comment kept\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = read_spec_source(path.to_str().unwrap(), None).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read OpenAPI spec"));
    }
}
