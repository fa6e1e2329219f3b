#![deny(missing_docs)]

//! # Spec Loading
//!
//! Turns spec text into a [`SpecDocument`] and finds the spec file of a
//! generated directory.

use crate::error::{AppError, AppResult};
use crate::oas::models::Spec;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed by [`discover_spec`], in priority order.
pub const SPEC_FILE_NAMES: [&str; 3] = ["openapi.json", "openapi.yaml", "openapi.yml"];

/// A parsed OpenAPI document.
///
/// Immutable once built; shared read-only by the server and the corpus builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    /// The whole document as parsed, including parts the engine does not model.
    pub raw: JsonValue,
    /// Typed view of `paths` and `components.schemas`.
    pub spec: Spec,
}

impl SpecDocument {
    /// Parses spec text. JSON is tried first, YAML on failure.
    pub fn parse(content: &str) -> AppResult<Self> {
        let raw = match serde_json::from_str::<JsonValue>(content) {
            Ok(value) => value,
            Err(json_err) => serde_yaml::from_str::<JsonValue>(content).map_err(|yaml_err| {
                AppError::SpecParse(format!(
                    "not valid JSON ({}) nor YAML ({})",
                    json_err, yaml_err
                ))
            })?,
        };

        if !raw.is_object() {
            return Err(AppError::SpecParse(
                "document root must be a mapping".to_string(),
            ));
        }

        let spec = Spec::from_value(&raw);
        Ok(SpecDocument { raw, spec })
    }

    /// Reads and parses a spec file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// Finds the spec file of a generated directory.
///
/// Looks for `openapi.json`, `openapi.yaml`, then `openapi.yml`; the first one
/// that exists wins.
pub fn discover_spec(dir: &Path) -> AppResult<PathBuf> {
    SPEC_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| AppError::SpecNotFound(dir.to_path_buf()))
}

/// File name under which a copy of the source spec is stored.
///
/// `openapi.json` when the source is a `.json` path or the text is a JSON
/// object, `openapi.yaml` otherwise.
pub fn spec_copy_name(source: &str, content: &str) -> &'static str {
    if source.ends_with(".json") || content.trim_start().starts_with('{') {
        SPEC_FILE_NAMES[0]
    } else {
        SPEC_FILE_NAMES[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::HttpMethod;
    use tempfile::tempdir;

    const PETS_YAML: &str = r#"
openapi: 3.0.0
info: {title: Pets, version: 1.0.0}
paths:
  /pets:
    get:
      responses:
        200:
          description: OK
          content:
            application/json:
              example: [{id: 1, name: Fluffy}]
components:
  schemas:
    Pet:
      type: object
"#;

    #[test]
    fn test_parse_yaml_with_numeric_status_keys() {
        let doc = SpecDocument::parse(PETS_YAML).unwrap();
        let op = doc.spec.operation("/pets", HttpMethod::Get).unwrap();
        assert!(op.responses.contains_key("200"));
        assert!(doc.spec.components.schemas.contains_key("Pet"));
        assert_eq!(doc.raw["info"]["title"], "Pets");
    }

    #[test]
    fn test_parse_json() {
        let doc = SpecDocument::parse(r#"{"openapi": "3.0.0", "paths": {"/a": {"get": {}}}}"#)
            .unwrap();
        assert_eq!(doc.spec.operations().count(), 1);
    }

    #[test]
    fn test_parse_keeps_operations_with_ill_typed_members() {
        let doc = SpecDocument::parse(
            r#"
paths:
  /a:
    get:
      responses:
        '204': {description: x, content: }
  /b:
    get: {operationId: 12, responses: {}}
  /c:
    get:
      responses:
        '200':
          content:
            application/json:
              examples: {first: not-an-object, second: {value: 2}}
  /d: null
"#,
        )
        .unwrap();

        let routes: Vec<_> = doc
            .spec
            .operations()
            .map(|(template, method, _)| format!("{} {}", method, template))
            .collect();
        assert_eq!(routes, vec!["GET /a", "GET /b", "GET /c"]);

        let b = doc.spec.operation("/b", HttpMethod::Get).unwrap();
        assert_eq!(b.operation_id, None);

        let c = doc.spec.operation("/c", HttpMethod::Get).unwrap();
        let media = c.responses["200"].preferred_media().unwrap();
        assert_eq!(media.examples.keys().collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn test_parse_rejects_scalar_document() {
        let err = SpecDocument::parse("just a string").unwrap_err();
        assert!(matches!(err, AppError::SpecParse(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = SpecDocument::parse("{ unbalanced: [").unwrap_err();
        assert!(matches!(err, AppError::SpecParse(_)));
    }

    #[test]
    fn test_discover_spec_priority() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.yml"), "paths: {}").unwrap();
        assert_eq!(
            discover_spec(dir.path()).unwrap(),
            dir.path().join("openapi.yml")
        );

        fs::write(dir.path().join("openapi.yaml"), "paths: {}").unwrap();
        assert_eq!(
            discover_spec(dir.path()).unwrap(),
            dir.path().join("openapi.yaml")
        );

        fs::write(dir.path().join("openapi.json"), "{}").unwrap();
        assert_eq!(
            discover_spec(dir.path()).unwrap(),
            dir.path().join("openapi.json")
        );
    }

    #[test]
    fn test_discover_spec_missing() {
        let dir = tempdir().unwrap();
        let err = discover_spec(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::SpecNotFound(_)));
    }

    #[test]
    fn test_spec_copy_name() {
        assert_eq!(spec_copy_name("api.json", "openapi: 3.0.0"), "openapi.json");
        assert_eq!(spec_copy_name("https://x/api", "  {\"a\": 1}"), "openapi.json");
        assert_eq!(spec_copy_name("api.yml", "openapi: 3.0.0"), "openapi.yaml");
    }
}
