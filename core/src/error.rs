//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// No `openapi.{json,yaml,yml}` was found in the served directory.
    #[from(ignore)]
    #[display("OpenAPI specification not found in {_0:?}")]
    SpecNotFound(PathBuf),

    /// The spec text was neither valid JSON nor valid YAML, or did not have
    /// the shape of an OpenAPI document.
    #[from(ignore)]
    #[display("Failed to parse OpenAPI specification: {_0}")]
    SpecParse(String),

    /// A `$ref` could not be resolved, or resolving it would loop forever.
    #[from(ignore)]
    #[display("Schema resolution failed: {_0}")]
    SchemaResolution(String),

    /// An override file exists but could not be read as a mock record.
    #[from(ignore)]
    #[display("Failed to read mock file {path:?}: {reason}")]
    MockRead {
        /// Location of the offending override file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The external code generator could not be started or exited non-zero.
    #[from(ignore)]
    #[display("OpenAPI Generator failed: {_0}")]
    GeneratorInvocation(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));
    }

    #[test]
    fn test_schema_resolution_display() {
        let app_err = AppError::SchemaResolution("unknown schema `Pet`".into());
        assert_eq!(
            format!("{}", app_err),
            "Schema resolution failed: unknown schema `Pet`"
        );
    }

    #[test]
    fn test_mock_read_display_names_file() {
        let app_err = AppError::MockRead {
            path: PathBuf::from("mocks/pets/get.json"),
            reason: "expected a JSON object".into(),
        };
        let rendered = format!("{}", app_err);
        assert!(rendered.contains("mocks/pets/get.json"));
        assert!(rendered.contains("expected a JSON object"));
    }
}
