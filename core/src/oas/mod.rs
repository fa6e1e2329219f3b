#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **models**: Typed view of paths, operations, responses and schemas.
//! - **loader**: JSON/YAML parsing and spec-file discovery.
//! - **ref_utils**: `$ref` pointer helpers.

pub mod loader;
pub mod models;
pub(crate) mod ref_utils;

pub use loader::{discover_spec, spec_copy_name, SpecDocument, SPEC_FILE_NAMES};
pub use models::{
    Components, ExampleObject, HttpMethod, MediaTypeObject, Operation, PathItem, ResponseSpec,
    Schema, SchemaKind, Spec, APPLICATION_JSON,
};
