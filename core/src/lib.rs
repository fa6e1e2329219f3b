#![deny(missing_docs)]

//! # Nice Mock Core
//!
//! Turns an OpenAPI document into mock responses.
//!
//! - **synthesis**: schema -> representative JSON value.
//! - **paths**: path template -> route pattern / mock storage key.
//! - **resolver**: operation + override files -> `(status, body)`.
//! - **corpus**: writes the override files for a whole spec.
//! - **dispatch**: the table of routable operations.
//! - **generator**: invocation of the external client/model generator.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) model and loading.
pub mod oas;

/// Schema-driven value synthesis.
pub mod synthesis;

/// Path template transforms.
pub mod paths;

/// Request-time mock resolution.
pub mod resolver;

/// Mock corpus generation.
pub mod corpus;

/// Route dispatch table.
pub mod dispatch;

/// External code generator seam.
pub mod generator;

pub use corpus::{build_corpus, build_corpus_with, CorpusReport, MockConfig, MOCKS_DIR};
pub use dispatch::{available_routes, not_found_body, DispatchEntry, DispatchTable};
pub use error::{AppError, AppResult};
pub use generator::{CodeGenerator, GenerateOptions, OpenApiGeneratorCli};
pub use oas::{discover_spec, HttpMethod, Operation, Schema, Spec, SpecDocument};
pub use paths::{to_route_pattern, to_storage_key, StorageKey};
pub use resolver::{
    internal_error_body, resolve, FsOverrides, MockRecord, MockResponse, OverrideLookup,
};
pub use synthesis::{synthesize, Synthesizer};
