#![deny(missing_docs)]

//! # Dispatch Table
//!
//! Maps `(route pattern, method)` to the operation that answers it. Built once
//! per spec load and never patched; a new spec means a new table.

use crate::oas::models::{HttpMethod, Operation, Spec};
use crate::paths::to_route_pattern;
use serde_json::{json, Value as JsonValue};

/// One routable operation.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEntry {
    /// OpenAPI path template, e.g. `/pets/{petId}`.
    pub template: String,
    /// The operation's method.
    pub method: HttpMethod,
    /// Framework route pattern derived from `template`.
    pub route_pattern: String,
    /// The operation itself.
    pub operation: Operation,
}

/// All routable operations of one spec, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchTable {
    entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    /// Builds the table from every well-formed operation in `spec`.
    pub fn build(spec: &Spec) -> Self {
        let entries = spec
            .operations()
            .map(|(template, method, operation)| DispatchEntry {
                template: template.to_string(),
                method,
                route_pattern: to_route_pattern(template),
                operation: operation.clone(),
            })
            .collect();
        DispatchTable { entries }
    }

    /// Every entry.
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the spec declared no operations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `entry` also answers `HEAD` requests.
    ///
    /// A `GET` operation does, unless its template declares its own `HEAD`.
    pub fn answers_head(&self, entry: &DispatchEntry) -> bool {
        entry.method == HttpMethod::Get && self.find(&entry.template, HttpMethod::Head).is_none()
    }

    /// The entry registered for `template` and `method`.
    pub fn find(&self, template: &str, method: HttpMethod) -> Option<&DispatchEntry> {
        self.entries
            .iter()
            .find(|entry| entry.template == template && entry.method == method)
    }
}

/// `"<METHOD> <template>"` for every operation in `spec`.
pub fn available_routes(spec: &Spec) -> Vec<String> {
    spec.operations()
        .map(|(template, method, _)| format!("{} {}", method, template))
        .collect()
}

/// Body of the 404 sent for requests no operation matches.
///
/// # Arguments
///
/// * `method` - The request method as received.
/// * `original_uri` - The request URI as received (path and query).
/// * `spec` - The loaded spec; the route listing is derived from it on each call.
pub fn not_found_body(method: &str, original_uri: &str, spec: &Spec) -> JsonValue {
    json!({
        "error": "Route not found",
        "message": format!("No mock defined for {} {}", method, original_uri),
        "availableRoutes": available_routes(spec)
    })
}
