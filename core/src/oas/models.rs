#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! The read-only view of an OpenAPI document that the mock engine works on.
//!
//! Only the parts needed to answer requests are modelled: `paths`, the
//! operations under them, their `responses`, and `components.schemas`.
//! Everything else in the document is ignored (but kept in the raw tree held
//! by [`crate::oas::SpecDocument`]).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Media type consulted first when picking a response body.
pub const APPLICATION_JSON: &str = "application/json";

/// The closed set of HTTP methods an OpenAPI path item may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// Every supported method, in the order OpenAPI lists them in a Path Item.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Parses a Path Item key (case-insensitive).
    ///
    /// Returns `None` for keys that are not operations (`parameters`, `summary`, `x-*`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_lower().eq_ignore_ascii_case(key))
    }

    /// Lower-case name, as used in Path Item keys and storage keys.
    pub fn as_lower(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Upper-case name, as sent on the wire.
    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

/// The typed part of an OpenAPI document.
///
/// Every level is read leniently: members of the wrong JSON type are dropped
/// (and `null` maps read as empty) so one bad field never hides an operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct Spec {
    /// `paths`: template -> path item, in declaration order.
    pub paths: IndexMap<String, PathItem>,
    /// `components`, only `schemas` is read.
    pub components: Components,
}

impl Spec {
    /// Converts a raw document root.
    pub fn from_value(value: &JsonValue) -> Self {
        Spec {
            paths: object_entries(value.get("paths"), "path item")
                .map(|(template, item)| (template.clone(), PathItem::from_value(item)))
                .collect(),
            components: value
                .get("components")
                .map(Components::from_value)
                .unwrap_or_default(),
        }
    }

    /// Iterates `(path template, method, operation)` over every well-formed operation,
    /// in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(template, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (template.as_str(), *method, op))
        })
    }

    /// Looks up a single operation.
    pub fn operation(&self, template: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(template)?.operations.get(&method)
    }
}

impl From<JsonValue> for Spec {
    fn from(value: JsonValue) -> Self {
        Spec::from_value(&value)
    }
}

/// `components` of the document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct Components {
    /// Named reusable schemas, the target of `#/components/schemas/<Name>`.
    pub schemas: IndexMap<String, Schema>,
}

impl Components {
    /// Converts a raw `components` object.
    pub fn from_value(value: &JsonValue) -> Self {
        Components {
            schemas: value
                .get("schemas")
                .and_then(JsonValue::as_object)
                .map(|schemas| {
                    schemas
                        .iter()
                        .map(|(name, schema)| (name.clone(), Schema::from_value(schema)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl From<JsonValue> for Components {
    fn from(value: JsonValue) -> Self {
        Components::from_value(&value)
    }
}

/// A Path Item reduced to its operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct PathItem {
    /// Operations keyed by method, in declaration order.
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl PathItem {
    /// Converts a raw Path Item. Keys that are not methods are skipped.
    pub fn from_value(value: &JsonValue) -> Self {
        let mut operations = IndexMap::new();
        let Some(raw) = value.as_object() else {
            return PathItem { operations };
        };
        for (key, value) in raw {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            if !value.is_object() {
                log::debug!("Ignoring `{}` entry that is not an object", key);
                continue;
            }
            operations
                .entry(method)
                .or_insert_with(|| Operation::from_value(value));
        }
        PathItem { operations }
    }
}

impl From<JsonValue> for PathItem {
    fn from(value: JsonValue) -> Self {
        PathItem::from_value(&value)
    }
}

/// One HTTP method's behavior on one path template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct Operation {
    /// `operationId`, informational only.
    pub operation_id: Option<String>,
    /// `summary`, informational only.
    pub summary: Option<String>,
    /// Status code string -> response, in declaration order.
    pub responses: IndexMap<String, ResponseSpec>,
}

impl Operation {
    /// Converts a raw Operation Object.
    pub fn from_value(value: &JsonValue) -> Self {
        Operation {
            operation_id: string_member(value, "operationId"),
            summary: string_member(value, "summary"),
            responses: object_entries(value.get("responses"), "response")
                .map(|(status, response)| (status.clone(), ResponseSpec::from_value(response)))
                .collect(),
        }
    }
}

impl From<JsonValue> for Operation {
    fn from(value: JsonValue) -> Self {
        Operation::from_value(&value)
    }
}

/// A Response Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct ResponseSpec {
    /// Media type -> payload description.
    pub content: IndexMap<String, MediaTypeObject>,
}

impl ResponseSpec {
    /// Converts a raw Response Object.
    pub fn from_value(value: &JsonValue) -> Self {
        ResponseSpec {
            content: object_entries(value.get("content"), "media type")
                .map(|(media_type, media)| (media_type.clone(), MediaTypeObject::from_value(media)))
                .collect(),
        }
    }

    /// The media type used for mock bodies: `application/json`, else the first declared one.
    pub fn preferred_media(&self) -> Option<&MediaTypeObject> {
        self.content
            .get(APPLICATION_JSON)
            .or_else(|| self.content.values().next())
    }
}

impl From<JsonValue> for ResponseSpec {
    fn from(value: JsonValue) -> Self {
        ResponseSpec::from_value(&value)
    }
}

/// A Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct MediaTypeObject {
    /// The payload schema.
    pub schema: Option<Schema>,
    /// A single example; `Some(Null)` when the document says `example: null`.
    pub example: Option<JsonValue>,
    /// Named examples, in declaration order.
    pub examples: IndexMap<String, ExampleObject>,
}

impl MediaTypeObject {
    /// Converts a raw Media Type Object.
    pub fn from_value(value: &JsonValue) -> Self {
        MediaTypeObject {
            schema: value.get("schema").map(Schema::from_value),
            example: value.get("example").cloned(),
            examples: object_entries(value.get("examples"), "example")
                .map(|(name, example)| (name.clone(), ExampleObject::from_value(example)))
                .collect(),
        }
    }
}

impl From<JsonValue> for MediaTypeObject {
    fn from(value: JsonValue) -> Self {
        MediaTypeObject::from_value(&value)
    }
}

/// An Example Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct ExampleObject {
    /// Inline example value. Absent for `externalValue` examples.
    pub value: Option<JsonValue>,
}

impl ExampleObject {
    /// Converts a raw Example Object.
    pub fn from_value(value: &JsonValue) -> Self {
        ExampleObject {
            value: value.get("value").cloned(),
        }
    }
}

impl From<JsonValue> for ExampleObject {
    fn from(value: JsonValue) -> Self {
        ExampleObject::from_value(&value)
    }
}

/// The object-valued members of `raw`; anything else is skipped. A missing
/// or non-object `raw` has no entries.
fn object_entries<'a>(
    raw: Option<&'a JsonValue>,
    what: &'static str,
) -> impl Iterator<Item = (&'a String, &'a JsonValue)> {
    raw.and_then(JsonValue::as_object)
        .into_iter()
        .flatten()
        .filter(move |(key, value)| {
            if value.is_object() {
                true
            } else {
                log::debug!("Ignoring {} `{}` that is not an object", what, key);
                false
            }
        })
}

fn string_member(value: &JsonValue, key: &str) -> Option<String> {
    value.get(key).and_then(JsonValue::as_str).map(str::to_string)
}

/// A schema node.
///
/// Built from any JSON value: a non-object (e.g. a boolean schema) becomes an
/// untyped node, so conversion never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// What kind of value the node describes.
    pub kind: SchemaKind,
    /// The node's own `example`, if the key is present (even as `null`).
    pub example: Option<JsonValue>,
}

/// The tagged part of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// `{"$ref": "..."}`. Sibling keywords are ignored.
    Reference(String),
    /// `type: object`, properties in declaration order.
    Object(IndexMap<String, Schema>),
    /// `type: array`.
    Array(Option<Box<Schema>>),
    /// `type: string`.
    String {
        /// `format`, e.g. `date-time`.
        format: Option<String>,
        /// `enum` members in declaration order.
        enumeration: Vec<JsonValue>,
    },
    /// `type: integer`.
    Integer,
    /// `type: number`.
    Number,
    /// `type: boolean`.
    Boolean,
    /// No recognised type.
    Untyped,
}

impl Schema {
    /// A schema with a `$ref` to `target`.
    pub fn reference(target: impl Into<String>) -> Self {
        Schema {
            kind: SchemaKind::Reference(target.into()),
            example: None,
        }
    }

    /// Converts a raw schema value.
    pub fn from_value(value: &JsonValue) -> Self {
        let Some(map) = value.as_object() else {
            return Schema {
                kind: SchemaKind::Untyped,
                example: None,
            };
        };

        if let Some(target) = map.get("$ref").and_then(JsonValue::as_str) {
            return Schema::reference(target);
        }

        let kind = match declared_type(map.get("type")) {
            Some("object") => SchemaKind::Object(properties(map)),
            Some("array") => SchemaKind::Array(items(map)),
            Some("string") => SchemaKind::String {
                format: map
                    .get("format")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                enumeration: map
                    .get("enum")
                    .and_then(JsonValue::as_array)
                    .cloned()
                    .unwrap_or_default(),
            },
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            Some(_) => SchemaKind::Untyped,
            None if map.contains_key("properties") => SchemaKind::Object(properties(map)),
            None if map.contains_key("items") => SchemaKind::Array(items(map)),
            None => SchemaKind::Untyped,
        };

        Schema {
            kind,
            example: map.get("example").cloned(),
        }
    }
}

impl From<JsonValue> for Schema {
    fn from(value: JsonValue) -> Self {
        Schema::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Schema::from)
    }
}

/// `type` is either a string or (OAS 3.1) a list such as `["string", "null"]`.
fn declared_type(raw: Option<&JsonValue>) -> Option<&str> {
    match raw? {
        JsonValue::String(s) => Some(s.as_str()),
        JsonValue::Array(types) => types
            .iter()
            .filter_map(JsonValue::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn properties(map: &Map<String, JsonValue>) -> IndexMap<String, Schema> {
    map.get("properties")
        .and_then(JsonValue::as_object)
        .map(|props| {
            props
                .iter()
                .filter(|(_, schema)| schema.is_object())
                .map(|(name, schema)| (name.clone(), Schema::from_value(schema)))
                .collect()
        })
        .unwrap_or_default()
}

fn items(map: &Map<String, JsonValue>) -> Option<Box<Schema>> {
    map.get("items")
        .filter(|schema| schema.is_object())
        .map(|schema| Box::new(Schema::from_value(schema)))
}
