#![deny(missing_docs)]

//! # Schema Synthesis
//!
//! Builds a representative JSON value from a schema node.
//!
//! Rules, applied at every node:
//! 1. `$ref` is resolved against `components.schemas` and followed.
//! 2. An explicit `example` is returned as-is, whatever the type.
//! 3. Otherwise the value is derived from `type`:
//!    objects recurse over their properties, arrays hold exactly one element,
//!    and scalars get a fixed placeholder (`"string"`, `1`, `1.0`, `true`).
//!
//! The only time-dependent output is `format: date-time` / `format: date`,
//! which use the instant captured when the [`Synthesizer`] was created.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Components, Schema, SchemaKind};
use crate::oas::ref_utils::extract_component_name;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value as JsonValue};

/// Placeholder for `format: email`.
pub const EXAMPLE_EMAIL: &str = "example@example.com";

/// Placeholder for a plain string.
pub const EXAMPLE_STRING: &str = "string";

/// Formats an instant the way JavaScript's `toISOString` does (`2024-01-01T00:00:00.000Z`).
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Synthesizes values against one document's component registry.
#[derive(Debug, Clone)]
pub struct Synthesizer<'a> {
    components: &'a Components,
    now: DateTime<Utc>,
}

impl<'a> Synthesizer<'a> {
    /// Creates a synthesizer that stamps dates with the current time.
    pub fn new(components: &'a Components) -> Self {
        Synthesizer {
            components,
            now: Utc::now(),
        }
    }

    /// Pins the instant used for `date-time` and `date` strings.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Produces a value for `schema`.
    ///
    /// Fails with [`AppError::SchemaResolution`] on a dangling or circular `$ref`.
    pub fn synthesize(&self, schema: &Schema) -> AppResult<JsonValue> {
        let mut expanding = Vec::new();
        self.visit(schema, &mut expanding)
    }

    /// `expanding` holds the component names currently being expanded, outermost first.
    fn visit(&self, schema: &Schema, expanding: &mut Vec<String>) -> AppResult<JsonValue> {
        match (&schema.kind, &schema.example) {
            (SchemaKind::Reference(target), _) => self.follow(target, expanding),
            (_, Some(example)) => Ok(example.clone()),
            (kind, None) => self.placeholder(kind, expanding),
        }
    }

    fn placeholder(&self, kind: &SchemaKind, expanding: &mut Vec<String>) -> AppResult<JsonValue> {
        let value = match kind {
            SchemaKind::Reference(target) => return self.follow(target, expanding),
            SchemaKind::Object(properties) => {
                let mut object = Map::with_capacity(properties.len());
                for (name, property) in properties {
                    object.insert(name.clone(), self.visit(property, expanding)?);
                }
                JsonValue::Object(object)
            }
            SchemaKind::Array(items) => {
                let element = match items {
                    Some(items) => self.visit(items, expanding)?,
                    None => JsonValue::Null,
                };
                JsonValue::Array(vec![element])
            }
            SchemaKind::String {
                format,
                enumeration,
            } => match format.as_deref() {
                Some("date-time") => JsonValue::String(iso_timestamp(self.now)),
                Some("date") => JsonValue::String(self.now.format("%Y-%m-%d").to_string()),
                Some("email") => JsonValue::String(EXAMPLE_EMAIL.to_string()),
                _ => enumeration
                    .first()
                    .cloned()
                    .unwrap_or_else(|| JsonValue::String(EXAMPLE_STRING.to_string())),
            },
            SchemaKind::Integer => json!(1),
            SchemaKind::Number => json!(1.0),
            SchemaKind::Boolean => JsonValue::Bool(true),
            SchemaKind::Untyped => JsonValue::Null,
        };

        Ok(value)
    }

    fn follow(&self, target: &str, expanding: &mut Vec<String>) -> AppResult<JsonValue> {
        let name = extract_component_name(target, "schemas").ok_or_else(|| {
            AppError::SchemaResolution(format!("unsupported reference `{}`", target))
        })?;

        if expanding.contains(&name) {
            let mut chain = expanding.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(&name);
            return Err(AppError::SchemaResolution(format!(
                "circular reference `{}` ({})",
                target, chain
            )));
        }

        let resolved = self.components.schemas.get(&name).ok_or_else(|| {
            AppError::SchemaResolution(format!("unknown schema `{}` in `{}`", name, target))
        })?;

        expanding.push(name);
        let value = self.visit(resolved, expanding);
        expanding.pop();
        value
    }
}

/// One-shot helper: synthesizes `schema` against `components` at the current time.
pub fn synthesize(schema: &Schema, components: &Components) -> AppResult<JsonValue> {
    Synthesizer::new(components).synthesize(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn schema(value: JsonValue) -> Schema {
        Schema::from_value(&value)
    }

    fn components(value: JsonValue) -> Components {
        serde_json::from_value(json!({ "schemas": value })).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_example_wins_for_every_type() {
        let registry = Components::default();
        let synth = Synthesizer::new(&registry);
        for (ty, example) in [
            ("object", json!({"k": "v"})),
            ("array", json!([1, 2, 3])),
            ("string", json!("Fluffy")),
            ("integer", json!(42)),
            ("number", json!(2.5)),
            ("boolean", json!(false)),
            ("mystery", json!("anything")),
        ] {
            let node = schema(json!({"type": ty, "example": example.clone()}));
            assert_eq!(synth.synthesize(&node).unwrap(), example, "type {}", ty);
        }
    }

    #[test]
    fn test_string_example_beats_format_and_enum() {
        let node = schema(json!({
            "type": "string",
            "format": "email",
            "enum": ["a", "b"],
            "example": "me@pets.io"
        }));
        assert_eq!(
            synthesize(&node, &Components::default()).unwrap(),
            json!("me@pets.io")
        );
    }

    #[test]
    fn test_string_formats() {
        let registry = Components::default();
        let synth = Synthesizer::new(&registry).at(fixed_now());

        let date_time = schema(json!({"type": "string", "format": "date-time"}));
        assert_eq!(
            synth.synthesize(&date_time).unwrap(),
            json!("2024-03-09T14:05:07.000Z")
        );

        let date = schema(json!({"type": "string", "format": "date"}));
        assert_eq!(synth.synthesize(&date).unwrap(), json!("2024-03-09"));

        let email = schema(json!({"type": "string", "format": "email"}));
        assert_eq!(synth.synthesize(&email).unwrap(), json!(EXAMPLE_EMAIL));

        let uuid = schema(json!({"type": "string", "format": "uuid"}));
        assert_eq!(synth.synthesize(&uuid).unwrap(), json!("string"));
    }

    #[test]
    fn test_string_enum_first_member() {
        let node = schema(json!({"type": "string", "enum": ["available", "sold"]}));
        assert_eq!(
            synthesize(&node, &Components::default()).unwrap(),
            json!("available")
        );
    }

    #[test]
    fn test_numbers_keep_integer_float_distinction() {
        let registry = Components::default();
        let synth = Synthesizer::new(&registry);

        let int = synth.synthesize(&schema(json!({"type": "integer"}))).unwrap();
        assert_eq!(serde_json::to_string(&int).unwrap(), "1");

        let float = synth.synthesize(&schema(json!({"type": "number"}))).unwrap();
        assert_eq!(serde_json::to_string(&float).unwrap(), "1.0");
    }

    #[test]
    fn test_boolean_and_untyped_defaults() {
        let registry = Components::default();
        let synth = Synthesizer::new(&registry);
        assert_eq!(
            synth.synthesize(&schema(json!({"type": "boolean"}))).unwrap(),
            json!(true)
        );
        assert_eq!(
            synth.synthesize(&schema(json!({"description": "free"}))).unwrap(),
            JsonValue::Null
        );
    }

    #[test]
    fn test_object_keeps_declared_keys_in_order() {
        let node = schema(json!({
            "type": "object",
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "integer"},
                "broken": null,
                "mid": {"type": "boolean"}
            }
        }));
        let value = synthesize(&node, &Components::default()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_array_has_single_element() {
        let node = schema(json!({
            "type": "array",
            "items": {"type": "object", "properties": {"id": {"type": "integer"}}}
        }));
        assert_eq!(
            synthesize(&node, &Components::default()).unwrap(),
            json!([{"id": 1}])
        );

        let no_items = schema(json!({"type": "array"}));
        assert_eq!(
            synthesize(&no_items, &Components::default()).unwrap(),
            json!([null])
        );
    }

    #[test]
    fn test_reference_resolution() {
        let registry = components(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "format": "int64"},
                    "name": {"type": "string"},
                    "tag": {"$ref": "#/components/schemas/Tag"}
                }
            },
            "Tag": {"type": "string", "enum": ["cat", "dog"]}
        }));
        let node = schema(json!({"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}));
        assert_eq!(
            synthesize(&node, &registry).unwrap(),
            json!([{"id": 1, "name": "string", "tag": "cat"}])
        );
    }

    #[test]
    fn test_same_component_twice_is_not_a_cycle() {
        let registry = components(json!({
            "Money": {"type": "object", "properties": {"amount": {"type": "number"}}}
        }));
        let node = schema(json!({
            "type": "object",
            "properties": {
                "price": {"$ref": "#/components/schemas/Money"},
                "tax": {"$ref": "#/components/schemas/Money"}
            }
        }));
        assert_eq!(
            synthesize(&node, &registry).unwrap(),
            json!({"price": {"amount": 1.0}, "tax": {"amount": 1.0}})
        );
    }

    #[test]
    fn test_unknown_reference_fails() {
        let node = schema(json!({"$ref": "#/components/schemas/Missing"}));
        let err = synthesize(&node, &Components::default()).unwrap_err();
        assert!(matches!(err, AppError::SchemaResolution(ref m) if m.contains("Missing")));
    }

    #[test]
    fn test_external_reference_fails() {
        let node = schema(json!({"$ref": "common.yaml#/components/schemas/Pet"}));
        let err = synthesize(&node, &Components::default()).unwrap_err();
        assert!(matches!(err, AppError::SchemaResolution(_)));
    }

    #[test]
    fn test_circular_reference_fails() {
        let registry = components(json!({
            "Node": {
                "type": "object",
                "properties": {
                    "value": {"type": "string"},
                    "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
                }
            }
        }));
        let node = schema(json!({"$ref": "#/components/schemas/Node"}));
        let err = synthesize(&node, &registry).unwrap_err();
        match err {
            AppError::SchemaResolution(message) => {
                assert!(message.contains("Node -> Node"), "{}", message)
            }
            other => panic!("expected SchemaResolution, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_broken_by_example_is_fine() {
        let registry = components(json!({
            "Node": {
                "type": "object",
                "properties": {
                    "next": {"$ref": "#/components/schemas/Link"}
                }
            },
            "Link": {"type": "object", "example": {"next": null}, "properties": {
                "next": {"$ref": "#/components/schemas/Node"}
            }}
        }));
        let node = schema(json!({"$ref": "#/components/schemas/Node"}));
        assert_eq!(
            synthesize(&node, &registry).unwrap(),
            json!({"next": {"next": null}})
        );
    }
}
