//! Shared JSON Schema utilities for model providers.

use serde_json::{Map, Value};

/// Supported string formats for strict JSON Schema validation.
const SUPPORTED_FORMATS: &[&str] = &[
    "date-time",
    "time",
    "date",
    "duration",
    "email",
    "hostname",
    "uri",
    "ipv4",
    "ipv6",
    "uuid",
];

/// Keywords strict mode rejects outright.
const UNSUPPORTED_PROPS: &[&str] = &[
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minLength",
    "maxLength",
    "maxItems",
    "uniqueItems",
    "minProperties",
    "maxProperties",
    "$schema",
    "title",
];

/// Normalizes a JSON schema for strict mode APIs.
///
/// This function:
/// - Sets `additionalProperties: false` on all object types.
/// - Removes unsupported keywords like `minimum`, `maxLength`, `title`, etc.
/// - Filters string formats to only supported values.
/// - Removes `minItems` values greater than 1.
/// - Removes external `$ref` URLs (only internal refs are supported).
/// - Removes `$ref` entries from `allOf` arrays.
///
/// Schemas generated by `schemars` for integer types carry `minimum`/`format`
/// constraints, so every output type passes through here before it is sent.
#[must_use]
pub fn normalize_schema_for_strict_mode(mut schema: Value) -> Value {
    match &mut schema {
        Value::Array(items) => {
            for item in items.iter_mut() {
                *item = normalize_schema_for_strict_mode(item.take());
            }
        }
        Value::Object(obj) => normalize_object(obj),
        _ => {}
    }
    schema
}

fn normalize_object(obj: &mut Map<String, Value>) {
    for prop in UNSUPPORTED_PROPS {
        if obj.remove(*prop).is_some() {
            tracing::warn!(
                property = *prop,
                "Removed unsupported JSON schema property for strict mode"
            );
        }
    }

    retain_supported_format(obj);
    retain_supported_min_items(obj);

    let is_object = obj.get("type").and_then(Value::as_str) == Some("object")
        || obj.contains_key("properties");
    if is_object {
        obj.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    for key in ["properties", "$defs", "definitions"] {
        if let Some(Value::Object(children)) = obj.get_mut(key) {
            for value in children.values_mut() {
                *value = normalize_schema_for_strict_mode(value.take());
            }
        }
    }

    if let Some(items) = obj.get_mut("items") {
        *items = normalize_schema_for_strict_mode(items.take());
    }

    for key in ["allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(variants)) = obj.get_mut(key) {
            for variant in variants.iter_mut() {
                *variant = normalize_schema_for_strict_mode(variant.take());
            }
        }
    }

    let external_ref = obj
        .get("$ref")
        .and_then(Value::as_str)
        .filter(|r| r.starts_with("http://") || r.starts_with("https://"))
        .map(str::to_string);
    if let Some(ref_url) = external_ref {
        tracing::warn!(
            ref_url = %ref_url,
            "Removed external $ref URL (only internal refs supported in strict mode)"
        );
        obj.remove("$ref");
    }

    strip_refs_from_all_of(obj);
}

fn retain_supported_format(obj: &mut Map<String, Value>) {
    let Some(format) = obj.get("format") else {
        return;
    };
    match format.as_str() {
        Some(format) if SUPPORTED_FORMATS.contains(&format) => {}
        Some(format) => {
            tracing::warn!(format = %format, "Removed unsupported string format for strict mode");
            obj.remove("format");
        }
        None => {
            tracing::warn!("Removed invalid (non-string) format value from JSON schema");
            obj.remove("format");
        }
    }
}

fn retain_supported_min_items(obj: &mut Map<String, Value>) {
    let Some(min_items) = obj.get("minItems") else {
        return;
    };
    match min_items.as_u64() {
        Some(n) if n <= 1 => {}
        Some(n) => {
            tracing::warn!(
                min_items = n,
                "Removed minItems > 1 constraint (unsupported in strict mode)"
            );
            obj.remove("minItems");
        }
        None => {
            tracing::warn!("Removed invalid (non-integer) minItems value from JSON schema");
            obj.remove("minItems");
        }
    }
}

fn strip_refs_from_all_of(obj: &mut Map<String, Value>) {
    let Some(Value::Array(all_of)) = obj.get_mut("allOf") else {
        return;
    };
    let original_len = all_of.len();
    all_of.retain(|item| !item.as_object().is_some_and(|o| o.contains_key("$ref")));

    if all_of.len() != original_len {
        tracing::warn!("Removed $ref entries from allOf array (unsupported in strict mode)");
    }
    if all_of.is_empty() && original_len > 0 {
        obj.remove("allOf");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_constraints_are_removed() {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "uint32",
            "type": "integer",
            "format": "uint32",
            "minimum": 0
        });

        let normalized = normalize_schema_for_strict_mode(schema);
        assert_eq!(normalized, json!({"type": "integer"}));
    }

    #[test]
    fn nested_objects_are_closed() {
        let schema = json!({
            "type": "object",
            "properties": {
                "value": {
                    "type": "object",
                    "properties": {"capital": {"type": "string", "format": "date"}}
                },
                "items": {"type": "array", "items": {"type": "object", "properties": {}}, "minItems": 3}
            },
            "$defs": {"City": {"properties": {"name": {"type": "string"}}}}
        });

        let normalized = normalize_schema_for_strict_mode(schema);
        assert_eq!(normalized["additionalProperties"], false);
        assert_eq!(normalized["properties"]["value"]["additionalProperties"], false);
        assert_eq!(
            normalized["properties"]["value"]["properties"]["capital"]["format"],
            "date"
        );
        assert_eq!(
            normalized["properties"]["items"]["items"]["additionalProperties"],
            false
        );
        assert!(normalized["properties"]["items"].get("minItems").is_none());
        assert_eq!(normalized["$defs"]["City"]["additionalProperties"], false);
    }

    #[test]
    fn refs_are_filtered() {
        let schema = json!({
            "anyOf": [{"$ref": "https://example.com/schema"}, {"type": "null"}],
            "allOf": [{"$ref": "#/$defs/Thing"}]
        });

        let normalized = normalize_schema_for_strict_mode(schema);
        assert!(normalized["anyOf"][0].get("$ref").is_none());
        assert!(normalized.get("allOf").is_none());
    }
}
