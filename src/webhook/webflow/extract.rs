//! Webhook envelope resolution.
//!
//! Webflow (and the automation tools forwarding it) deliver form submissions
//! in several envelope shapes: a flat object, `{data: {...}}`, the doubly
//! nested `{data: {payload: {data: {...}}}}`, or an array of `{name, value}`
//! pairs. This module locates the actual field mapping, strips provider
//! metadata and empty values, and keeps a `site` hint used later to infer a
//! default form language.

use super::normalize::{FieldMap, normalize_key};
use crate::consts;
use derive_more::{Display, Error};
use serde_json::Value;

/// Clean form fields plus the originating site, when the envelope names one.
#[derive(Debug, Default)]
pub struct ExtractedFields {
    pub fields: FieldMap,
    pub site: Option<String>,
}

#[derive(Debug, Display, Error)]
pub enum ExtractionError {
    /// The payload held nothing but metadata, empty values, or an
    /// unrecognized structure. Carries a bounded preview for diagnostics.
    #[display("no form fields found in payload")]
    NoFormFields {
        #[error(not(source))]
        preview: String,
    },
}

/// Locates the form-field mapping inside `raw` and returns it with
/// normalized keys, metadata stripped and empty values dropped.
pub fn extract(raw: &Value) -> Result<ExtractedFields, ExtractionError> {
    let fields = match raw.as_array() {
        Some(pairs) => fields_from_pairs(pairs),
        None => select_field_source(raw).map(clean_fields).unwrap_or_default(),
    };

    if fields.is_empty() {
        return Err(ExtractionError::NoFormFields {
            preview: payload_preview(raw),
        });
    }

    Ok(ExtractedFields {
        fields,
        site: site_hint(raw),
    })
}

/// Envelope resolution order; first match wins. Each rule checks the actual
/// shape of the payload rather than assuming one.
fn select_field_source(raw: &Value) -> Option<&serde_json::Map<String, Value>> {
    // triggerType at the top level marks the v2 envelope
    if raw.get("triggerType").is_some() {
        if let Some(mapping) = raw.pointer("/payload/data").and_then(Value::as_object) {
            return Some(mapping);
        }
    }

    if let Some(payload) = raw.pointer("/data/payload").and_then(Value::as_object) {
        if let Some(inner) = payload.get("data").and_then(Value::as_object) {
            return Some(inner);
        }
        return Some(payload);
    }

    if let Some(data) = raw.get("data").and_then(Value::as_object) {
        // data may itself be an envelope rather than field data
        let is_envelope = data.contains_key("triggerType") || data.contains_key("payload");
        if !is_envelope {
            return Some(data);
        }
        if let Some(payload) = data.get("payload").and_then(Value::as_object) {
            if let Some(inner) = payload.get("data").and_then(Value::as_object) {
                return Some(inner);
            }
            return Some(payload);
        }
    }

    raw.as_object()
}

fn fields_from_pairs(pairs: &[Value]) -> FieldMap {
    let mut fields = FieldMap::new();

    for pair in pairs {
        let name = pair
            .get("name")
            .or_else(|| pair.get("field"))
            .and_then(Value::as_str);

        if let (Some(name), Some(value)) = (name, pair.get("value")) {
            insert_clean(&mut fields, name, value);
        }
    }

    fields
}

fn clean_fields(source: &serde_json::Map<String, Value>) -> FieldMap {
    let mut fields = FieldMap::new();
    for (key, value) in source {
        insert_clean(&mut fields, key, value);
    }
    fields
}

fn insert_clean(fields: &mut FieldMap, key: &str, value: &Value) {
    let normalized = normalize_key(key);

    if consts::WEBFLOW_METADATA_KEYS.contains(&normalized.as_str()) {
        return;
    }
    if value.is_null() {
        return;
    }
    if let Some(s) = value.as_str() {
        if s.trim().is_empty() {
            return;
        }
    }

    fields.insert(normalized, value.clone());
}

/// `site` from the top level or any envelope layer that carries it.
fn site_hint(raw: &Value) -> Option<String> {
    ["/site", "/data/site", "/payload/site", "/data/payload/site"]
        .iter()
        .find_map(|path| raw.pointer(path))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Bounded, char-boundary-safe preview of the original payload.
fn payload_preview(raw: &Value) -> String {
    let rendered = raw.to_string();
    if rendered.chars().count() <= consts::PAYLOAD_PREVIEW_MAX_CHARS {
        return rendered;
    }
    rendered
        .chars()
        .take(consts::PAYLOAD_PREVIEW_MAX_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_payload_is_the_field_map() {
        let raw = json!({"full_name": "Amina", "email": "a@x.com"});
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("full-name"), Some(&json!("Amina")));
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_data_envelope() {
        let raw = json!({"site": "shop.example.ma", "data": {"email": "a@x.com"}});
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
        assert_eq!(extracted.site.as_deref(), Some("shop.example.ma"));
    }

    #[test]
    fn test_doubly_nested_envelope() {
        let raw = json!({"data": {"payload": {"data": {"email": "a@x.com"}}}});
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_data_payload_without_inner_data() {
        let raw = json!({"data": {"payload": {
            "full_name": "Amina",
            "email": "a@x.com"
        }}});
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("full-name"), Some(&json!("Amina")));
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_nested_envelope_under_data() {
        let raw = json!({"data": {
            "triggerType": "form_submission",
            "payload": {"data": {
                "full_name": "Amina",
                "email": "a@x.com"
            }}
        }});
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("full-name"), Some(&json!("Amina")));
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_trigger_type_envelope() {
        let raw = json!({
            "triggerType": "form_submission",
            "payload": {"data": {"email": "a@x.com"}}
        });
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_array_of_pairs() {
        let raw = json!([
            {"name": "Full Name", "value": "Amina"},
            {"field": "email", "value": "a@x.com"},
            {"name": "formId", "value": "f-123"}
        ]);
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.get("full-name"), Some(&json!("Amina")));
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
        assert!(!extracted.fields.contains_key("formid"));
    }

    #[test]
    fn test_metadata_and_empty_values_are_stripped() {
        let raw = json!({
            "name": "Contact Form",
            "site": "shop.example.com",
            "submittedAt": "2024-01-01T00:00:00Z",
            "formId": "abc",
            "data": {
                "email": "a@x.com",
                "city": "   ",
                "phone": null,
                "pageUrl": "https://shop.example.com/apply"
            }
        });
        let extracted = extract(&raw).unwrap();
        assert_eq!(extracted.fields.len(), 1);
        assert_eq!(extracted.fields.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_all_metadata_payload_is_a_structured_failure() {
        let raw = json!({
            "name": "Contact Form",
            "site": "shop.example.com",
            "submittedAt": "2024-01-01T00:00:00Z"
        });
        match extract(&raw) {
            Err(ExtractionError::NoFormFields { preview }) => {
                assert!(preview.contains("Contact Form"));
            }
            other => panic!("expected NoFormFields, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_is_bounded() {
        let big = "x".repeat(10 * crate::consts::PAYLOAD_PREVIEW_MAX_CHARS);
        let raw = json!({ "name": big });
        match extract(&raw) {
            Err(ExtractionError::NoFormFields { preview }) => {
                assert!(preview.chars().count() <= crate::consts::PAYLOAD_PREVIEW_MAX_CHARS);
            }
            other => panic!("expected NoFormFields, got {:?}", other),
        }
    }
}
