//! Field-name normalization and typed field accessors.
//!
//! Webflow form fields arrive under arbitrary casings, separators and
//! languages ("Full Name", "full_name", "full-name", "الاسم-الكامل"). Every
//! lookup goes through a single deterministic key normalization so the same
//! logical field always collides to the same map key. No I/O here.

use serde_json::Value;

/// Flat mapping of normalized keys to raw field values.
pub type FieldMap = serde_json::Map<String, Value>;

/// Canonical form of a field name: trimmed, lower-cased, runs of whitespace
/// or underscores collapsed into a single hyphen. Idempotent.
pub fn normalize_key(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() || ch == '_' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !normalized.is_empty() {
            normalized.push('-');
        }
        pending_separator = false;
        normalized.extend(ch.to_lowercase());
    }

    normalized
}

/// First alias (in order) present in the map with a defined value.
///
/// Presence means the key exists and the value is not null; falsy-but-present
/// values like `false` or `""` are still returned.
pub fn lookup<'a>(map: &'a FieldMap, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(value) = map.get(&normalize_key(alias)) {
            if !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

/// String view of the first matching alias: strings are trimmed, arrays are
/// joined with `", "`, other scalars are coerced. Empty results become None.
pub fn as_string(map: &FieldMap, aliases: &[&str]) -> Option<String> {
    let rendered = match lookup(map, aliases)? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_to_string(other),
    };

    if rendered.is_empty() {
        return None;
    }
    Some(rendered)
}

/// Array view of the first matching alias: arrays pass through, strings with
/// commas are split and trimmed, other non-empty strings become a single
/// element, anything else yields an empty vec.
pub fn as_array(map: &FieldMap, aliases: &[&str]) -> Vec<String> {
    match lookup(map, aliases) {
        Some(Value::Array(items)) => items.iter().map(scalar_to_string).collect(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                vec![]
            } else if trimmed.contains(',') {
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect()
            } else {
                vec![trimmed.to_string()]
            }
        }
        _ => vec![],
    }
}

/// Boolean view of the first matching alias. Ambiguous values must not
/// default to false, so anything outside the known yes/no sets is None.
pub fn as_boolean(map: &FieldMap, aliases: &[&str]) -> Option<bool> {
    match lookup(map, aliases)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "oui" | "true" | "1" | "نعم" | "صح" => Some(true),
            "no" | "non" | "false" | "0" | "لا" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_map(value: Value) -> FieldMap {
        let raw = value.as_object().expect("object literal").clone();
        // keys enter the map already normalized, as the extractor does
        raw.into_iter()
            .map(|(k, v)| (normalize_key(&k), v))
            .collect()
    }

    #[test]
    fn test_normalize_key_collapses_separators() {
        assert_eq!(normalize_key("Full Name"), "full-name");
        assert_eq!(normalize_key("full_name"), "full-name");
        assert_eq!(normalize_key("full-name"), "full-name");
        assert_eq!(normalize_key("  Full   Name  "), "full-name");
        assert_eq!(normalize_key("FULL__NAME"), "full-name");
    }

    #[test]
    fn test_normalize_key_is_idempotent() {
        for raw in ["Full Name", "products_category", "اللغة", "A_B C-d"] {
            let once = normalize_key(raw);
            assert_eq!(normalize_key(&once), once);
        }
    }

    #[test]
    fn test_lookup_respects_alias_order_and_null() {
        let map = field_map(json!({
            "phone": null,
            "whatsapp": "0612345678",
        }));
        let value = lookup(&map, &["phone_number", "phone", "whatsapp"]);
        assert_eq!(value, Some(&json!("0612345678")));
    }

    #[test]
    fn test_lookup_keeps_falsy_present_values() {
        let map = field_map(json!({"valid-product": false}));
        assert_eq!(
            lookup(&map, &["valid_product", "valid-product"]),
            Some(&json!(false))
        );
    }

    #[test]
    fn test_as_string_joins_arrays() {
        let map = field_map(json!({"categories": ["electronics", "home"]}));
        assert_eq!(
            as_string(&map, &["categories"]),
            Some("electronics, home".to_string())
        );
    }

    #[test]
    fn test_as_array_splits_on_commas() {
        let map = field_map(json!({
            "multi": "a, b, c",
            "single": "single",
            "empty": "",
        }));
        assert_eq!(as_array(&map, &["multi"]), vec!["a", "b", "c"]);
        assert_eq!(as_array(&map, &["single"]), vec!["single"]);
        assert!(as_array(&map, &["empty"]).is_empty());
        assert!(as_array(&map, &["absent"]).is_empty());
    }

    #[test]
    fn test_as_boolean_arabic_and_ambiguous() {
        let map = field_map(json!({
            "a": "نعم",
            "b": "لا",
            "c": "maybe",
            "d": true,
            "e": "Oui",
        }));
        assert_eq!(as_boolean(&map, &["a"]), Some(true));
        assert_eq!(as_boolean(&map, &["b"]), Some(false));
        assert_eq!(as_boolean(&map, &["c"]), None);
        assert_eq!(as_boolean(&map, &["d"]), Some(true));
        assert_eq!(as_boolean(&map, &["e"]), Some(true));
    }
}
