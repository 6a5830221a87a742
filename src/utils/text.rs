//! Text and JSON value helpers shared by the rule modules

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::marc::DataField;

/// NFC-normalize and trim the ends; empty becomes `None`.
///
/// Internal whitespace, line breaks included, is kept as is.
pub fn clean_value(value: &str) -> Option<String> {
    let normalized: String = value.nfc().collect();
    let cleaned = normalized.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// First non-empty value of a subfield code, cleaned
pub fn first(field: &DataField, code: char) -> Option<String> {
    field
        .subfields
        .iter()
        .filter(|sf| sf.code == code)
        .find_map(|sf| clean_value(&sf.value))
}

/// Every non-empty value of a subfield code, cleaned, in order
pub fn all(field: &DataField, code: char) -> Vec<String> {
    field
        .get_all_subfields(code)
        .into_iter()
        .filter_map(clean_value)
        .collect()
}

/// View a JSON value as a list: arrays yield their items, `null` nothing,
/// anything else itself
pub fn force_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// String at `key` of a JSON object
pub fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Strings of an array at `key` of a JSON object
pub fn get_strs<'a>(value: &'a Value, key: &str) -> Vec<&'a str> {
    value
        .get(key)
        .map(force_list)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}

/// Remove duplicate items, keeping the first occurrence
pub fn dedupe_list(items: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Drop `null`, empty strings, empty arrays and empty objects, recursively
pub fn strip_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(strip_empty).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let map: serde_json::Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| strip_empty(v).map(|v| (k, v)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("  Track reconstruction \n").as_deref(), Some("Track reconstruction"));
        assert_eq!(
            clean_value("First paragraph.\n\nSecond   paragraph.").as_deref(),
            Some("First paragraph.\n\nSecond   paragraph.")
        );
        assert_eq!(clean_value("e\u{301}"), Some("\u{e9}".to_string()));
        assert_eq!(clean_value("   "), None);
    }

    #[test]
    fn test_first_and_all_skip_empty() {
        let field = DataField::blank("100")
            .subfield('u', " ")
            .subfield('u', "CERN")
            .subfield('u', "DESY");
        assert_eq!(first(&field, 'u').as_deref(), Some("CERN"));
        assert_eq!(all(&field, 'u'), vec!["CERN", "DESY"]);
        assert_eq!(first(&field, 'a'), None);
    }

    #[test]
    fn test_force_list() {
        assert_eq!(force_list(&json!([1, 2])).len(), 2);
        assert_eq!(force_list(&json!("x")), vec![&json!("x")]);
        assert!(force_list(&Value::Null).is_empty());
    }

    #[test]
    fn test_dedupe_list_keeps_order() {
        let items = vec![json!({"a": 1}), json!("b"), json!({"a": 1}), json!("c")];
        assert_eq!(dedupe_list(items), vec![json!({"a": 1}), json!("b"), json!("c")]);
    }

    #[test]
    fn test_strip_empty() {
        let value = json!({"a": "", "b": [], "c": {"d": null}, "e": [{"f": ""}, "g"], "h": false});
        assert_eq!(strip_empty(value), Some(json!({"e": ["g"], "h": false})));
    }
}
