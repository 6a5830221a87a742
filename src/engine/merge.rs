//! Merging of handler contributions into the accumulating document

use serde_json::Value;

use crate::models::Document;
use crate::rules::{Cardinality, Contribution, Entry};

/// Merge a contribution; `Value` contributions go to the rule's own key
pub fn apply_contribution(
    doc: &mut Document,
    key: &'static str,
    cardinality: Cardinality,
    contribution: Contribution,
) {
    match contribution {
        Contribution::Nothing => {}
        Contribution::Value(value) => apply_entry(doc, Entry::new(key, cardinality, value)),
        Contribution::Entries(entries) => {
            for entry in entries {
                apply_entry(doc, entry);
            }
        }
    }
}

pub fn apply_entry(doc: &mut Document, entry: Entry) {
    let Entry {
        key,
        cardinality,
        value,
    } = entry;
    if value.is_null() {
        return;
    }

    let current = doc.get_mut(key).filter(|v| !v.is_null());
    match (cardinality, current) {
        (Cardinality::Scalar, Some(_)) => {}
        (Cardinality::Scalar | Cardinality::ScalarReplace, _) => {
            doc.insert(key.to_string(), value);
        }
        (Cardinality::List | Cardinality::ListExtend, Some(Value::Array(items))) => {
            push_items(items, cardinality, value);
        }
        (Cardinality::List | Cardinality::ListExtend, existing) => {
            let mut items = match existing {
                Some(other) => vec![other.take()],
                None => Vec::new(),
            };
            push_items(&mut items, cardinality, value);
            doc.insert(key.to_string(), Value::Array(items));
        }
        (Cardinality::Mapping | Cardinality::MappingReplace, Some(existing)) => {
            deep_merge(existing, value, cardinality == Cardinality::MappingReplace);
        }
        (Cardinality::Mapping | Cardinality::MappingReplace, None) => {
            doc.insert(key.to_string(), value);
        }
        (Cardinality::Joined(separator), Some(Value::String(text))) => {
            if let Some(more) = value.as_str() {
                text.push_str(separator);
                text.push_str(more);
            }
        }
        (Cardinality::Joined(_), _) => {
            doc.insert(key.to_string(), value);
        }
    }
}

fn push_items(items: &mut Vec<Value>, cardinality: Cardinality, value: Value) {
    match (cardinality, value) {
        (Cardinality::ListExtend, Value::Array(more)) => items.extend(more),
        (_, value) => items.push(value),
    }
}

/// Recursively merge `incoming` into `target`.
///
/// Objects merge key by key and arrays concatenate. Conflicting scalars
/// keep the existing value unless `replace` is set.
pub fn deep_merge(target: &mut Value, incoming: Value, replace: bool) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) if !slot.is_null() => deep_merge(slot, value, replace),
                    _ => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(incoming)) => existing.extend(incoming),
        (target, incoming) => {
            if replace {
                *target = incoming;
            }
        }
    }
}
