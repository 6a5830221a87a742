//! Handlers shared by several record types

use serde_json::{json, Map, Value};

use crate::error::{FieldConversionError, FieldResult};
use crate::marc::DataField;
use crate::env::TranslationEnv;
use crate::models::{Document, RecordType};
use crate::utils::dates::coerce_date;
use crate::utils::refs::{absolute_url, get_recid_from_ref};
use crate::utils::text::{all, first, force_list, get_str, strip_empty};

use super::{conversion_error, Context, Contribution, Entry};

/// Keyword marking classifier output in legacy records
pub const AUTOMATIC_KEYWORDS: &str = "* Automatic Keywords *";

/// Build a JSON object from optional members, skipping the absent ones
pub fn object<I>(members: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Option<Value>)>,
{
    let map: Map<String, Value> = members
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_null()).map(|v| (key.to_string(), v)))
        .collect();
    Value::Object(map)
}

/// Object built from optional members, `None` when every member is absent
pub fn object_opt<I>(members: I) -> Option<Value>
where
    I: IntoIterator<Item = (&'static str, Option<Value>)>,
{
    match object(members) {
        Value::Object(map) if map.is_empty() => None,
        value => Some(value),
    }
}

pub fn text(value: Option<String>) -> Option<Value> {
    value.map(Value::String)
}

/// Values of a JSON key as strings, whether it holds a string or a list
pub fn strings(value: &Value) -> Vec<&str> {
    force_list(value).into_iter().filter_map(Value::as_str).collect()
}

// ---------------------------------------------------------------------------
// Control fields
// ---------------------------------------------------------------------------

/// 001 -> `control_number`
pub fn control_number(value: &str, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let recid = value
        .trim()
        .parse::<u64>()
        .map_err(|_| FieldConversionError::new("001", format!("not a record id: {:?}", value)))?;
    Ok(json!(recid).into())
}

pub fn control_number_inverse(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        Value::String(s) => s.trim().parse::<u64>().ok().map(|n| n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Identifiers and notes
// ---------------------------------------------------------------------------

/// 035 -> `external_system_identifiers`
pub fn external_system_identifier(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([
        ("schema", text(first(field, '9'))),
        ("value", Some(json!(value))),
    ])
    .into())
}

pub fn external_system_identifiers_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|id| {
            let value = get_str(id, "value")?;
            Some(
                DataField::blank("035")
                    .subfield_opt('9', get_str(id, "schema"))
                    .subfield('a', value),
            )
        })
        .collect())
}

/// 500 -> `public_notes`
pub fn public_note(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(note(field).into())
}

/// 595 -> `_private_notes`
pub fn private_note(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(note(field).into())
}

fn note(field: &DataField) -> Option<Value> {
    let value = first(field, 'a')?;
    Some(object([
        ("source", text(first(field, '9'))),
        ("value", Some(json!(value))),
    ]))
}

pub fn public_notes_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(notes_inverse("500", value))
}

pub fn private_notes_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(notes_inverse("595", value))
}

fn notes_inverse(tag: &'static str, value: &Value) -> Vec<DataField> {
    force_list(value)
        .into_iter()
        .filter_map(|note| {
            let text = get_str(note, "value")?;
            Some(
                DataField::blank(tag)
                    .subfield('a', text)
                    .subfield_opt('9', get_str(note, "source")),
            )
        })
        .collect()
}

/// 856 -> `urls`; relative links point at the legacy site
pub fn url(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'u') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([
        ("description", text(first(field, 'y'))),
        ("value", Some(json!(absolute_url(&ctx.env.legacy_base_url, &value)))),
    ])
    .into())
}

pub fn urls_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|url| {
            let value = get_str(url, "value")?;
            Some(
                DataField::with_indicators("856", '4', ' ')
                    .subfield('u', value)
                    .subfield_opt('y', get_str(url, "description")),
            )
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Record references
// ---------------------------------------------------------------------------

/// 970/d -> `new_record`, a reference to a record of the same type
pub fn new_record(field: &DataField, ctx: &Context<'_>, target: RecordType) -> Contribution {
    ctx.record_ref(&field.tag, target, first(field, 'd').as_deref())
        .into()
}

pub fn new_record_inverse(value: &Value) -> Vec<DataField> {
    get_recid_from_ref(value)
        .map(|recid| vec![DataField::blank("970").subfield('d', recid.to_string())])
        .unwrap_or_default()
}

/// 510/530 -> `related_records`.
///
/// `w` holds the relation code: `a` predecessor, `b` successor and `r` a
/// free-text relation carried in `a`.
pub fn related_record(field: &DataField, ctx: &Context<'_>, target: RecordType) -> FieldResult<Contribution> {
    let record = ctx.record_ref(&field.tag, target, first(field, '0').as_deref());
    let curated = record.as_ref().map(|_| json!(true));

    let related = match first(field, 'w').as_deref() {
        Some("a") => object([
            ("curated_relation", curated),
            ("record", record),
            ("relation", Some(json!("predecessor"))),
        ]),
        Some("b") => object([
            ("curated_relation", curated),
            ("record", record),
            ("relation", Some(json!("successor"))),
        ]),
        Some("r") => {
            let Some(freetext) = first(field, 'a') else {
                return Err(conversion_error(field, "free-text relation without a name"));
            };
            object([
                ("curated_relation", curated),
                ("record", record),
                ("relation_freetext", Some(json!(freetext))),
            ])
        }
        Some(other) => {
            return Err(conversion_error(field, format!("unknown relation code {:?}", other)));
        }
        None => return Ok(Contribution::Nothing),
    };
    Ok(related.into())
}

pub fn related_records_inverse(tag: &'static str, value: &Value) -> Vec<DataField> {
    force_list(value)
        .into_iter()
        .filter_map(|related| {
            let recid = related.get("record").and_then(get_recid_from_ref);
            let (code, name) = match (get_str(related, "relation"), get_str(related, "relation_freetext")) {
                (Some("predecessor"), _) => ("a", None),
                (Some("successor"), _) => ("b", None),
                (_, Some(freetext)) => ("r", Some(freetext)),
                _ => return None,
            };
            Some(
                DataField::blank(tag)
                    .subfield_opt('a', name)
                    .subfield('w', code)
                    .subfield_opt('0', recid.map(|id| id.to_string())),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// 6531 keyword.
///
/// Entries without a value, or tagged as coming from a conference, yield
/// nothing.
pub fn free_keyword(field: &DataField) -> Option<Value> {
    let sources = all(field, '9');
    if sources.iter().any(|s| s.eq_ignore_ascii_case("conference")) {
        return None;
    }
    let value = first(field, 'a')?;
    Some(object([
        ("schema", text(first(field, '2').map(|s| keyword_schema(&s)))),
        ("source", text(sources.into_iter().next())),
        ("value", Some(json!(value))),
    ]))
}

pub fn keyword_schema(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn free_keyword_inverse(keyword: &Value) -> Option<DataField> {
    let value = get_str(keyword, "value")?;
    let source = get_str(keyword, "source");
    if source == Some("magpie") {
        return None;
    }
    Some(
        DataField::with_indicators("653", '1', ' ')
            .subfield('a', value)
            .subfield_opt('2', get_str(keyword, "schema"))
            .subfield_opt('9', source),
    )
}

// ---------------------------------------------------------------------------
// Collections (980)
// ---------------------------------------------------------------------------

/// Upper-cased `980/a` values of a field
pub fn collections(field: &DataField) -> Vec<String> {
    all(field, 'a').into_iter().map(|c| c.to_uppercase()).collect()
}

/// Whether a 980 field marks the record as deleted
pub fn is_deleted(field: &DataField) -> bool {
    all(field, 'c')
        .iter()
        .chain(all(field, 'a').iter())
        .any(|c| c.eq_ignore_ascii_case("deleted"))
}

/// `core` and `deleted` flags carried by a 980 field
pub fn core_and_deleted(field: &DataField) -> Vec<Entry> {
    let mut entries = Vec::new();
    if collections(field).iter().any(|c| c == "CORE") {
        entries.push(Entry::scalar("core", json!(true)));
    }
    if is_deleted(field) {
        entries.push(Entry::scalar("deleted", json!(true)));
    }
    entries
}

pub fn core_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(flag_inverse(value, 'a', "CORE"))
}

pub fn deleted_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(flag_inverse(value, 'c', "DELETED"))
}

/// A 980 field carrying `marker` when `value` is `true`
pub fn flag_inverse(value: &Value, code: char, marker: &str) -> Vec<DataField> {
    flag_inverse_tag(value, "980", code, marker)
}

pub fn flag_inverse_tag(value: &Value, tag: &'static str, code: char, marker: &str) -> Vec<DataField> {
    if value.as_bool() == Some(true) {
        vec![DataField::blank(tag).subfield(code, marker)]
    } else {
        Vec::new()
    }
}

/// The collection marker of a record type
pub fn collection_marker(marker: &str) -> Vec<DataField> {
    vec![DataField::blank("980").subfield('a', marker)]
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Scalar date entry, coerced to its longest valid ISO prefix
pub fn date_entry(field: &DataField, code: char, key: &'static str) -> Option<Entry> {
    let raw = first(field, code)?;
    match coerce_date(&raw) {
        Some(date) => Some(Entry::scalar(key, json!(date))),
        None => {
            tracing::warn!("Field {}: ignoring malformed date {:?} in ${}", field.tag, raw, code);
            None
        }
    }
}

/// Coerced date of a subfield as a JSON value
pub fn date_value(field: &DataField, code: char) -> Option<Value> {
    let raw = first(field, code)?;
    let date = coerce_date(&raw);
    if date.is_none() {
        tracing::warn!("Field {}: ignoring malformed date {:?} in ${}", field.tag, raw, code);
    }
    date.map(Value::String)
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Drop empty strings, lists and objects left behind by the handlers
pub fn strip_empty_values(doc: &mut Document, _env: &TranslationEnv) {
    for value in doc.values_mut() {
        *value = strip_empty(value.take()).unwrap_or(Value::Null);
    }
    doc.retain(|_, value| !value.is_null());
}
