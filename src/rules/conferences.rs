//! Conference records

use serde_json::{json, Value};

use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::RecordType;
use crate::utils::text::{all, first, force_list, get_str};

use super::common::{self, object, text};
use super::{pat, Cardinality, Context, Contribution, Entry, RuleSet};

/// Keys stored in 111, in the order that decides which of them carries the field
const MAIN_ENTRY_KEYS: &[&str] = &[
    "titles",
    "addresses",
    "acronyms",
    "cnum",
    "opening_date",
    "closing_date",
];

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Conferences)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("111"), "titles", Cardinality::List, main_entry)
        .rule(pat("411"), "series", Cardinality::List, series)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("520"), "short_description", Cardinality::Scalar, short_description)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("653").ind1("1 "), "keywords", Cardinality::List, keyword)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "core", Cardinality::Scalar, collections)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("titles", titles_inverse)
        .inverse("addresses", addresses_inverse)
        .inverse("acronyms", acronyms_inverse)
        .inverse("cnum", cnum_inverse)
        .inverse("opening_date", opening_date_inverse)
        .inverse("closing_date", closing_date_inverse)
        .inverse("series", series_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("short_description", short_description_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
        .inverse("keywords", keywords_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("$schema", collection_inverse)
        .inverse("core", common::core_inverse)
        .inverse("deleted", common::deleted_inverse)
        .build()
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

/// 111: title, place, dates, acronym and CNUM of the conference
fn main_entry(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = Vec::new();

    if let Some(title) = first(field, 'a') {
        entries.push(Entry::append(
            "titles",
            object([("subtitle", text(first(field, 'b'))), ("title", Some(json!(title)))]),
        ));
    }
    if let Some(place) = first(field, 'c') {
        entries.push(Entry::append("addresses", json!({ "place_name": place })));
    }
    for acronym in all(field, 'e') {
        entries.push(Entry::append("acronyms", json!(acronym)));
    }
    if let Some(cnum) = first(field, 'g') {
        entries.push(Entry::scalar("cnum", json!(cnum)));
    }
    entries.extend(common::date_entry(field, 'x', "opening_date"));
    entries.extend(common::date_entry(field, 'y', "closing_date"));

    Ok(entries.into())
}

/// 411: conference series and the edition number within it
fn series(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(name) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let number = first(field, 'n').and_then(|n| n.parse::<u32>().ok());
    Ok(object([("name", Some(json!(name))), ("number", number.map(|n| json!(n)))]).into())
}

fn short_description(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("source", text(first(field, '9'))), ("value", Some(json!(value)))]).into())
}

fn keyword(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::free_keyword(field).into())
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Conferences))
}

fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::core_and_deleted(field).into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

/// Whether `key` is the first 111 key present, and so carries the field
fn carries_main_entry(key: &str, ctx: &Context<'_>) -> bool {
    MAIN_ENTRY_KEYS.iter().find(|k| ctx.has(k)) == Some(&key)
}

/// The 111 field with everything but the title
fn main_entry_field(ctx: &Context<'_>) -> DataField {
    let mut field = DataField::blank("111");
    if let Some(address) = ctx.get("addresses").map(force_list).and_then(|a| a.into_iter().next()) {
        field = field.subfield_opt('c', get_str(address, "place_name"));
    }
    for acronym in ctx.get("acronyms").map(common::strings).unwrap_or_default() {
        field.add_subfield('e', acronym);
    }
    field
        .subfield_opt('g', ctx.get("cnum").and_then(Value::as_str))
        .subfield_opt('x', ctx.get("opening_date").and_then(Value::as_str))
        .subfield_opt('y', ctx.get("closing_date").and_then(Value::as_str))
}

/// One 111 per title; the first one also carries place, dates and CNUM
fn titles_inverse(value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    let mut fields = Vec::new();
    for (position, title) in force_list(value).into_iter().enumerate() {
        let mut field = DataField::blank("111")
            .subfield_opt('a', get_str(title, "title"))
            .subfield_opt('b', get_str(title, "subtitle"));
        if position == 0 {
            field.subfields.extend(main_entry_field(ctx).subfields);
        }
        fields.push(field);
    }
    Ok(fields)
}

fn untitled_main_entry(key: &str, ctx: &Context<'_>) -> Vec<DataField> {
    if carries_main_entry(key, ctx) {
        vec![main_entry_field(ctx)]
    } else {
        Vec::new()
    }
}

fn addresses_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(untitled_main_entry("addresses", ctx))
}

fn acronyms_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(untitled_main_entry("acronyms", ctx))
}

fn cnum_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(untitled_main_entry("cnum", ctx))
}

fn opening_date_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(untitled_main_entry("opening_date", ctx))
}

fn closing_date_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(untitled_main_entry("closing_date", ctx))
}

fn series_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|series| {
            let number = series.get("number").and_then(Value::as_u64);
            Some(
                DataField::blank("411")
                    .subfield('a', get_str(series, "name")?)
                    .subfield_opt('n', number.map(|n| n.to_string())),
            )
        })
        .collect())
}

fn short_description_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(get_str(value, "value")
        .map(|description| {
            vec![DataField::blank("520")
                .subfield('a', description)
                .subfield_opt('9', get_str(value, "source"))]
        })
        .unwrap_or_default())
}

fn keywords_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(common::free_keyword_inverse)
        .collect())
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("CONFERENCES"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{translate_forward, translate_inverse};
    use crate::env::TranslationEnv;
    use crate::marc::Record;
    use crate::models::Document;

    fn forward(fields: Vec<DataField>) -> Document {
        let mut record = Record::new();
        for field in fields {
            record.push(field);
        }
        translate_forward(RecordType::Conferences, &record, &TranslationEnv::default()).unwrap()
    }

    fn inverse(doc: &Document) -> Vec<DataField> {
        translate_inverse(RecordType::Conferences, doc, &TranslationEnv::default())
            .unwrap()
            .map(|record| record.data_fields)
            .unwrap_or_default()
    }

    #[test]
    fn test_111_main_entry() {
        let doc = forward(vec![DataField::blank("111")
            .subfield('a', "Rencontres de Moriond")
            .subfield('c', "La Thuile, Italy")
            .subfield('e', "Moriond EW")
            .subfield('g', "C15-03-14")
            .subfield('x', "2015-03-14")
            .subfield('y', "2015-03-21")]);

        assert_eq!(doc["titles"], json!([{"title": "Rencontres de Moriond"}]));
        assert_eq!(doc["addresses"], json!([{"place_name": "La Thuile, Italy"}]));
        assert_eq!(doc["acronyms"], json!(["Moriond EW"]));
        assert_eq!(doc["cnum"], "C15-03-14");
        assert_eq!(doc["opening_date"], "2015-03-14");
        assert_eq!(doc["closing_date"], "2015-03-21");
    }

    #[test]
    fn test_111_round_trip() {
        let field = DataField::blank("111")
            .subfield('a', "Rencontres de Moriond")
            .subfield('c', "La Thuile, Italy")
            .subfield('g', "C15-03-14")
            .subfield('x', "2015-03-14");
        let doc = forward(vec![field.clone()]);

        let mut only_111 = doc.clone();
        only_111.remove("$schema");
        assert_eq!(inverse(&only_111), vec![field]);
    }

    #[test]
    fn test_untitled_main_entry_is_emitted_once() {
        let mut doc = Document::new();
        doc.insert("cnum".into(), json!("C15-03-14"));
        doc.insert("opening_date".into(), json!("2015-03-14"));
        assert_eq!(
            inverse(&doc),
            vec![DataField::blank("111").subfield('g', "C15-03-14").subfield('x', "2015-03-14")]
        );
    }

    #[test]
    fn test_411_series() {
        let doc = forward(vec![DataField::blank("411").subfield('a', "Moriond").subfield('n', "50")]);
        assert_eq!(doc["series"], json!([{"name": "Moriond", "number": 50}]));
    }

    #[test]
    fn test_keywords_and_flags() {
        let doc = forward(vec![
            DataField::with_indicators("653", '1', ' ').subfield('a', "electroweak").subfield('9', "submitter"),
            DataField::with_indicators("653", '1', ' ').subfield('a', "ignored").subfield('9', "conference"),
            DataField::blank("980").subfield('a', "CONFERENCES"),
            DataField::blank("980").subfield('c', "DELETED"),
        ]);
        assert_eq!(doc["keywords"], json!([{"source": "submitter", "value": "electroweak"}]));
        assert_eq!(doc["deleted"], json!(true));
        assert!(!doc.contains_key("core"));
    }
}
