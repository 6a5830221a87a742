//! Journal records

use serde_json::{json, Value};

use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::RecordType;
use crate::utils::text::{all, first, force_list, get_str};

use super::common::{self, object, text};
use super::{conversion_error, pat, Cardinality, Context, Contribution, Entry, RuleSet};

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Journals)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("022"), "issns", Cardinality::List, issn)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("130"), "journal_title", Cardinality::Scalar, journal_title)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("530"), "related_records", Cardinality::List, related_record)
        .rule(pat("583"), "_harvesting_info", Cardinality::Scalar, harvesting_info)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("643"), "publisher", Cardinality::ListExtend, publisher)
        .rule(pat("711"), "short_title", Cardinality::Scalar, short_title)
        .rule(pat("730"), "title_variants", Cardinality::List, title_variant)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "core", Cardinality::Scalar, collections)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("issns", issns_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("journal_title", journal_title_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("related_records", related_records_inverse)
        .inverse("_harvesting_info", harvesting_info_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
        .inverse("publisher", publisher_inverse)
        .inverse("short_title", short_title_inverse)
        .inverse("title_variants", title_variants_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("$schema", collection_inverse)
        .inverse("core", common::core_inverse)
        .inverse("book_series", book_series_inverse)
        .inverse("proceedings", proceedings_inverse)
        .inverse("refereed", refereed_inverse)
        .inverse("deleted", common::deleted_inverse)
        .build()
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

fn issn(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let medium = match first(field, 'b').map(|b| b.to_lowercase()).as_deref() {
        None => None,
        Some("print") => Some("print"),
        Some("online") | Some("electronic") => Some("online"),
        Some(other) => {
            return Err(conversion_error(field, format!("unknown ISSN medium {:?}", other)));
        }
    };
    Ok(object([("medium", medium.map(|m| json!(m))), ("value", Some(json!(value)))]).into())
}

fn journal_title(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(title) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("subtitle", text(first(field, 'b'))), ("title", Some(json!(title)))]).into())
}

fn related_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    common::related_record(field, ctx, RecordType::Journals)
}

/// 583: state of the harvesting of the journal
fn harvesting_info(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::object_opt([
        ("coverage", text(first(field, 'a').map(|a| a.to_lowercase()))),
        ("date_last_harvest", common::date_value(field, 'c')),
        ("last_seen_item", text(first(field, '3'))),
        ("method", text(first(field, 'i').map(|i| i.to_lowercase()))),
    ])
    .into())
}

fn publisher(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let publishers = all(field, 'b');
    if publishers.is_empty() {
        return Ok(Contribution::Nothing);
    }
    Ok(json!(publishers).into())
}

/// 711: the first one gives the short title (`u`, else `a`); every other
/// name becomes a title variant
fn short_title(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let name = first(field, 'a');
    let abbreviation = first(field, 'u');
    let mut entries = Vec::new();

    if ctx.has("short_title") {
        entries.extend(name.map(|a| Entry::append("title_variants", json!(a))));
    } else if let Some(abbreviation) = abbreviation {
        entries.push(Entry::scalar("short_title", json!(abbreviation)));
        entries.extend(name.map(|a| Entry::append("title_variants", json!(a))));
    } else if let Some(name) = name {
        entries.push(Entry::scalar("short_title", json!(name)));
    }

    Ok(entries.into())
}

/// 730: title variant; fields with a `b` are not variants and are skipped
fn title_variant(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    if field.has_subfield('b') {
        return Ok(Contribution::Nothing);
    }
    Ok(text(first(field, 'a')).into())
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Journals))
}

fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = common::core_and_deleted(field);
    for collection in common::collections(field) {
        match collection.as_str() {
            "BOOKSERIES" => entries.push(Entry::scalar("book_series", json!(true))),
            "PROCEEDINGS" => entries.push(Entry::scalar("proceedings", json!(true))),
            "PEER REVIEW" | "REFEREED" => entries.push(Entry::scalar("refereed", json!(true))),
            _ => {}
        }
    }
    Ok(entries.into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn issns_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|issn| {
            let medium = match get_str(issn, "medium") {
                Some("print") => Some("Print"),
                Some("online") => Some("Online"),
                _ => None,
            };
            Some(
                DataField::blank("022")
                    .subfield('a', get_str(issn, "value")?)
                    .subfield_opt('b', medium),
            )
        })
        .collect())
}

fn journal_title_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(get_str(value, "title")
        .map(|title| {
            vec![DataField::blank("130")
                .subfield('a', title)
                .subfield_opt('b', get_str(value, "subtitle"))]
        })
        .unwrap_or_default())
}

fn related_records_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::related_records_inverse("530", value))
}

fn harvesting_info_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(vec![DataField::blank("583")
        .subfield_opt('a', get_str(value, "coverage"))
        .subfield_opt('c', get_str(value, "date_last_harvest"))
        .subfield_opt('i', get_str(value, "method"))
        .subfield_opt('3', get_str(value, "last_seen_item"))])
}

fn publisher_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .map(|publisher| DataField::blank("643").subfield('b', publisher))
        .collect())
}

fn short_title_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|title| vec![DataField::blank("711").subfield('a', title)])
        .unwrap_or_default())
}

fn title_variants_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .map(|variant| DataField::blank("730").subfield('a', variant))
        .collect())
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("JOURNALS"))
}

fn book_series_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::flag_inverse(value, 'a', "BookSeries"))
}

fn proceedings_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::flag_inverse(value, 'a', "Proceedings"))
}

fn refereed_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::flag_inverse(value, 'a', "Peer Review"))
}
