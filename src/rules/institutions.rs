//! Institution records

use serde_json::{json, Value};

use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::RecordType;
use crate::utils::text::{all, first, force_list, get_str, get_strs};

use super::common::{self, object, text};
use super::{pat, Cardinality, Context, Contribution, Entry, RuleSet};

/// Keys stored in 110; the first one present carries the field
const NAME_KEYS: &[&str] = &["institution_hierarchy", "legacy_ICN", "ICN"];

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Institutions)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("110"), "institution_hierarchy", Cardinality::ListExtend, names)
        .rule(pat("371"), "addresses", Cardinality::List, address)
        .rule(pat("410"), "name_variants", Cardinality::List, name_variant)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("510"), "related_records", Cardinality::List, related_record)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "core", Cardinality::Scalar, collections)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("institution_hierarchy", institution_hierarchy_inverse)
        .inverse("legacy_ICN", legacy_icn_inverse)
        .inverse("ICN", icn_inverse)
        .inverse("addresses", addresses_inverse)
        .inverse("name_variants", name_variants_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("related_records", related_records_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
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

/// 110: institution name, its subunits and the legacy ICNs
fn names(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = Vec::new();

    let hierarchy: Vec<Value> = all(field, 'a')
        .into_iter()
        .chain(all(field, 'b'))
        .map(|name| json!({ "name": name }))
        .collect();
    if !hierarchy.is_empty() {
        entries.push(Entry::new("institution_hierarchy", Cardinality::ListExtend, json!(hierarchy)));
    }
    if let Some(legacy_icn) = first(field, 't') {
        entries.push(Entry::scalar("legacy_ICN", json!(legacy_icn)));
    }
    let icns = all(field, 'u');
    if !icns.is_empty() {
        entries.push(Entry::new("ICN", Cardinality::ListExtend, json!(icns)));
    }

    Ok(entries.into())
}

/// 371: postal address
fn address(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let postal_address = all(field, 'a');
    let cities = all(field, 'b');
    let country_code = first(field, 'g')
        .map(|g| g.to_uppercase())
        .filter(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_alphabetic()));

    Ok(common::object_opt([
        ("cities", (!cities.is_empty()).then(|| json!(cities))),
        ("country_code", country_code.map(Value::String)),
        ("postal_address", (!postal_address.is_empty()).then(|| json!(postal_address))),
        ("postal_code", text(first(field, 'e'))),
        ("state", text(first(field, 'c'))),
    ])
    .into())
}

fn name_variant(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("source", text(first(field, '9'))), ("value", Some(json!(value)))]).into())
}

fn related_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    common::related_record(field, ctx, RecordType::Institutions)
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Institutions))
}

fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::core_and_deleted(field).into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn name_field(key: &str, ctx: &Context<'_>) -> Vec<DataField> {
    if NAME_KEYS.iter().find(|k| ctx.has(k)) != Some(&key) {
        return Vec::new();
    }

    let mut field = DataField::blank("110");
    let hierarchy = ctx.get("institution_hierarchy").map(force_list).unwrap_or_default();
    for (position, unit) in hierarchy.into_iter().enumerate() {
        let code = if position == 0 { 'a' } else { 'b' };
        field = field.subfield_opt(code, get_str(unit, "name"));
    }
    field = field.subfield_opt('t', ctx.get("legacy_ICN").and_then(Value::as_str));
    for icn in ctx.get("ICN").map(common::strings).unwrap_or_default() {
        field.add_subfield('u', icn);
    }
    vec![field]
}

fn institution_hierarchy_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(name_field("institution_hierarchy", ctx))
}

fn legacy_icn_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(name_field("legacy_ICN", ctx))
}

fn icn_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(name_field("ICN", ctx))
}

fn addresses_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .map(|address| {
            let mut field = DataField::blank("371");
            for line in get_strs(address, "postal_address") {
                field.add_subfield('a', line);
            }
            for city in get_strs(address, "cities") {
                field.add_subfield('b', city);
            }
            field
                .subfield_opt('c', get_str(address, "state"))
                .subfield_opt('e', get_str(address, "postal_code"))
                .subfield_opt('g', get_str(address, "country_code"))
        })
        .collect())
}

fn name_variants_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|variant| {
            Some(
                DataField::blank("410")
                    .subfield('a', get_str(variant, "value")?)
                    .subfield_opt('9', get_str(variant, "source")),
            )
        })
        .collect())
}

fn related_records_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::related_records_inverse("510", value))
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("INSTITUTION"))
}
