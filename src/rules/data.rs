//! Data records

use serde_json::{json, Value};

use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::RecordType;
use crate::utils::refs::get_recid_from_ref;
use crate::utils::text::{first, force_list, get_str};

use super::common::{self, object, text};
use super::{conversion_error, pat, Cardinality, Context, Contribution, RuleSet};

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Data)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("024").ind1("7 "), "dois", Cardinality::List, doi)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("245"), "titles", Cardinality::List, title)
        .rule(pat("520"), "abstracts", Cardinality::List, abstract_)
        .rule(pat("786"), "literature", Cardinality::List, literature)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "deleted", Cardinality::Scalar, collections)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("dois", dois_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("titles", titles_inverse)
        .inverse("abstracts", abstracts_inverse)
        .inverse("literature", literature_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("$schema", collection_inverse)
        .inverse("deleted", common::deleted_inverse)
        .build()
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

/// 024: only DOIs are meaningful on data records
fn doi(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    match first(field, '2') {
        Some(schema) if schema.eq_ignore_ascii_case("doi") => {
            Ok(object([("source", text(first(field, '9'))), ("value", Some(json!(value)))]).into())
        }
        other => Err(conversion_error(field, format!("unsupported identifier schema {:?}", other))),
    }
}

fn title(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(title) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("source", text(first(field, '9'))), ("title", Some(json!(title)))]).into())
}

fn abstract_(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("source", text(first(field, '9'))), ("value", Some(json!(value)))]).into())
}

/// 786: the publication the dataset belongs to
fn literature(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let record = ctx.record_ref(&field.tag, RecordType::Hep, first(field, 'w').as_deref());
    let doi = first(field, 'a').map(|a| json!({ "value": a }));
    Ok(common::object_opt([("doi", doi), ("record", record)]).into())
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Data))
}

fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::is_deleted(field).then(|| json!(true)).into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn dois_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|doi| {
            Some(
                DataField::with_indicators("024", '7', ' ')
                    .subfield('a', get_str(doi, "value")?)
                    .subfield('2', "DOI")
                    .subfield_opt('9', get_str(doi, "source")),
            )
        })
        .collect())
}

fn titles_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|title| {
            Some(
                DataField::blank("245")
                    .subfield('a', get_str(title, "title")?)
                    .subfield_opt('9', get_str(title, "source")),
            )
        })
        .collect())
}

fn abstracts_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|abstract_| {
            Some(
                DataField::blank("520")
                    .subfield('a', get_str(abstract_, "value")?)
                    .subfield_opt('9', get_str(abstract_, "source")),
            )
        })
        .collect())
}

fn literature_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|literature| {
            let recid = literature.get("record").and_then(get_recid_from_ref);
            let doi = literature.get("doi").and_then(|doi| get_str(doi, "value"));
            if recid.is_none() && doi.is_none() {
                return None;
            }
            Some(
                DataField::blank("786")
                    .subfield_opt('a', doi)
                    .subfield_opt('w', recid.map(|id| id.to_string())),
            )
        })
        .collect())
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("DATA"))
}
