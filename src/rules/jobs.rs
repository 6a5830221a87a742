//! Job records

use serde_json::{json, Value};

use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::RecordType;
use crate::utils::ranks::normalize_rank;
use crate::utils::refs::get_recid_from_ref;
use crate::utils::text::{all, first, force_list, get_str};

use super::common::{self, object, text};
use super::hepnames;
use super::{pat, Cardinality, Context, Contribution, Entry, RuleSet};

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Jobs)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("046"), "deadline_date", Cardinality::Scalar, dates)
        .rule(pat("110"), "institutions", Cardinality::List, institution)
        .rule(pat("245"), "position", Cardinality::Scalar, position)
        .rule(pat("270"), "contact_details", Cardinality::List, contact_details)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("520"), "description", Cardinality::Joined("\n"), description)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("650").ind1("1").ind2("7"), "arxiv_categories", Cardinality::List, hepnames::arxiv_category)
        .rule(pat("656"), "ranks", Cardinality::List, rank)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "status", Cardinality::Scalar, collections)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("deadline_date", deadline_date_inverse)
        .inverse("closed_date", closed_date_inverse)
        .inverse("institutions", institutions_inverse)
        .inverse("position", position_inverse)
        .inverse("contact_details", contact_details_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("description", description_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
        .inverse("arxiv_categories", hepnames::arxiv_categories_inverse)
        .inverse("ranks", ranks_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("$schema", collection_inverse)
        .inverse("deleted", common::deleted_inverse)
        .build()
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

/// 046: application deadline (`i`) and closing date (`l`)
fn dates(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let entries: Vec<Entry> = common::date_entry(field, 'i', "deadline_date")
        .into_iter()
        .chain(common::date_entry(field, 'l', "closed_date"))
        .collect();
    Ok(entries.into())
}

/// 110: hiring institution
fn institution(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(name) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let record = ctx.record_ref(&field.tag, RecordType::Institutions, first(field, 'z').as_deref());
    Ok(object([
        ("curated_relation", record.as_ref().map(|_| json!(true))),
        ("record", record),
        ("value", Some(json!(name))),
    ])
    .into())
}

fn position(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(text(first(field, 'a')).into())
}

/// 270: contact person
fn contact_details(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::object_opt([
        ("email", text(first(field, 'm'))),
        ("name", text(first(field, 'p'))),
    ])
    .into())
}

fn description(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let paragraphs = all(field, 'a');
    if paragraphs.is_empty() {
        return Ok(Contribution::Nothing);
    }
    Ok(json!(paragraphs.join("\n")).into())
}

/// 656: rank of the position, normalized against the rank table
fn rank(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(first(field, 'a')
        .and_then(|raw| normalize_rank(&raw, &ctx.env.rank_types))
        .map(Value::String)
        .into())
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Jobs))
}

/// 980: `JOBHIDDEN` closes the job whatever order the markers come in
fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = Vec::new();
    for collection in common::collections(field) {
        match collection.as_str() {
            "JOBHIDDEN" => {
                entries.push(Entry::new("status", Cardinality::ScalarReplace, json!("closed")));
            }
            "JOB" => entries.push(Entry::scalar("status", json!("open"))),
            _ => {}
        }
    }
    if common::is_deleted(field) {
        entries.push(Entry::scalar("deleted", json!(true)));
    }
    Ok(entries.into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn deadline_date_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|date| vec![DataField::blank("046").subfield('i', date)])
        .unwrap_or_default())
}

fn closed_date_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|date| vec![DataField::blank("046").subfield('l', date)])
        .unwrap_or_default())
}

fn institutions_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|institution| {
            let recid = institution.get("record").and_then(get_recid_from_ref);
            Some(
                DataField::blank("110")
                    .subfield('a', get_str(institution, "value")?)
                    .subfield_opt('z', recid.map(|id| id.to_string())),
            )
        })
        .collect())
}

fn position_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|position| vec![DataField::blank("245").subfield('a', position)])
        .unwrap_or_default())
}

fn contact_details_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .map(|contact| {
            DataField::blank("270")
                .subfield_opt('m', get_str(contact, "email"))
                .subfield_opt('p', get_str(contact, "name"))
        })
        .collect())
}

fn description_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|description| vec![DataField::blank("520").subfield('a', description)])
        .unwrap_or_default())
}

fn ranks_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .map(|rank| DataField::blank("656").subfield('a', rank))
        .collect())
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    let marker = match ctx.get("status").and_then(Value::as_str) {
        Some("closed") => "JOBHIDDEN",
        _ => "JOB",
    };
    Ok(common::collection_marker(marker))
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
        translate_forward(RecordType::Jobs, &record, &TranslationEnv::default()).unwrap()
    }

    #[test]
    fn test_046_dates() {
        let doc = forward(vec![DataField::blank("046").subfield('i', "2015-12-15").subfield('l', "2016-01-31")]);
        assert_eq!(doc["deadline_date"], "2015-12-15");
        assert_eq!(doc["closed_date"], "2016-01-31");
    }

    #[test]
    fn test_110_institution() {
        let doc = forward(vec![DataField::blank("110").subfield('a', "CERN").subfield('z', "902725")]);
        assert_eq!(
            doc["institutions"],
            json!([{
                "curated_relation": true,
                "record": {"$ref": "http://localhost:5000/api/institutions/902725"},
                "value": "CERN"
            }])
        );
    }

    #[test]
    fn test_656_ranks() {
        let doc = forward(vec![
            DataField::blank("656").subfield('a', "Postdoc"),
            DataField::blank("656").subfield('a', "Senior"),
        ]);
        assert_eq!(doc["ranks"], json!(["POSTDOC", "SENIOR"]));
    }

    #[test]
    fn test_980_status() {
        let doc = forward(vec![
            DataField::blank("980").subfield('a', "JOB"),
            DataField::blank("980").subfield('a', "JOBHIDDEN"),
        ]);
        assert_eq!(doc["status"], "closed");

        let doc = forward(vec![DataField::blank("980").subfield('a', "JOB")]);
        assert_eq!(doc["status"], "open");
    }

    #[test]
    fn test_inverse_round_trip() {
        let fields = vec![
            DataField::blank("110").subfield('a', "DESY").subfield('z', "902770"),
            DataField::blank("245").subfield('a', "Postdoctoral position in theory"),
            DataField::blank("270").subfield('m', "jobs@desy.de").subfield('p', "Jane Doe"),
            DataField::with_indicators("650", '1', '7').subfield('a', "hep-th").subfield('2', "arXiv"),
            DataField::blank("656").subfield('a', "POSTDOC"),
            DataField::blank("980").subfield('a', "JOBHIDDEN"),
        ];
        let doc = forward(fields.clone());
        let record = translate_inverse(RecordType::Jobs, &doc, &TranslationEnv::default())
            .unwrap()
            .unwrap();
        assert_eq!(record.data_fields, fields);
    }
}
