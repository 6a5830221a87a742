//! Author (HEPNames) records

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::RecordType;
use crate::utils::arxiv::{normalize_arxiv_category, valid_arxiv_categories};
use crate::utils::ranks::normalize_rank;
use crate::utils::refs::get_recid_from_ref;
use crate::utils::text::{all, first, force_list, get_str, get_strs};

use super::common::{self, object, text};
use super::{conversion_error, pat, Cardinality, Context, Contribution, Entry, RuleSet};

static BAI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+\.)+\d+$").unwrap());
static ORCID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").unwrap()
});
static INSPIRE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^INSPIRE-\d{8}$").unwrap());

/// Legacy `035/9` spellings and their identifier schema
const ID_SCHEMAS: &[(&str, &str)] = &[
    ("ARXIV", "ARXIV"),
    ("BAI", "INSPIRE BAI"),
    ("CERN", "CERN"),
    ("DESY", "DESY"),
    ("GOOGLESCHOLAR", "GOOGLESCHOLAR"),
    ("INSPIRE", "INSPIRE ID"),
    ("JACOW", "JACOW"),
    ("KAKEN", "KAKEN"),
    ("LINKEDIN", "LINKEDIN"),
    ("ORCID", "ORCID"),
    ("RESEARCHERID", "RESEARCHERID"),
    ("SCOPUS", "SCOPUS"),
    ("SPIRES", "SPIRES"),
    ("TWITTER", "TWITTER"),
    ("VIAF", "VIAF"),
    ("WIKIPEDIA", "WIKIPEDIA"),
];

const STATUSES: &[&str] = &["active", "deceased", "departed", "retired"];

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Authors)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("035"), "ids", Cardinality::List, id)
        .rule(pat("100"), "name", Cardinality::Mapping, name)
        .rule(pat("371"), "positions", Cardinality::List, position)
        .rule(pat("400"), "name", Cardinality::Mapping, name_variants)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("650").ind1("1").ind2("7"), "arxiv_categories", Cardinality::List, arxiv_category)
        .rule(pat("701"), "advisors", Cardinality::List, advisor)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "deleted", Cardinality::Scalar, collections)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("ids", ids_inverse)
        .inverse("name", name_inverse)
        .inverse("positions", positions_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
        .inverse("arxiv_categories", arxiv_categories_inverse)
        .inverse("advisors", advisors_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("deleted", common::deleted_inverse)
        .inverse("$schema", collection_inverse)
        .build()
}

/// Recognize a bare author identifier by its shape.
///
/// Handles the prefixed forms found in publication records (`ORCID:`,
/// `JACoW-`, `CCID-`) as well as INSPIRE ids, BAIs and bare ORCIDs.
pub fn author_id(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    let (schema, value) = if let Some(orcid) = raw.strip_prefix("ORCID:") {
        ("ORCID", orcid.to_string())
    } else if raw.starts_with("JACoW-") {
        ("JACOW", raw.to_string())
    } else if let Some(ccid) = raw.strip_prefix("CCID-") {
        ("CERN", format!("CERN-{}", ccid))
    } else if INSPIRE_ID.is_match(raw) {
        ("INSPIRE ID", raw.to_string())
    } else if ORCID.is_match(raw) {
        ("ORCID", raw.to_string())
    } else if BAI.is_match(raw) {
        ("INSPIRE BAI", raw.to_string())
    } else {
        return None;
    };
    Some(json!({ "schema": schema, "value": value }))
}

/// Identifier in its legacy prefixed spelling, inverse of [`author_id`]
pub fn author_id_inverse(id: &Value) -> Option<(char, String)> {
    let value = get_str(id, "value")?;
    match get_str(id, "schema")? {
        "INSPIRE ID" => Some(('i', value.to_string())),
        "ORCID" => Some(('j', format!("ORCID:{}", value))),
        "JACOW" => Some(('j', value.to_string())),
        "CERN" => Some(('j', value.replacen("CERN-", "CCID-", 1))),
        "INSPIRE BAI" => Some(('w', value.to_string())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

fn id(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let schema = first(field, '9').map(|s| s.to_uppercase());
    match schema.as_deref() {
        Some(legacy) => {
            let Some((_, schema)) = ID_SCHEMAS.iter().find(|(name, _)| *name == legacy) else {
                return Err(conversion_error(field, format!("unknown identifier schema {}", legacy)));
            };
            let value = match *schema {
                "ORCID" => value.trim_start_matches("https://orcid.org/").to_string(),
                _ => value,
            };
            Ok(json!({ "schema": schema, "value": value }).into())
        }
        None => match author_id(&value) {
            Some(id) => Ok(id.into()),
            None => Err(conversion_error(field, format!("unrecognized identifier {:?}", value))),
        },
    }
}

/// 100: preferred name and status
fn name(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = Vec::new();
    if let Some(name) = common::object_opt([
        ("numeration", text(first(field, 'b'))),
        ("preferred_name", text(first(field, 'q'))),
        ("title", text(first(field, 'c'))),
        ("value", text(first(field, 'a'))),
    ]) {
        entries.push(Entry::merge("name", name));
    }
    if let Some(status) = first(field, 'g').map(|s| s.to_lowercase()) {
        if STATUSES.contains(&status.as_str()) {
            entries.push(Entry::scalar("status", json!(status)));
        } else {
            tracing::warn!("Field 100: ignoring unknown status {:?}", status);
        }
    }
    Ok(entries.into())
}

fn name_variants(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let variants = all(field, 'a');
    if variants.is_empty() {
        return Ok(Contribution::Nothing);
    }
    Ok(json!({ "name_variants": variants }).into())
}

/// 371: position held at an institution
fn position(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(institution) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let record = ctx.record_ref(&field.tag, RecordType::Institutions, first(field, '0').as_deref());
    let current = first(field, 'z').map(|z| z.eq_ignore_ascii_case("current"));
    let emails = all(field, 'm');

    Ok(object([
        ("current", current.filter(|c| *c).map(Value::Bool)),
        ("curated_relation", record.as_ref().map(|_| json!(true))),
        ("emails", (!emails.is_empty()).then(|| json!(emails))),
        ("end_date", common::date_value(field, 't')),
        ("institution", Some(json!(institution))),
        (
            "rank",
            first(field, 'r')
                .and_then(|r| normalize_rank(&r, &ctx.env.rank_types))
                .map(Value::String),
        ),
        ("record", record),
        ("start_date", common::date_value(field, 's')),
    ])
    .into())
}

/// 65017: research field, stored as an arXiv category
pub fn arxiv_category(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(raw) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let category = normalize_arxiv_category(&raw);
    if valid_arxiv_categories().contains(&category.as_str()) {
        return Ok(json!(category).into());
    }
    // Legacy records sometimes carry the INSPIRE field instead
    let from_field = ctx
        .env
        .category_mapping
        .iter()
        .find(|(_, term)| term.eq_ignore_ascii_case(&raw))
        .map(|(category, _)| category.clone());
    match from_field {
        Some(category) => Ok(json!(category).into()),
        None => Err(conversion_error(field, format!("unknown field {:?}", raw))),
    }
}

/// 701: thesis advisor
fn advisor(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(name) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let record = ctx.record_ref(&field.tag, RecordType::Authors, first(field, 'x').as_deref());
    let ids: Vec<Value> = all(field, 'i')
        .into_iter()
        .map(|id| json!({ "schema": "INSPIRE ID", "value": id }))
        .collect();

    Ok(object([
        ("curated_relation", first(field, 'y').map(|y| json!(y == "1"))),
        ("degree_type", text(first(field, 'g').map(|g| g.to_lowercase()))),
        ("ids", (!ids.is_empty()).then(|| json!(ids))),
        ("name", Some(json!(name))),
        ("record", record),
    ])
    .into())
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Authors))
}

fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::is_deleted(field).then(|| json!(true)).into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn ids_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|id| {
            let value = get_str(id, "value")?;
            let schema = get_str(id, "schema")?;
            let legacy = ID_SCHEMAS
                .iter()
                .find(|(_, name)| *name == schema)
                .map_or(schema, |(legacy, _)| *legacy);
            Some(DataField::blank("035").subfield('9', legacy).subfield('a', value))
        })
        .collect())
}

fn name_inverse(value: &Value, ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    let status = ctx.get("status").and_then(Value::as_str);
    let mut fields = vec![DataField::blank("100")
        .subfield_opt('a', get_str(value, "value"))
        .subfield_opt('b', get_str(value, "numeration"))
        .subfield_opt('c', get_str(value, "title"))
        .subfield_opt('g', status)
        .subfield_opt('q', get_str(value, "preferred_name"))];

    for variant in get_strs(value, "name_variants") {
        fields.push(DataField::blank("400").subfield('a', variant));
    }
    Ok(fields)
}

fn positions_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .map(|position| {
            let recid = position.get("record").and_then(get_recid_from_ref);
            let current = position.get("current").and_then(Value::as_bool) == Some(true);
            let mut field = DataField::blank("371")
                .subfield_opt('a', get_str(position, "institution"))
                .subfield_opt('r', get_str(position, "rank"))
                .subfield_opt('s', get_str(position, "start_date"))
                .subfield_opt('t', get_str(position, "end_date"));
            for email in get_strs(position, "emails") {
                field.add_subfield('m', email);
            }
            field
                .subfield_opt('z', current.then_some("Current"))
                .subfield_opt('0', recid.map(|id| id.to_string()))
        })
        .collect())
}

pub fn arxiv_categories_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .map(|category| {
            DataField::with_indicators("650", '1', '7')
                .subfield('a', category)
                .subfield('2', "arXiv")
        })
        .collect())
}

fn advisors_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .map(|advisor| {
            let recid = advisor.get("record").and_then(get_recid_from_ref);
            let curated = advisor.get("curated_relation").and_then(Value::as_bool);
            let mut field = DataField::blank("701").subfield_opt('a', get_str(advisor, "name"));
            for id in advisor.get("ids").map(force_list).unwrap_or_default() {
                if get_str(id, "schema") == Some("INSPIRE ID") {
                    field = field.subfield_opt('i', get_str(id, "value"));
                }
            }
            field
                .subfield_opt('g', get_str(advisor, "degree_type"))
                .subfield_opt('x', recid.map(|id| id.to_string()))
                .subfield_opt('y', curated.map(|c| if c { "1" } else { "0" }))
        })
        .collect())
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("HEPNAMES"))
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
        translate_forward(RecordType::Authors, &record, &TranslationEnv::default()).unwrap()
    }

    #[test]
    fn test_author_id() {
        assert_eq!(
            author_id("ORCID:0000-0002-1825-0097"),
            Some(json!({"schema": "ORCID", "value": "0000-0002-1825-0097"}))
        );
        assert_eq!(
            author_id("INSPIRE-00134135"),
            Some(json!({"schema": "INSPIRE ID", "value": "INSPIRE-00134135"}))
        );
        assert_eq!(
            author_id("J.Smith.1"),
            Some(json!({"schema": "INSPIRE BAI", "value": "J.Smith.1"}))
        );
        assert_eq!(
            author_id("CCID-659254"),
            Some(json!({"schema": "CERN", "value": "CERN-659254"}))
        );
        assert_eq!(author_id("something else"), None);
    }

    #[test]
    fn test_035_ids() {
        let doc = forward(vec![
            DataField::blank("035").subfield('9', "BAI").subfield('a', "J.Smith.1"),
            DataField::blank("035").subfield('9', "ORCID").subfield('a', "https://orcid.org/0000-0002-1825-0097"),
            DataField::blank("035").subfield('9', "UNHEARD-OF").subfield('a', "123"),
        ]);
        assert_eq!(
            doc["ids"],
            json!([
                {"schema": "INSPIRE BAI", "value": "J.Smith.1"},
                {"schema": "ORCID", "value": "0000-0002-1825-0097"}
            ])
        );
    }

    #[test]
    fn test_100_name_and_status() {
        let doc = forward(vec![
            DataField::blank("100").subfield('a', "Smith, John").subfield('q', "John Smith").subfield('g', "Deceased"),
            DataField::blank("400").subfield('a', "Smith, J."),
            DataField::blank("400").subfield('a', "Smit, Jan"),
        ]);
        assert_eq!(
            doc["name"],
            json!({"preferred_name": "John Smith", "value": "Smith, John", "name_variants": ["Smith, J.", "Smit, Jan"]})
        );
        assert_eq!(doc["status"], "deceased");
    }

    #[test]
    fn test_371_position() {
        let doc = forward(vec![DataField::blank("371")
            .subfield('a', "CERN")
            .subfield('r', "Post-doc")
            .subfield('s', "2010-02-30")
            .subfield('z', "Current")
            .subfield('0', "902725")]);
        assert_eq!(
            doc["positions"],
            json!([{
                "current": true,
                "curated_relation": true,
                "institution": "CERN",
                "rank": "POSTDOC",
                "record": {"$ref": "http://localhost:5000/api/institutions/902725"},
                "start_date": "2010-02"
            }])
        );
    }

    #[test]
    fn test_65017_arxiv_categories() {
        let doc = forward(vec![
            DataField::with_indicators("650", '1', '7').subfield('a', "HEP-TH").subfield('2', "arXiv"),
            DataField::with_indicators("650", '1', '7').subfield('a', "Lattice").subfield('2', "INSPIRE"),
        ]);
        assert_eq!(doc["arxiv_categories"], json!(["hep-th", "hep-lat"]));
    }

    #[test]
    fn test_701_advisor() {
        let doc = forward(vec![DataField::blank("701")
            .subfield('a', "Rossi, Mario")
            .subfield('g', "PhD")
            .subfield('x', "1000")
            .subfield('y', "1")]);
        assert_eq!(
            doc["advisors"],
            json!([{
                "curated_relation": true,
                "degree_type": "phd",
                "name": "Rossi, Mario",
                "record": {"$ref": "http://localhost:5000/api/authors/1000"}
            }])
        );
    }

    #[test]
    fn test_name_inverse_emits_variants_after_name() {
        let mut doc = Document::new();
        doc.insert("name".into(), json!({"value": "Smith, John", "name_variants": ["Smith, J."]}));
        doc.insert("status".into(), json!("active"));

        let record = translate_inverse(RecordType::Authors, &doc, &TranslationEnv::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            record.data_fields,
            vec![
                DataField::blank("100").subfield('a', "Smith, John").subfield('g', "active"),
                DataField::blank("400").subfield('a', "Smith, J."),
            ]
        );
    }
}
