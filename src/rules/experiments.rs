//! Experiments (and accelerators, collaborations) records

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::env::TranslationEnv;
use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::{Document, RecordType};
use crate::utils::refs::get_recid_from_ref;
use crate::utils::text::{all, first, force_list, get_str, get_strs};

use super::common::{self, object, text};
use super::{conversion_error, pat, Cardinality, Context, Contribution, Entry, RuleSet};

/// INSPIRE experiment classification, keyed by its numeric code
const EXPERIMENT_CATEGORIES: &[(&str, &str)] = &[
    ("1", "Collider Experiments"),
    ("1.1", "Collider Experiments|Hadrons"),
    ("1.1.1", "Collider Experiments|Hadrons|p anti-p"),
    ("1.1.2", "Collider Experiments|Hadrons|p p"),
    ("1.2", "Collider Experiments|e+ e-"),
    ("1.3", "Collider Experiments|e p"),
    ("1.4", "Collider Experiments|Heavy Flavor Factory"),
    ("1.5", "Collider Experiments|Heavy ion"),
    ("1.6", "Collider Experiments|Detector development"),
    ("2", "Fixed Target Experiments"),
    ("2.1", "Fixed Target Experiments|High-momentum transfer"),
    ("2.2", "Fixed Target Experiments|Hadron Spectroscopy"),
    ("2.3", "Fixed Target Experiments|Deep inelastic scattering"),
    ("2.4", "Fixed Target Experiments|Drell-Yan/Dilepton production"),
    ("2.5", "Fixed Target Experiments|Flavor physics"),
    ("2.6", "Fixed Target Experiments|Lepton precision experiments"),
    ("2.7", "Fixed Target Experiments|Neutron/proton precision experiments"),
    ("3", "Neutrino (flavor) experiments"),
    ("3.1", "Neutrino (flavor) experiments|Accelerator"),
    ("3.1.1", "Neutrino (flavor) experiments|Accelerator|short-baseline"),
    ("3.1.2", "Neutrino (flavor) experiments|Accelerator|long-baseline"),
    ("3.2", "Neutrino (flavor) experiments|Reactor"),
    ("3.2.1", "Neutrino (flavor) experiments|Reactor|ultra-short-baseline"),
    ("3.2.2", "Neutrino (flavor) experiments|Reactor|longer baselines"),
    ("3.3", "Neutrino (flavor) experiments|Non terrestrial"),
    ("3.3.1", "Neutrino (flavor) experiments|Non terrestrial|Atmospheric"),
    ("3.3.2", "Neutrino (flavor) experiments|Non terrestrial|Solar"),
    ("3.3.3", "Neutrino (flavor) experiments|Non terrestrial|Cosmic"),
    ("3.4", "Neutrino (flavor) experiments|Neutrinoless double beta decay"),
    ("3.5", "Neutrino (flavor) experiments|Neutrino mass"),
    ("4", "Dark matter search experiments"),
    ("4.1", "Dark matter search experiments|Non-accelerator"),
    ("4.2", "Dark matter search experiments|Axion search experiments"),
    ("4.3", "Dark matter search experiments|Dark Forces"),
    ("5", "Cosmic ray/Gamma ray experiments"),
    ("5.1", "Cosmic ray/Gamma ray experiments|Ground array"),
    ("5.2", "Cosmic ray/Gamma ray experiments|Cerenkov array"),
    ("5.3", "Cosmic ray/Gamma ray experiments|Satellite"),
    ("5.4", "Cosmic ray/Gamma ray experiments|Balloon"),
    ("6", "Other Rare-process/exotic experiments"),
    ("6.1", "Other Rare-process/exotic experiments|Proton decay"),
    ("6.2", "Other Rare-process/exotic experiments|Modified gravity and space-time"),
    ("6.3", "Other Rare-process/exotic experiments|Magnetic monopoles"),
    ("6.4", "Other Rare-process/exotic experiments|Fractionally charged particles"),
    ("7", "Accelerator Test Facility Experiments"),
    ("7.1", "Accelerator Test Facility Experiments|Electron and positron beams"),
    ("7.2", "Accelerator Test Facility Experiments|Muon beams"),
    ("7.3", "Accelerator Test Facility Experiments|Proton beams"),
    ("7.4", "Accelerator Test Facility Experiments|Neutrino beams"),
    ("8", "Astronomy experiments"),
    ("8.1", "Astronomy experiments|CMB"),
    ("8.2", "Astronomy experiments|Survey"),
    ("8.3", "Astronomy experiments|Supernovae"),
    ("8.4", "Astronomy experiments|Gravitational waves"),
    ("8.5", "Astronomy experiments|Gravitational lensing/Dark matter"),
    ("9", "Non-experimental"),
    ("9.1", "Non-experimental|Data Analysis"),
    ("9.2", "Non-experimental|Simulation tools"),
    ("9.2.1", "Non-experimental|Simulation tools|Detector Simulation"),
    ("9.2.2", "Non-experimental|Simulation tools|Event Simulation"),
    ("9.3", "Non-experimental|Parton Distribution Fits"),
    ("9.4", "Non-experimental|Lattice Gauge Theory"),
    ("9.5", "Non-experimental|Neutrino Physics"),
];

static CATEGORY_BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| EXPERIMENT_CATEGORIES.iter().copied().collect());

static CODE_BY_CATEGORY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    EXPERIMENT_CATEGORIES
        .iter()
        .map(|(code, category)| (*category, *code))
        .collect()
});

/// `980/a` values mapped to `project_type`
const PROJECT_TYPES: &[(&str, &str)] = &[
    ("ACCELERATOR", "accelerator"),
    ("COLLABORATION", "collaboration"),
];

const DATES: &[(char, &str)] = &[
    ('q', "date_proposed"),
    ('r', "date_approved"),
    ('s', "date_started"),
    ('t', "date_completed"),
    ('c', "date_cancelled"),
];

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Experiments)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("046"), "dates", Cardinality::Scalar, dates)
        .rule(pat("119"), "legacy_name", Cardinality::Scalar, experiment_names)
        .rule(pat("245"), "long_name", Cardinality::Scalar, long_name)
        .rule(pat("372"), "inspire_classification", Cardinality::List, inspire_classification)
        .rule(pat("419"), "name_variants", Cardinality::ListExtend, name_variants)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("510"), "related_records", Cardinality::List, related_record)
        .rule(pat("520"), "description", Cardinality::Joined("\n"), description)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("710"), "collaboration", Cardinality::Mapping, collaboration)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "collections", Cardinality::List, collections)
        .post(curated_collaboration)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("date_proposed", date_proposed_inverse)
        .inverse("date_approved", date_approved_inverse)
        .inverse("date_started", date_started_inverse)
        .inverse("date_completed", date_completed_inverse)
        .inverse("date_cancelled", date_cancelled_inverse)
        .inverse("legacy_name", legacy_name_inverse)
        .inverse("accelerator", accelerator_inverse)
        .inverse("experiment", experiment_inverse)
        .inverse("institutions", institutions_inverse)
        .inverse("long_name", long_name_inverse)
        .inverse("inspire_classification", inspire_classification_inverse)
        .inverse("name_variants", name_variants_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("related_records", related_records_inverse)
        .inverse("description", description_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
        .inverse("collaboration", collaboration_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("core", common::core_inverse)
        .inverse("project_type", project_type_inverse)
        .inverse("deleted", common::deleted_inverse)
        .inverse("$schema", collection_inverse)
        .build()
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

fn dates(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(DATES
        .iter()
        .filter_map(|(code, key)| common::date_entry(field, *code, key))
        .collect::<Vec<_>>()
        .into())
}

/// 119: legacy name, accelerator, experiment and host institution
fn experiment_names(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = Vec::new();

    if let Some(legacy_name) = first(field, 'a') {
        entries.push(Entry::scalar("legacy_name", json!(legacy_name)));
    }
    if let Some(accelerator) = first(field, 'b') {
        entries.push(Entry::merge("accelerator", json!({ "value": accelerator })));
    }
    if let Some(experiment) = common::object_opt([
        ("short_name", text(first(field, 'c'))),
        ("value", text(first(field, 'd'))),
    ]) {
        entries.push(Entry::merge("experiment", experiment));
    }

    let record = ctx.record_ref(&field.tag, RecordType::Institutions, first(field, 'z').as_deref());
    if let Some(institution) = common::object_opt([
        ("curated_relation", record.as_ref().map(|_| json!(true))),
        ("record", record),
        ("value", text(first(field, 'u'))),
    ]) {
        entries.push(Entry::append("institutions", institution));
    }

    Ok(entries.into())
}

fn long_name(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(text(first(field, 'a')).into())
}

/// 372: experiment classification; only numeric INSPIRE codes are meaningful
fn inspire_classification(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(code) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    if !all(field, '9').iter().any(|source| source.eq_ignore_ascii_case("INSPIRE")) {
        tracing::debug!("Field 372: ignoring classification {:?} not sourced from INSPIRE", code);
        return Ok(Contribution::Nothing);
    }
    if !code.chars().all(|c| c.is_ascii_digit() || c == '.') {
        tracing::debug!("Field 372: ignoring non-numeric classification {:?}", code);
        return Ok(Contribution::Nothing);
    }
    match CATEGORY_BY_CODE.get(code.trim_end_matches('.')) {
        Some(category) => Ok(json!(category).into()),
        None => Err(conversion_error(field, format!("unknown experiment category {}", code))),
    }
}

fn name_variants(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let variants = all(field, 'a');
    if variants.is_empty() {
        return Ok(Contribution::Nothing);
    }
    Ok(json!(variants).into())
}

fn related_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    common::related_record(field, ctx, RecordType::Experiments)
}

fn description(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(text(first(field, 'a')).into())
}

/// 710: the collaboration running the experiment
fn collaboration(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let record = ctx.record_ref(&field.tag, RecordType::Experiments, first(field, '0').as_deref());
    let subgroups = all(field, 'q');
    let value = first(field, 'g');
    if value.is_none() && subgroups.is_empty() && record.is_none() {
        return Ok(Contribution::Nothing);
    }

    Ok(object([
        ("curated_relation", Some(json!(record.is_some()))),
        ("record", record),
        ("subgroup_names", (!subgroups.is_empty()).then(|| json!(subgroups))),
        ("value", text(value)),
    ])
    .into())
}

/// A merged collaboration is curated as soon as any 710 linked a record
fn curated_collaboration(doc: &mut Document, _env: &TranslationEnv) {
    if let Some(Value::Object(collaboration)) = doc.get_mut("collaboration") {
        let curated = collaboration.contains_key("record");
        collaboration.insert("curated_relation".to_string(), json!(curated));
    }
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Experiments))
}

fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = common::core_and_deleted(field);
    for collection in common::collections(field) {
        if let Some((_, project_type)) = PROJECT_TYPES.iter().find(|(name, _)| *name == collection) {
            entries.push(Entry::append("project_type", json!(project_type)));
        }
    }
    Ok(entries.into())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn date_field(code: char, value: &Value) -> Vec<DataField> {
    value
        .as_str()
        .map(|date| vec![DataField::blank("046").subfield(code, date)])
        .unwrap_or_default()
}

fn date_proposed_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(date_field('q', value))
}

fn date_approved_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(date_field('r', value))
}

fn date_started_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(date_field('s', value))
}

fn date_completed_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(date_field('t', value))
}

fn date_cancelled_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(date_field('c', value))
}

fn legacy_name_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|name| vec![DataField::blank("119").subfield('a', name)])
        .unwrap_or_default())
}

fn accelerator_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(get_str(value, "value")
        .map(|name| vec![DataField::blank("119").subfield('b', name)])
        .unwrap_or_default())
}

fn experiment_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    let field = DataField::blank("119")
        .subfield_opt('c', get_str(value, "short_name"))
        .subfield_opt('d', get_str(value, "value"));
    Ok(vec![field])
}

fn institutions_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .map(|institution| {
            let recid = institution.get("record").and_then(get_recid_from_ref);
            DataField::blank("119")
                .subfield_opt('u', get_str(institution, "value"))
                .subfield_opt('z', recid.map(|id| id.to_string()))
        })
        .collect())
}

fn long_name_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|name| vec![DataField::blank("245").subfield('a', name)])
        .unwrap_or_default())
}

fn inspire_classification_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .filter_map(|category| {
            let code = CODE_BY_CATEGORY.get(category)?;
            Some(DataField::blank("372").subfield('a', *code).subfield('9', "INSPIRE"))
        })
        .collect())
}

fn name_variants_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .map(|variant| DataField::blank("419").subfield('a', variant))
        .collect())
}

fn related_records_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::related_records_inverse("510", value))
}

fn description_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|description| {
            description
                .split('\n')
                .filter(|line| !line.trim().is_empty())
                .map(|line| DataField::blank("520").subfield('a', line))
                .collect()
        })
        .unwrap_or_default())
}

fn collaboration_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    let recid = value.get("record").and_then(get_recid_from_ref);
    let mut field = DataField::blank("710").subfield_opt('g', get_str(value, "value"));
    for subgroup in get_strs(value, "subgroup_names") {
        field.add_subfield('q', subgroup);
    }
    Ok(vec![field.subfield_opt('0', recid.map(|id| id.to_string()))])
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn project_type_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .filter_map(|project_type| {
            let (collection, _) = PROJECT_TYPES.iter().find(|(_, name)| *name == project_type)?;
            Some(DataField::blank("980").subfield('a', *collection))
        })
        .collect())
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("EXPERIMENT"))
}
