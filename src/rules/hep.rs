//! Literature (HEP) records

use serde_json::{json, Value};

use crate::env::TranslationEnv;
use crate::error::FieldResult;
use crate::marc::DataField;
use crate::models::{Document, RecordType};
use crate::utils::arxiv::{classify_field, normalize_arxiv_category};
use crate::utils::isbn::clean_isbn;
use crate::utils::refs::get_recid_from_ref;
use crate::utils::text::{all, dedupe_list, first, force_list, get_str, get_strs};

use super::common::{self, object, text, AUTOMATIC_KEYWORDS};
use super::hepnames::{author_id, author_id_inverse};
use super::{conversion_error, pat, Cardinality, Context, Contribution, Entry, RuleSet};

/// `695/e` codes of the energy range vocabulary
const ENERGY_RANGES: &[(&str, &str)] = &[
    ("1", "0-3 GeV"),
    ("2", "3-10 GeV"),
    ("3", "10-30 GeV"),
    ("4", "30-100 GeV"),
    ("5", "100-300 GeV"),
    ("6", "300-1000 GeV"),
    ("7", "1-10 TeV"),
    ("8", "10-100 TeV"),
    ("9", ">100 TeV"),
];

/// Controlled vocabularies whose keywords live in 695
const CONTROLLED_SCHEMAS: &[&str] = &["INSPIRE", "PACS", "PDG"];

/// `980/a` document types
const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("ACTIVITYREPORT", "activity report"),
    ("BOOK", "book"),
    ("BOOKCHAPTER", "book chapter"),
    ("CONFERENCEPAPER", "conference paper"),
    ("NOTE", "note"),
    ("PROCEEDINGS", "proceedings"),
    ("REPORT", "report"),
    ("THESIS", "thesis"),
];

/// `980/a` publication types
const PUBLICATION_TYPES: &[(&str, &str)] = &[
    ("INTRODUCTORY", "introductory"),
    ("LECTURES", "lectures"),
    ("REVIEW", "review"),
];

/// Language names found in 041 and their ISO 639-1 codes
const LANGUAGES: &[(&str, &str)] = &[
    ("Arabic", "ar"),
    ("Bulgarian", "bg"),
    ("Catalan", "ca"),
    ("Chinese", "zh"),
    ("Croatian", "hr"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hebrew", "he"),
    ("Hungarian", "hu"),
    ("Indonesian", "id"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Latin", "la"),
    ("Norwegian", "no"),
    ("Persian", "fa"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Romanian", "ro"),
    ("Russian", "ru"),
    ("Serbian", "sr"),
    ("Slovak", "sk"),
    ("Spanish", "es"),
    ("Swedish", "sv"),
    ("Turkish", "tr"),
    ("Ukrainian", "uk"),
];

/// 245 titles collect here until they are put ahead of the 246 ones
const MAIN_TITLES: &str = "_main_titles";

pub fn rules() -> RuleSet {
    RuleSet::builder(RecordType::Hep)
        .control("001", "control_number", Cardinality::Scalar, common::control_number)
        .rule(pat("020"), "isbns", Cardinality::List, isbn)
        .rule(pat("024").ind1("7 ").ind2(" "), "persistent_identifiers", Cardinality::List, persistent_identifier)
        .rule(pat("035"), "external_system_identifiers", Cardinality::List, common::external_system_identifier)
        .rule(pat("037"), "report_numbers", Cardinality::List, report_number)
        .rule(pat("041"), "languages", Cardinality::ListExtend, languages)
        .rule(pat("100"), "authors", Cardinality::List, author)
        .rule(pat("210"), "rpp", Cardinality::Scalar, rpp)
        .rule(pat("242"), "title_translations", Cardinality::List, title_translation)
        .rule(pat("245"), MAIN_TITLES, Cardinality::List, title)
        .rule(pat("246"), "titles", Cardinality::List, title)
        .rule(pat("250"), "editions", Cardinality::List, edition)
        .rule(pat("260"), "imprints", Cardinality::List, imprint)
        .rule(pat("269"), "preprint_date", Cardinality::Scalar, preprint_date)
        .rule(pat("300"), "number_of_pages", Cardinality::Scalar, number_of_pages)
        .rule(pat("490"), "book_series", Cardinality::List, book_series)
        .rule(pat("500"), "public_notes", Cardinality::List, common::public_note)
        .rule(pat("520"), "abstracts", Cardinality::List, abstract_)
        .rule(pat("540"), "license", Cardinality::List, license)
        .rule(pat("542"), "copyright", Cardinality::List, copyright)
        .rule(pat("595"), "_private_notes", Cardinality::List, common::private_note)
        .rule(pat("650").ind1("1").ind2("7"), "inspire_categories", Cardinality::List, inspire_category)
        .rule(pat("653").ind1("1 "), "keywords", Cardinality::List, free_keyword)
        .rule(pat("693"), "accelerator_experiments", Cardinality::List, accelerator_experiment)
        .rule(pat("695"), "keywords", Cardinality::List, controlled_keyword)
        .rule(pat("700"), "authors", Cardinality::List, author)
        .rule(pat("710"), "collaborations", Cardinality::List, collaborations)
        .rule(pat("773"), "publication_info", Cardinality::List, publication_info)
        .rule(pat("856").ind1("4 "), "urls", Cardinality::List, common::url)
        .rule(pat("970"), "new_record", Cardinality::Scalar, new_record)
        .rule(pat("980"), "document_type", Cardinality::List, collections)
        .rule(pat("981"), "deleted_records", Cardinality::List, deleted_record)
        .post(main_titles_first)
        .post(default_document_type)
        .post(dedupe_lists)
        .post(common::strip_empty_values)
        .control_inverse("control_number", "001", common::control_number_inverse)
        .inverse("isbns", isbns_inverse)
        .inverse("dois", dois_inverse)
        .inverse("persistent_identifiers", persistent_identifiers_inverse)
        .inverse("external_system_identifiers", common::external_system_identifiers_inverse)
        .inverse("arxiv_eprints", arxiv_eprints_inverse)
        .inverse("report_numbers", report_numbers_inverse)
        .inverse("languages", languages_inverse)
        .inverse("authors", authors_inverse)
        .inverse("rpp", rpp_inverse)
        .inverse("title_translations", title_translations_inverse)
        .inverse("titles", titles_inverse)
        .inverse("editions", editions_inverse)
        .inverse("imprints", imprints_inverse)
        .inverse("preprint_date", preprint_date_inverse)
        .inverse("number_of_pages", number_of_pages_inverse)
        .inverse("book_series", book_series_inverse)
        .inverse("public_notes", common::public_notes_inverse)
        .inverse("abstracts", abstracts_inverse)
        .inverse("license", license_inverse)
        .inverse("copyright", copyright_inverse)
        .inverse("_private_notes", common::private_notes_inverse)
        .inverse("inspire_categories", inspire_categories_inverse)
        .inverse("keywords", keywords_inverse)
        .inverse("accelerator_experiments", accelerator_experiments_inverse)
        .inverse("energy_ranges", energy_ranges_inverse)
        .inverse("collaborations", collaborations_inverse)
        .inverse("publication_info", publication_info_inverse)
        .inverse("urls", common::urls_inverse)
        .inverse("new_record", new_record_inverse)
        .inverse("$schema", collection_inverse)
        .inverse("core", common::core_inverse)
        .inverse("citeable", citeable_inverse)
        .inverse("refereed", refereed_inverse)
        .inverse("document_type", document_type_inverse)
        .inverse("publication_type", publication_type_inverse)
        .inverse("deleted", common::deleted_inverse)
        .inverse("deleted_records", deleted_records_inverse)
        .build()
}

// ---------------------------------------------------------------------------
// Identifiers (0xx)
// ---------------------------------------------------------------------------

fn isbn(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(raw) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let Some(isbn) = clean_isbn(&raw) else {
        tracing::warn!("Field 020: ignoring invalid ISBN {:?}", raw);
        return Ok(Contribution::Nothing);
    };
    Ok(object([
        ("medium", text(first(field, 'b').map(|b| b.to_lowercase()))),
        ("value", Some(json!(isbn))),
    ])
    .into())
}

/// 024: DOIs go to `dois`, anything else to `persistent_identifiers`
fn persistent_identifier(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let schema = first(field, '2');
    let source = text(first(field, '9'));

    match schema.as_deref() {
        Some(s) if s.eq_ignore_ascii_case("doi") => Ok(vec![Entry::append(
            "dois",
            object([("source", source), ("value", Some(json!(value)))]),
        )]
        .into()),
        Some(s) => Ok(object([
            ("schema", Some(json!(s.to_uppercase()))),
            ("source", source),
            ("value", Some(json!(value))),
        ])
        .into()),
        None => Err(conversion_error(field, "identifier without a schema")),
    }
}

/// 037: arXiv eprints and report numbers
fn report_number(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let source = first(field, '9');
    let is_arxiv = source.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("arxiv"));

    if let Some(value) = first(field, 'a') {
        if is_arxiv || value.starts_with("arXiv:") {
            let categories: Vec<String> = all(field, 'c').iter().map(|c| normalize_arxiv_category(c)).collect();
            let eprint = object([
                ("categories", (!categories.is_empty()).then(|| json!(categories))),
                ("value", Some(json!(value.trim_start_matches("arXiv:")))),
            ]);
            return Ok(vec![Entry::append("arxiv_eprints", eprint)].into());
        }
        return Ok(object([("source", text(source)), ("value", Some(json!(value)))]).into());
    }

    // Hidden report numbers live in `z`
    Ok(first(field, 'z')
        .map(|hidden| {
            object([
                ("hidden", Some(json!(true))),
                ("source", text(source)),
                ("value", Some(json!(hidden))),
            ])
        })
        .into())
}

fn languages(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut codes = Vec::new();
    for raw in all(field, 'a') {
        match language_code(&raw) {
            Some(code) => codes.push(code),
            None => tracing::warn!("Field 041: ignoring unknown language {:?}", raw),
        }
    }
    if codes.is_empty() {
        return Ok(Contribution::Nothing);
    }
    Ok(json!(codes).into())
}

fn language_code(raw: &str) -> Option<String> {
    if let Some((_, code)) = LANGUAGES.iter().find(|(name, _)| name.eq_ignore_ascii_case(raw)) {
        return Some((*code).to_string());
    }
    let code = raw.to_lowercase();
    LANGUAGES
        .iter()
        .any(|(_, known)| *known == code)
        .then_some(code)
}

// ---------------------------------------------------------------------------
// Authors (100/700)
// ---------------------------------------------------------------------------

fn author(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(full_name) = first(field, 'a') else {
        return Err(conversion_error(field, "author without a name"));
    };

    let record = ctx.record_ref(&field.tag, RecordType::Authors, first(field, 'x').as_deref());
    let affiliations: Vec<Value> = all(field, 'u').into_iter().map(|u| json!({ "value": u })).collect();
    let raw_affiliations: Vec<Value> = all(field, 'v').into_iter().map(|v| json!({ "value": v })).collect();
    let emails = all(field, 'm');
    let ids: Vec<Value> = ['i', 'j', 'w']
        .into_iter()
        .flat_map(|code| all(field, code))
        .filter_map(|raw| {
            let id = author_id(&raw);
            if id.is_none() {
                tracing::warn!("Field {}: ignoring unrecognized author id {:?}", field.tag, raw);
            }
            id
        })
        .collect();
    let roles: Vec<&str> = all(field, 'e')
        .iter()
        .filter_map(|role| match role.to_lowercase().trim_end_matches('.') {
            "ed" | "editor" => Some("editor"),
            "dir" | "supervisor" => Some("supervisor"),
            _ => None,
        })
        .collect();

    Ok(object([
        ("affiliations", (!affiliations.is_empty()).then(|| json!(affiliations))),
        ("curated_relation", first(field, 'y').map(|y| json!(y == "1"))),
        ("emails", (!emails.is_empty()).then(|| json!(emails))),
        ("full_name", Some(json!(full_name))),
        ("ids", (!ids.is_empty()).then(|| json!(ids))),
        ("inspire_roles", (!roles.is_empty()).then(|| json!(roles))),
        ("raw_affiliations", (!raw_affiliations.is_empty()).then(|| json!(raw_affiliations))),
        ("record", record),
    ])
    .into())
}

// ---------------------------------------------------------------------------
// Titles and publication data (2xx-5xx)
// ---------------------------------------------------------------------------

/// 210: review of particle physics marker
fn rpp(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let is_rpp = all(field, 'a')
        .iter()
        .any(|a| a.eq_ignore_ascii_case("rpp") || a.eq_ignore_ascii_case("rpp section"));
    Ok(is_rpp.then(|| json!(true)).into())
}

fn title_translation(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(title) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let language = ctx.env.language_detector.detect(&title);
    Ok(object([
        ("language", language.map(Value::String)),
        ("subtitle", text(first(field, 'b'))),
        ("title", Some(json!(title))),
    ])
    .into())
}

fn title(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(title) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([
        ("source", text(first(field, '9'))),
        ("subtitle", text(first(field, 'b'))),
        ("title", Some(json!(title))),
    ])
    .into())
}

fn edition(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(text(first(field, 'a')).into())
}

fn imprint(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::object_opt([
        ("date", common::date_value(field, 'c')),
        ("place", text(first(field, 'a'))),
        ("publisher", text(first(field, 'b'))),
    ])
    .into())
}

fn preprint_date(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::date_value(field, 'c').into())
}

fn number_of_pages(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(raw) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(pages) if pages > 0 => Ok(json!(pages).into()),
        _ => Err(conversion_error(field, format!("not a page count: {:?}", raw))),
    }
}

fn book_series(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(title) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("title", Some(json!(title))), ("volume", text(first(field, 'v')))]).into())
}

fn abstract_(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(value) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([("source", text(first(field, '9'))), ("value", Some(json!(value)))]).into())
}

fn license(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::object_opt([
        ("imposing", text(first(field, 'b'))),
        ("license", text(first(field, 'a'))),
        ("material", text(first(field, '3').map(|m| m.to_lowercase()))),
        ("url", text(first(field, 'u'))),
    ])
    .into())
}

fn copyright(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let year = first(field, 'g').and_then(|g| g.parse::<u32>().ok());
    Ok(common::object_opt([
        ("holder", text(first(field, 'd'))),
        ("material", text(first(field, '3').map(|m| m.to_lowercase()))),
        ("statement", text(first(field, 'f'))),
        ("url", text(first(field, 'u'))),
        ("year", year.map(|y| json!(y))),
    ])
    .into())
}

// ---------------------------------------------------------------------------
// Subjects (65x-69x)
// ---------------------------------------------------------------------------

fn inspire_category(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let Some(raw) = first(field, 'a') else {
        return Ok(Contribution::Nothing);
    };
    Ok(object([
        ("source", text(first(field, '9'))),
        ("term", classify_field(&raw, &ctx.env.category_mapping).map(Value::String)),
    ])
    .into())
}

fn free_keyword(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::free_keyword(field).into())
}

fn accelerator_experiment(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let legacy_name = first(field, 'e');
    if legacy_name.as_deref() == Some("-") {
        return Ok(Contribution::Nothing);
    }
    let record = ctx.record_ref(&field.tag, RecordType::Experiments, first(field, '0').as_deref());
    Ok(common::object_opt([
        ("accelerator", text(first(field, 'a'))),
        ("curated_relation", record.as_ref().map(|_| json!(true))),
        ("legacy_name", text(legacy_name)),
        ("record", record),
    ])
    .into())
}

/// 695: controlled keywords and energy ranges
fn controlled_keyword(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = Vec::new();

    if let Some(value) = first(field, 'a').filter(|a| a != AUTOMATIC_KEYWORDS) {
        let source = first(field, '9').map(|s| match s.as_str() {
            "bibclassify" => "classifier".to_string(),
            _ => s,
        });
        entries.push(Entry::append(
            "keywords",
            object([
                ("schema", text(first(field, '2').map(|s| common::keyword_schema(&s)))),
                ("source", text(source)),
                ("value", Some(json!(value))),
            ]),
        ));
    }

    for code in all(field, 'e') {
        match ENERGY_RANGES.iter().find(|(key, _)| *key == code) {
            Some((_, range)) => entries.push(Entry::append("energy_ranges", json!(range))),
            None => tracing::warn!("Field 695: ignoring unknown energy range {:?}", code),
        }
    }

    Ok(entries.into())
}

fn collaborations(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let record = ctx.record_ref(&field.tag, RecordType::Experiments, first(field, '0').as_deref());
    let names = all(field, 'g');
    let Some((last, rest)) = names.split_last() else {
        return Ok(Contribution::Nothing);
    };
    // A record id applies to the last collaboration named in the field
    let mut entries: Vec<Entry> = rest
        .iter()
        .map(|name| Entry::append("collaborations", json!({ "value": name })))
        .collect();
    entries.push(Entry::append(
        "collaborations",
        object([("record", record), ("value", Some(json!(last)))]),
    ));
    Ok(entries.into())
}

// ---------------------------------------------------------------------------
// Linking (7xx-9xx)
// ---------------------------------------------------------------------------

fn publication_info(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    let (page_start, page_end, artid) = match first(field, 'c') {
        Some(pages) => match pages.split_once('-') {
            Some((start, end)) => (Some(start.trim().to_string()), Some(end.trim().to_string()), None),
            None if pages.chars().all(|c| c.is_ascii_digit()) => (Some(pages), None, None),
            None => (None, None, Some(pages)),
        },
        None => (None, None, None),
    };
    let year = first(field, 'y').and_then(|y| y.parse::<u32>().ok());
    let parent = ctx.record_ref(&field.tag, RecordType::Hep, first(field, '0').as_deref());

    Ok(common::object_opt([
        ("artid", text(artid)),
        ("cnum", text(first(field, 'w'))),
        ("journal_issue", text(first(field, 'n'))),
        ("journal_title", text(first(field, 'p'))),
        ("journal_volume", text(first(field, 'v'))),
        ("material", text(first(field, 'm').map(|m| m.to_lowercase()))),
        ("page_end", text(page_end)),
        ("page_start", text(page_start)),
        ("parent_record", parent),
        ("pubinfo_freetext", text(first(field, 'x'))),
        ("year", year.map(|y| json!(y))),
    ])
    .into())
}

fn new_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(common::new_record(field, ctx, RecordType::Hep))
}

/// 980: document and publication types plus record flags
fn collections(field: &DataField, _ctx: &Context<'_>) -> FieldResult<Contribution> {
    let mut entries = common::core_and_deleted(field);
    for collection in common::collections(field) {
        if let Some((_, document_type)) = DOCUMENT_TYPES.iter().find(|(name, _)| *name == collection) {
            entries.push(Entry::append("document_type", json!(document_type)));
        } else if let Some((_, publication_type)) = PUBLICATION_TYPES.iter().find(|(name, _)| *name == collection) {
            entries.push(Entry::append("publication_type", json!(publication_type)));
        } else if collection == "CITEABLE" {
            entries.push(Entry::scalar("citeable", json!(true)));
        } else if collection == "PUBLISHED" {
            entries.push(Entry::scalar("refereed", json!(true)));
        }
    }
    Ok(entries.into())
}

fn deleted_record(field: &DataField, ctx: &Context<'_>) -> FieldResult<Contribution> {
    Ok(ctx.record_ref(&field.tag, RecordType::Hep, first(field, 'a').as_deref()).into())
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Records without an explicit document type are articles
/// 245 titles come before 246 titles, whatever the source order
fn main_titles_first(doc: &mut Document, _env: &TranslationEnv) {
    let main = match doc.get_mut(MAIN_TITLES).map(Value::take) {
        Some(Value::Array(main)) => main,
        _ => return,
    };
    let others = match doc.get_mut("titles").map(Value::take) {
        Some(Value::Array(others)) => others,
        _ => Vec::new(),
    };
    doc.insert("titles".to_string(), Value::Array(main.into_iter().chain(others).collect()));
}

fn default_document_type(doc: &mut Document, _env: &TranslationEnv) {
    if !doc.contains_key("document_type") {
        doc.insert("document_type".to_string(), json!(["article"]));
    }
}

/// Remove repeated items from every top-level list
fn dedupe_lists(doc: &mut Document, _env: &TranslationEnv) {
    for value in doc.values_mut() {
        if let Value::Array(items) = value {
            *items = dedupe_list(std::mem::take(items));
        }
    }
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

fn each<F>(value: &Value, f: F) -> FieldResult<Vec<DataField>>
where
    F: Fn(&Value) -> Option<DataField>,
{
    Ok(force_list(value).into_iter().filter_map(f).collect())
}

fn isbns_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |isbn| {
        Some(
            DataField::blank("020")
                .subfield('a', get_str(isbn, "value")?)
                .subfield_opt('b', get_str(isbn, "medium")),
        )
    })
}

fn dois_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |doi| {
        Some(
            DataField::with_indicators("024", '7', ' ')
                .subfield('a', get_str(doi, "value")?)
                .subfield('2', "DOI")
                .subfield_opt('9', get_str(doi, "source")),
        )
    })
}

fn persistent_identifiers_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |id| {
        Some(
            DataField::with_indicators("024", '7', ' ')
                .subfield('a', get_str(id, "value")?)
                .subfield('2', get_str(id, "schema")?)
                .subfield_opt('9', get_str(id, "source")),
        )
    })
}

fn arxiv_eprints_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |eprint| {
        let id = get_str(eprint, "value")?;
        // New-style identifiers carry the prefix, old-style ones don't
        let id = if id.starts_with(|c: char| c.is_ascii_digit()) {
            format!("arXiv:{}", id)
        } else {
            id.to_string()
        };
        let mut field = DataField::blank("037").subfield('9', "arXiv").subfield('a', id);
        for category in get_strs(eprint, "categories") {
            field.add_subfield('c', category);
        }
        Some(field)
    })
}

fn report_numbers_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |report| {
        let number = get_str(report, "value")?;
        let code = if report.get("hidden").and_then(Value::as_bool) == Some(true) {
            'z'
        } else {
            'a'
        };
        Some(
            DataField::blank("037")
                .subfield_opt('9', get_str(report, "source"))
                .subfield(code, number),
        )
    })
}

fn languages_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .filter(|code| *code != "en")
        .map(|code| {
            let name = LANGUAGES
                .iter()
                .find(|(_, known)| *known == code)
                .map_or(code, |(name, _)| *name);
            DataField::blank("041").subfield('a', name)
        })
        .collect())
}

fn authors_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .enumerate()
        .map(|(position, author)| {
            let tag = if position == 0 { "100" } else { "700" };
            let mut field = DataField::blank(tag).subfield_opt('a', get_str(author, "full_name"));
            for role in get_strs(author, "inspire_roles") {
                match role {
                    "editor" => field.add_subfield('e', "ed."),
                    "supervisor" => field.add_subfield('e', "dir."),
                    _ => {}
                }
            }
            for id in author.get("ids").map(force_list).unwrap_or_default() {
                if let Some((code, value)) = author_id_inverse(id) {
                    field.add_subfield(code, value);
                }
            }
            for email in get_strs(author, "emails") {
                field.add_subfield('m', email);
            }
            for affiliation in author.get("affiliations").map(force_list).unwrap_or_default() {
                field = field.subfield_opt('u', get_str(affiliation, "value"));
            }
            for affiliation in author.get("raw_affiliations").map(force_list).unwrap_or_default() {
                field = field.subfield_opt('v', get_str(affiliation, "value"));
            }
            let recid = author.get("record").and_then(get_recid_from_ref);
            let curated = author.get("curated_relation").and_then(Value::as_bool);
            field
                .subfield_opt('x', recid.map(|id| id.to_string()))
                .subfield_opt('y', curated.map(|c| if c { "1" } else { "0" }))
        })
        .collect())
}

fn rpp_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::flag_inverse_tag(value, "210", 'a', "RPP"))
}

fn title_translations_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |title| {
        Some(
            DataField::blank("242")
                .subfield('a', get_str(title, "title")?)
                .subfield_opt('b', get_str(title, "subtitle")),
        )
    })
}

/// The first title is the main one (245), the others alternatives (246)
fn titles_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(force_list(value)
        .into_iter()
        .filter_map(|title| get_str(title, "title").map(|t| (title, t)))
        .enumerate()
        .map(|(position, (title, main))| {
            let tag = if position == 0 { "245" } else { "246" };
            DataField::blank(tag)
                .subfield('a', main)
                .subfield_opt('b', get_str(title, "subtitle"))
                .subfield_opt('9', get_str(title, "source"))
        })
        .collect())
}

fn editions_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .map(|edition| DataField::blank("250").subfield('a', edition))
        .collect())
}

fn imprints_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |imprint| {
        Some(
            DataField::blank("260")
                .subfield_opt('a', get_str(imprint, "place"))
                .subfield_opt('b', get_str(imprint, "publisher"))
                .subfield_opt('c', get_str(imprint, "date")),
        )
    })
}

fn preprint_date_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_str()
        .map(|date| vec![DataField::blank("269").subfield('c', date)])
        .unwrap_or_default())
}

fn number_of_pages_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(value
        .as_u64()
        .map(|pages| vec![DataField::blank("300").subfield('a', pages.to_string())])
        .unwrap_or_default())
}

fn book_series_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |series| {
        Some(
            DataField::blank("490")
                .subfield('a', get_str(series, "title")?)
                .subfield_opt('v', get_str(series, "volume")),
        )
    })
}

fn abstracts_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |abstract_| {
        Some(
            DataField::blank("520")
                .subfield('a', get_str(abstract_, "value")?)
                .subfield_opt('9', get_str(abstract_, "source")),
        )
    })
}

fn license_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |license| {
        Some(
            DataField::blank("540")
                .subfield_opt('a', get_str(license, "license"))
                .subfield_opt('b', get_str(license, "imposing"))
                .subfield_opt('u', get_str(license, "url"))
                .subfield_opt('3', get_str(license, "material")),
        )
    })
}

fn copyright_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |copyright| {
        let year = copyright.get("year").and_then(Value::as_u64);
        Some(
            DataField::blank("542")
                .subfield_opt('d', get_str(copyright, "holder"))
                .subfield_opt('f', get_str(copyright, "statement"))
                .subfield_opt('g', year.map(|y| y.to_string()))
                .subfield_opt('u', get_str(copyright, "url"))
                .subfield_opt('3', get_str(copyright, "material")),
        )
    })
}

fn inspire_categories_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |category| {
        Some(
            DataField::with_indicators("650", '1', '7')
                .subfield('a', get_str(category, "term")?)
                .subfield('2', "INSPIRE")
                .subfield_opt('9', get_str(category, "source")),
        )
    })
}

/// Controlled and classifier keywords go to 695, free keywords to 6531.
///
/// Classifier output is preceded by the automatic-keywords marker; keywords
/// from `magpie` are not exported.
fn keywords_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    let mut fields = Vec::new();
    let mut marker_emitted = false;

    for keyword in force_list(value) {
        let Some(text) = get_str(keyword, "value") else {
            continue;
        };
        let schema = get_str(keyword, "schema");
        let source = get_str(keyword, "source");
        if source == Some("magpie") {
            continue;
        }

        let from_classifier = source == Some("classifier");
        let controlled = schema.is_some_and(|s| CONTROLLED_SCHEMAS.contains(&s));
        if !from_classifier && !controlled {
            fields.extend(common::free_keyword_inverse(keyword));
            continue;
        }

        if from_classifier && !marker_emitted {
            fields.push(DataField::blank("695").subfield('a', AUTOMATIC_KEYWORDS).subfield('9', "bibclassify"));
            marker_emitted = true;
        }
        let source = if from_classifier { Some("bibclassify") } else { source };
        fields.push(
            DataField::blank("695")
                .subfield('a', text)
                .subfield('2', schema.unwrap_or("INSPIRE"))
                .subfield_opt('9', source),
        );
    }
    Ok(fields)
}

fn accelerator_experiments_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |experiment| {
        let recid = experiment.get("record").and_then(get_recid_from_ref);
        Some(
            DataField::blank("693")
                .subfield_opt('a', get_str(experiment, "accelerator"))
                .subfield_opt('e', get_str(experiment, "legacy_name"))
                .subfield_opt('0', recid.map(|id| id.to_string())),
        )
    })
}

fn energy_ranges_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::strings(value)
        .into_iter()
        .filter_map(|range| {
            let (code, _) = ENERGY_RANGES.iter().find(|(_, name)| *name == range)?;
            Some(DataField::blank("695").subfield('e', *code).subfield('2', "INSPIRE"))
        })
        .collect())
}

fn collaborations_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |collaboration| {
        let recid = collaboration.get("record").and_then(get_recid_from_ref);
        Some(
            DataField::blank("710")
                .subfield('g', get_str(collaboration, "value")?)
                .subfield_opt('0', recid.map(|id| id.to_string())),
        )
    })
}

fn publication_info_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |info| {
        let pages = match (get_str(info, "page_start"), get_str(info, "page_end")) {
            (Some(start), Some(end)) => Some(format!("{}-{}", start, end)),
            (Some(start), None) => Some(start.to_string()),
            _ => get_str(info, "artid").map(str::to_string),
        };
        let year = info.get("year").and_then(Value::as_u64);
        let parent = info.get("parent_record").and_then(get_recid_from_ref);
        Some(
            DataField::blank("773")
                .subfield_opt('p', get_str(info, "journal_title"))
                .subfield_opt('v', get_str(info, "journal_volume"))
                .subfield_opt('n', get_str(info, "journal_issue"))
                .subfield_opt('c', pages)
                .subfield_opt('y', year.map(|y| y.to_string()))
                .subfield_opt('w', get_str(info, "cnum"))
                .subfield_opt('m', get_str(info, "material"))
                .subfield_opt('x', get_str(info, "pubinfo_freetext"))
                .subfield_opt('0', parent.map(|id| id.to_string())),
        )
    })
}

fn new_record_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::new_record_inverse(value))
}

fn collection_inverse(_value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::collection_marker("HEP"))
}

fn citeable_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::flag_inverse(value, 'a', "Citeable"))
}

fn refereed_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(common::flag_inverse(value, 'a', "Published"))
}

fn document_type_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(type_markers(value, DOCUMENT_TYPES))
}

fn publication_type_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    Ok(type_markers(value, PUBLICATION_TYPES))
}

fn type_markers(value: &Value, table: &[(&'static str, &str)]) -> Vec<DataField> {
    common::strings(value)
        .into_iter()
        .filter_map(|name| {
            let (collection, _) = table.iter().find(|(_, known)| *known == name)?;
            Some(DataField::blank("980").subfield('a', *collection))
        })
        .collect()
}

fn deleted_records_inverse(value: &Value, _ctx: &Context<'_>) -> FieldResult<Vec<DataField>> {
    each(value, |reference| {
        let recid = get_recid_from_ref(reference)?;
        Some(DataField::blank("981").subfield('a', recid.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{translate_forward, translate_inverse};
    use crate::marc::Record;
    use crate::utils::lang::FixedLanguage;

    fn forward_with(env: &TranslationEnv, fields: Vec<DataField>) -> Document {
        let mut record = Record::new();
        for field in fields {
            record.push(field);
        }
        translate_forward(RecordType::Hep, &record, env).unwrap()
    }

    fn forward(fields: Vec<DataField>) -> Document {
        forward_with(&TranslationEnv::default(), fields)
    }

    fn inverse(doc: Document) -> Vec<DataField> {
        translate_inverse(RecordType::Hep, &doc, &TranslationEnv::default())
            .unwrap()
            .map(|record| record.data_fields)
            .unwrap_or_default()
    }

    fn doc_with(key: &str, value: Value) -> Document {
        let mut doc = Document::new();
        doc.insert(key.to_string(), value);
        doc
    }

    #[test]
    fn test_024_doi() {
        let doc = forward(vec![DataField::with_indicators("024", '7', ' ')
            .subfield('a', "10.17182/hepdata.77268.v1/t6")
            .subfield('2', "DOI")]);
        assert_eq!(doc["dois"], json!([{"value": "10.17182/hepdata.77268.v1/t6"}]));
        assert!(!doc.contains_key("persistent_identifiers"));
    }

    #[test]
    fn test_024_other_identifier() {
        let doc = forward(vec![DataField::with_indicators("024", '7', ' ')
            .subfield('a', "hdl:1234/5678")
            .subfield('2', "hdl")]);
        assert_eq!(doc["persistent_identifiers"], json!([{"schema": "HDL", "value": "hdl:1234/5678"}]));
    }

    #[test]
    fn test_020_invalid_isbn_is_dropped() {
        let doc = forward(vec![
            DataField::blank("020").subfield('a', "978-0-306-40615-7").subfield('b', "Print"),
            DataField::blank("020").subfield('a', "978-0-306-40615-8"),
        ]);
        assert_eq!(doc["isbns"], json!([{"medium": "print", "value": "9780306406157"}]));
    }

    #[test]
    fn test_037_arxiv_and_report_numbers() {
        let doc = forward(vec![
            DataField::blank("037")
                .subfield('9', "arXiv")
                .subfield('a', "arXiv:1501.00001")
                .subfield('c', "HEP-TH")
                .subfield('c', "funct-an"),
            DataField::blank("037").subfield('a', "CERN-TH-2015-001"),
            DataField::blank("037").subfield('z', "FERMILAB-PUB-15-001"),
        ]);
        assert_eq!(
            doc["arxiv_eprints"],
            json!([{"categories": ["hep-th", "math.FA"], "value": "1501.00001"}])
        );
        assert_eq!(
            doc["report_numbers"],
            json!([
                {"value": "CERN-TH-2015-001"},
                {"hidden": true, "value": "FERMILAB-PUB-15-001"}
            ])
        );
    }

    #[test]
    fn test_100_700_authors_in_order() {
        let doc = forward(vec![
            DataField::blank("100")
                .subfield('a', "Smith, John")
                .subfield('u', "CERN")
                .subfield('j', "ORCID:0000-0002-1825-0097")
                .subfield('x', "1000")
                .subfield('y', "1"),
            DataField::blank("700").subfield('a', "Doe, Jane").subfield('e', "ed."),
        ]);
        assert_eq!(
            doc["authors"],
            json!([
                {
                    "affiliations": [{"value": "CERN"}],
                    "curated_relation": true,
                    "full_name": "Smith, John",
                    "ids": [{"schema": "ORCID", "value": "0000-0002-1825-0097"}],
                    "record": {"$ref": "http://localhost:5000/api/authors/1000"}
                },
                {"full_name": "Doe, Jane", "inspire_roles": ["editor"]}
            ])
        );

        let fields = inverse(doc_with("authors", doc["authors"].clone()));
        assert_eq!(fields[0].tag, "100");
        assert_eq!(fields[0].get_subfield('j'), Some("ORCID:0000-0002-1825-0097"));
        assert_eq!(fields[1].tag, "700");
        assert_eq!(fields[1].get_subfield('e'), Some("ed."));
    }

    #[test]
    fn test_210_rpp_canonicalized_on_inverse() {
        let doc = forward(vec![DataField::blank("210").subfield('a', "RPP section")]);
        assert_eq!(doc["rpp"], json!(true));
        assert_eq!(inverse(doc_with("rpp", json!(true))), vec![DataField::blank("210").subfield('a', "RPP")]);
    }

    #[test]
    fn test_242_language_from_detector() {
        let env = TranslationEnv::default().with_language_detector(FixedLanguage("fr".to_string()));
        let doc = forward_with(&env, vec![DataField::blank("242").subfield('a', "Une théorie")]);
        assert_eq!(doc["title_translations"], json!([{"language": "fr", "title": "Une théorie"}]));
    }

    #[test]
    fn test_245_246_titles_round_trip() {
        let fields = vec![
            DataField::blank("245").subfield('a', "Main title").subfield('b', "and subtitle"),
            DataField::blank("246").subfield('a', "Other title"),
        ];
        let doc = forward(fields.clone());
        assert_eq!(
            doc["titles"],
            json!([{"subtitle": "and subtitle", "title": "Main title"}, {"title": "Other title"}])
        );
        assert_eq!(inverse(doc_with("titles", doc["titles"].clone())), fields);
    }

    #[test]
    fn test_245_is_primary_even_after_246() {
        let doc = forward(vec![
            DataField::blank("246").subfield('a', "Alt"),
            DataField::blank("245").subfield('a', "Main"),
            DataField::blank("246").subfield('a', "Other"),
        ]);
        assert_eq!(doc["titles"], json!([{"title": "Main"}, {"title": "Alt"}, {"title": "Other"}]));
        assert!(!doc.contains_key(MAIN_TITLES));

        assert_eq!(
            inverse(doc_with("titles", doc["titles"].clone())),
            vec![
                DataField::blank("245").subfield('a', "Main"),
                DataField::blank("246").subfield('a', "Alt"),
                DataField::blank("246").subfield('a', "Other"),
            ]
        );
    }

    #[test]
    fn test_520_keeps_paragraph_breaks() {
        let doc = forward(vec![DataField::blank("520").subfield('a', "First paragraph.\n\nSecond   paragraph.")]);
        assert_eq!(doc["abstracts"][0]["value"], "First paragraph.\n\nSecond   paragraph.");
    }

    #[test]
    fn test_260_269_dates_are_coerced() {
        let doc = forward(vec![
            DataField::blank("260").subfield('a', "Geneva").subfield('b', "CERN").subfield('c', "2004-02-30"),
            DataField::blank("269").subfield('c', "2004-13"),
        ]);
        assert_eq!(doc["imprints"], json!([{"date": "2004-02", "place": "Geneva", "publisher": "CERN"}]));
        assert_eq!(doc["preprint_date"], "2004");
    }

    #[test]
    fn test_65017_inspire_categories() {
        let doc = forward(vec![
            DataField::with_indicators("650", '1', '7').subfield('a', "hep-th").subfield('2', "arXiv"),
            DataField::with_indicators("650", '1', '7').subfield('a', "theory-hep").subfield('2', "INSPIRE"),
            DataField::with_indicators("650", '1', '7').subfield('a', "math.FA").subfield('2', "arXiv"),
        ]);
        // Duplicates are removed by the post-processing pass
        assert_eq!(
            doc["inspire_categories"],
            json!([{"term": "Theory-HEP"}, {"term": "Math and Math Physics"}])
        );
    }

    #[test]
    fn test_6531_conference_keywords_are_dropped() {
        let doc = forward(vec![DataField::with_indicators("653", '1', ' ')
            .subfield('9', "submitter")
            .subfield('9', "conference")
            .subfield('a', "Track reconstruction")]);
        assert!(!doc.contains_key("keywords"));
    }

    #[test]
    fn test_693_dash_is_discarded() {
        let doc = forward(vec![
            DataField::blank("693").subfield('e', "-"),
            DataField::blank("693").subfield('a', "CERN LHC").subfield('e', "CERN-LHC-ATLAS").subfield('0', "1108541"),
        ]);
        assert_eq!(
            doc["accelerator_experiments"],
            json!([{
                "accelerator": "CERN LHC",
                "curated_relation": true,
                "legacy_name": "CERN-LHC-ATLAS",
                "record": {"$ref": "http://localhost:5000/api/experiments/1108541"}
            }])
        );
    }

    #[test]
    fn test_695_energy_range_round_trip() {
        let doc = forward(vec![DataField::blank("695").subfield('e', "7").subfield('2', "INSPIRE")]);
        assert_eq!(doc["energy_ranges"], json!(["1-10 TeV"]));
        assert!(!doc.contains_key("keywords"));

        let fields = inverse(doc_with("energy_ranges", json!(["1-10 TeV"])));
        assert_eq!(fields, vec![DataField::blank("695").subfield('e', "7").subfield('2', "INSPIRE")]);
    }

    #[test]
    fn test_695_automatic_keywords_marker() {
        let doc = forward(vec![
            DataField::blank("695").subfield('a', AUTOMATIC_KEYWORDS).subfield('9', "bibclassify"),
            DataField::blank("695").subfield('a', "black hole").subfield('2', "INSPIRE").subfield('9', "bibclassify"),
        ]);
        assert_eq!(
            doc["keywords"],
            json!([{"schema": "INSPIRE", "source": "classifier", "value": "black hole"}])
        );

        let fields = inverse(doc_with(
            "keywords",
            json!([
                {"schema": "INSPIRE", "value": "supersymmetry"},
                {"schema": "INSPIRE", "source": "classifier", "value": "black hole"},
                {"source": "magpie", "value": "whatever"},
                {"source": "author", "value": "free text"}
            ]),
        ));
        assert_eq!(
            fields,
            vec![
                DataField::blank("695").subfield('a', "supersymmetry").subfield('2', "INSPIRE"),
                DataField::blank("695").subfield('a', AUTOMATIC_KEYWORDS).subfield('9', "bibclassify"),
                DataField::blank("695")
                    .subfield('a', "black hole")
                    .subfield('2', "INSPIRE")
                    .subfield('9', "bibclassify"),
                DataField::with_indicators("653", '1', ' ').subfield('a', "free text").subfield('9', "author"),
            ]
        );
    }

    #[test]
    fn test_710_collaborations() {
        let doc = forward(vec![DataField::blank("710").subfield('g', "ATLAS").subfield('0', "1108541")]);
        assert_eq!(
            doc["collaborations"],
            json!([{"record": {"$ref": "http://localhost:5000/api/experiments/1108541"}, "value": "ATLAS"}])
        );
    }

    #[test]
    fn test_773_publication_info() {
        let doc = forward(vec![DataField::blank("773")
            .subfield('p', "Phys.Rev.D")
            .subfield('v', "92")
            .subfield('c', "012004-012010")
            .subfield('y', "2015")]);
        assert_eq!(
            doc["publication_info"],
            json!([{
                "journal_title": "Phys.Rev.D",
                "journal_volume": "92",
                "page_end": "012010",
                "page_start": "012004",
                "year": 2015
            }])
        );
        let fields = inverse(doc_with("publication_info", doc["publication_info"].clone()));
        assert_eq!(fields[0].get_subfield('c'), Some("012004-012010"));
    }

    #[test]
    fn test_980_document_type_and_flags() {
        let doc = forward(vec![
            DataField::blank("980").subfield('a', "HEP"),
            DataField::blank("980").subfield('a', "Citeable"),
            DataField::blank("980").subfield('a', "Published"),
            DataField::blank("980").subfield('a', "ConferencePaper"),
            DataField::blank("980").subfield('a', "Review"),
        ]);
        assert_eq!(doc["citeable"], json!(true));
        assert_eq!(doc["refereed"], json!(true));
        assert_eq!(doc["document_type"], json!(["conference paper"]));
        assert_eq!(doc["publication_type"], json!(["review"]));
    }

    #[test]
    fn test_default_document_type_is_article() {
        let doc = forward(vec![]);
        assert_eq!(doc["document_type"], json!(["article"]));
        assert!(inverse(doc_with("document_type", json!(["article"]))).is_empty());
    }

    #[test]
    fn test_041_languages() {
        let doc = forward(vec![DataField::blank("041").subfield('a', "French").subfield('a', "Klingon")]);
        assert_eq!(doc["languages"], json!(["fr"]));
        assert_eq!(
            inverse(doc_with("languages", json!(["fr"]))),
            vec![DataField::blank("041").subfield('a', "French")]
        );
    }
}
