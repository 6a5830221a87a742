//! MARCXML to JSON

use serde_json::json;

use inspire_dojson::utils::normalize_arxiv_category;
use inspire_dojson::{translate_forward_with_report, RecordType, TranslateError, TranslationEnv, Translator};

use crate::record;

#[test]
fn test_data_doi() {
    let record = record(
        r#"<datafield tag="024" ind1="7" ind2=" ">
             <subfield code="a">10.17182/hepdata.77268.v1/t6</subfield>
             <subfield code="2">DOI</subfield>
           </datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Data, &record).unwrap();
    assert_eq!(doc["dois"], json!([{"value": "10.17182/hepdata.77268.v1/t6"}]));
}

#[test]
fn test_data_new_record() {
    let record = record(r#"<datafield tag="970" ind1=" " ind2=" "><subfield code="d">361769</subfield></datafield>"#);
    let doc = Translator::default().forward(RecordType::Data, &record).unwrap();
    assert_eq!(doc["new_record"]["$ref"], "http://localhost:5000/api/data/361769");
}

#[test]
fn test_experiment_legacy_name_and_institution() {
    let record = record(
        r#"<datafield tag="119" ind1=" " ind2=" ">
             <subfield code="a">CERN-ALPHA</subfield>
             <subfield code="u">CERN</subfield>
             <subfield code="z">902725</subfield>
           </datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Experiments, &record).unwrap();
    assert_eq!(doc["legacy_name"], "CERN-ALPHA");
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
fn test_experiment_description_is_joined() {
    let record = record(
        r#"<datafield tag="520" ind1=" " ind2=" "><subfield code="a">A</subfield></datafield>
           <datafield tag="520" ind1=" " ind2=" "><subfield code="a">B</subfield></datafield>
           <datafield tag="520" ind1=" " ind2=" "><subfield code="a">C</subfield></datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Experiments, &record).unwrap();
    assert_eq!(doc["description"], "A\nB\nC");
}

#[test]
fn test_hep_energy_range() {
    let record = record(
        r#"<datafield tag="695" ind1=" " ind2=" ">
             <subfield code="e">7</subfield>
             <subfield code="2">INSPIRE</subfield>
           </datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Hep, &record).unwrap();
    assert_eq!(doc["energy_ranges"], json!(["1-10 TeV"]));
}

#[test]
fn test_hep_conference_keyword_is_dropped() {
    let record = record(
        r#"<datafield tag="653" ind1="1" ind2=" ">
             <subfield code="9">submitter</subfield>
             <subfield code="9">conference</subfield>
             <subfield code="a">Track reconstruction</subfield>
           </datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Hep, &record).unwrap();
    assert!(!doc.contains_key("keywords"));
}

#[test]
fn test_arxiv_category_normalization() {
    assert_eq!(normalize_arxiv_category("funct-an"), "math.FA");
    assert_eq!(normalize_arxiv_category("HeP-Th"), "hep-th");
    assert_eq!(normalize_arxiv_category("math-fa"), "math.FA");
}

#[test]
fn test_schema_is_first_key() {
    let record = record(
        r#"<controlfield tag="001">1234</controlfield>
           <datafield tag="245" ind1=" " ind2=" "><subfield code="a">A title</subfield></datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Hep, &record).unwrap();
    let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys[0], "$schema");
    assert_eq!(doc["$schema"], "http://localhost:5000/schemas/records/hep.json");
    assert_eq!(doc["control_number"], 1234);
}

#[test]
fn test_list_order_follows_source_order() {
    let record = record(
        r#"<datafield tag="100" ind1=" " ind2=" "><subfield code="a">Smith, J.</subfield></datafield>
           <datafield tag="700" ind1=" " ind2=" "><subfield code="a">Doe, J.</subfield></datafield>
           <datafield tag="700" ind1=" " ind2=" "><subfield code="a">Roe, R.</subfield></datafield>"#,
    );
    let doc = Translator::default().forward(RecordType::Hep, &record).unwrap();
    let names: Vec<&str> = doc["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|author| author["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Smith, J.", "Doe, J.", "Roe, R."]);
}

#[test]
fn test_record_type_detection() {
    let record = record(
        r#"<datafield tag="111" ind1=" " ind2=" "><subfield code="a">Moriond</subfield></datafield>
           <datafield tag="980" ind1=" " ind2=" "><subfield code="a">CONFERENCES</subfield></datafield>"#,
    );
    let (record_type, doc) = Translator::default().forward_detect(&record).unwrap();
    assert_eq!(record_type, RecordType::Conferences);
    assert_eq!(doc["titles"], json!([{"title": "Moriond"}]));
}

#[test]
fn test_unknown_record_type() {
    let record = record("");
    let result = Translator::default().forward_named("patents", &record);
    assert!(matches!(result, Err(TranslateError::UnknownRecordType(_))));
}

#[test]
fn test_malformed_field_is_reported_not_fatal() {
    let record = record(
        r#"<datafield tag="372" ind1=" " ind2=" ">
             <subfield code="a">42</subfield>
             <subfield code="9">INSPIRE</subfield>
           </datafield>
           <datafield tag="245" ind1=" " ind2=" "><subfield code="a">ALPHA</subfield></datafield>"#,
    );
    let (doc, report) =
        translate_forward_with_report(RecordType::Experiments, &record, &TranslationEnv::default()).unwrap();
    assert_eq!(doc["long_name"], "ALPHA");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].tag, "372");

    let strict = TranslationEnv::default().with_strict(true);
    assert!(translate_forward_with_report(RecordType::Experiments, &record, &strict).is_err());
}
