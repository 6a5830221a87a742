//! JSON to MARCXML

use serde_json::{json, Value};

use inspire_dojson::{DataField, Document, RecordType, Translator};

use crate::record;

fn document(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

fn field(tag: &str, ind1: char, ind2: char, subfields: &[(char, &str)]) -> DataField {
    let mut field = DataField::new(tag, ind1, ind2).unwrap();
    for (code, value) in subfields {
        field.add_subfield(*code, *value);
    }
    field
}

#[test]
fn test_energy_range_single_field() {
    let doc = document(json!({"energy_ranges": ["1-10 TeV"]}));
    let record = Translator::default().inverse(RecordType::Hep, &doc).unwrap().unwrap();
    assert_eq!(record.data_fields, vec![field("695", ' ', ' ', &[('e', "7"), ('2', "INSPIRE")])]);
}

#[test]
fn test_empty_document_gives_no_record() {
    let doc = document(json!({"unknown_key": "ignored"}));
    assert!(Translator::default().inverse(RecordType::Hep, &doc).unwrap().is_none());
}

#[test]
fn test_output_follows_registration_order() {
    // Keys deliberately out of tag order
    let doc = document(json!({
        "description": "A\nB",
        "$schema": "http://localhost:5000/schemas/records/experiments.json",
        "legacy_name": "CERN-ALPHA"
    }));
    let record = Translator::default().inverse(RecordType::Experiments, &doc).unwrap().unwrap();
    let tags: Vec<&str> = record.data_fields.iter().map(|f| f.tag.as_str()).collect();
    assert_eq!(tags, vec!["119", "520", "520", "980"]);
}

#[test]
fn test_control_number() {
    let doc = document(json!({"control_number": 1234}));
    let record = Translator::default().inverse(RecordType::Authors, &doc).unwrap().unwrap();
    assert_eq!(record.get_control_field("001"), Some("1234"));
}

#[test]
fn test_conference_round_trip() {
    let source = record(
        r#"<controlfield tag="001">1333360</controlfield>
           <datafield tag="111" ind1=" " ind2=" ">
             <subfield code="a">Rencontres de Moriond</subfield>
             <subfield code="c">La Thuile, Italy</subfield>
             <subfield code="g">C15-03-14</subfield>
             <subfield code="x">2015-03-14</subfield>
             <subfield code="y">2015-03-21</subfield>
           </datafield>
           <datafield tag="411" ind1=" " ind2=" ">
             <subfield code="a">Moriond</subfield>
             <subfield code="n">50</subfield>
           </datafield>
           <datafield tag="980" ind1=" " ind2=" "><subfield code="a">CONFERENCES</subfield></datafield>"#,
    );
    let translator = Translator::default();
    let doc = translator.forward(RecordType::Conferences, &source).unwrap();
    let back = translator.inverse(RecordType::Conferences, &doc).unwrap().unwrap();

    assert_eq!(back.control_fields, source.control_fields);
    assert_eq!(back.data_fields, source.data_fields);
}

#[test]
fn test_journal_round_trip() {
    let source = record(
        r#"<datafield tag="022" ind1=" " ind2=" ">
             <subfield code="a">0031-9007</subfield>
             <subfield code="b">Print</subfield>
           </datafield>
           <datafield tag="130" ind1=" " ind2=" ">
             <subfield code="a">Physical Review Letters</subfield>
           </datafield>
           <datafield tag="711" ind1=" " ind2=" ">
             <subfield code="a">Phys.Rev.Lett.</subfield>
           </datafield>
           <datafield tag="980" ind1=" " ind2=" "><subfield code="a">JOURNALS</subfield></datafield>"#,
    );
    let translator = Translator::default();
    let doc = translator.forward(RecordType::Journals, &source).unwrap();
    assert_eq!(doc["issns"], json!([{"medium": "print", "value": "0031-9007"}]));

    let back = translator.inverse(RecordType::Journals, &doc).unwrap().unwrap();
    assert_eq!(back.data_fields, source.data_fields);
}

#[test]
fn test_inverse_named_unknown_type() {
    let doc = document(json!({"control_number": 1}));
    assert!(Translator::default().inverse_named("patents", &doc).is_err());
}
