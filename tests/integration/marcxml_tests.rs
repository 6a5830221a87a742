//! MARCXML reading and writing around the translators

use inspire_dojson::utils::CharRange;
use inspire_dojson::{parse_marcxml, to_marcxml, RecordType, Translator};

const COLLECTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<collection xmlns="http://www.loc.gov/MARC21/slim">
  <record>
    <controlfield tag="001">902725</controlfield>
    <datafield tag="110" ind1=" " ind2=" ">
      <subfield code="a">European Organization for Nuclear Research</subfield>
      <subfield code="t">CERN</subfield>
      <subfield code="u">CERN</subfield>
    </datafield>
    <datafield tag="980" ind1=" " ind2=" ">
      <subfield code="a">INSTITUTION</subfield>
    </datafield>
  </record>
  <record>
    <controlfield tag="001">1</controlfield>
    <datafield tag="245" ind1=" " ind2=" ">
      <subfield code="a">Quarks &amp; leptons</subfield>
    </datafield>
    <datafield tag="980" ind1=" " ind2=" ">
      <subfield code="a">HEP</subfield>
    </datafield>
  </record>
</collection>"#;

#[test]
fn test_collection_forward_with_detection() {
    let translator = Translator::default();
    let records = parse_marcxml(COLLECTION).unwrap();
    assert_eq!(records.len(), 2);

    let (institution_type, institution) = translator.forward_detect(&records[0]).unwrap();
    assert_eq!(institution_type, RecordType::Institutions);
    assert_eq!(institution["legacy_ICN"], "CERN");

    let (hep_type, hep) = translator.forward_detect(&records[1]).unwrap();
    assert_eq!(hep_type, RecordType::Hep);
    assert_eq!(hep["titles"][0]["title"], "Quarks & leptons");
}

#[test]
fn test_inverse_output_parses_back() {
    let translator = Translator::default();
    let records = parse_marcxml(COLLECTION).unwrap();

    let (record_type, doc) = translator.forward_detect(&records[0]).unwrap();
    let back = translator.inverse(record_type, &doc).unwrap().unwrap();

    let xml = to_marcxml(&[back.clone()], CharRange::Full);
    assert!(xml.contains(r#"<controlfield tag="001">902725</controlfield>"#));

    let reparsed = parse_marcxml(&xml).unwrap();
    assert_eq!(reparsed, vec![back]);
    assert_eq!(reparsed[0].data_fields, records[0].data_fields);
}

#[test]
fn test_special_characters_are_escaped() {
    let translator = Translator::default();
    let records = parse_marcxml(COLLECTION).unwrap();

    let doc = translator.forward(RecordType::Hep, &records[1]).unwrap();
    let back = translator.inverse(RecordType::Hep, &doc).unwrap().unwrap();
    let xml = to_marcxml(&[back], CharRange::Full);
    assert!(xml.contains("Quarks &amp; leptons"));
}
