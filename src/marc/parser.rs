//! MARCXML record parser
//!
//! Parses a MARCXML document (a single `<record>` or a `<collection>`) into
//! the structured representation. Namespace prefixes are ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::record::{DataField, Record};
use crate::error::{TranslateError, TranslateResult};

/// Element whose text content is being collected
enum Capture {
    Nothing,
    Leader,
    Control(String),
    Subfield(char),
}

/// Parse every record of a MARCXML document, in document order
pub fn parse_marcxml(xml: &str) -> TranslateResult<Vec<Record>> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut current: Option<Record> = None;
    let mut field: Option<DataField> = None;
    let mut capture = Capture::Nothing;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"record" => current = Some(Record::new()),
                b"leader" => {
                    capture = Capture::Leader;
                    text.clear();
                }
                b"controlfield" => {
                    capture = Capture::Control(attribute(&e, b"tag")?.unwrap_or_default());
                    text.clear();
                }
                b"datafield" => field = Some(open_datafield(&e)?),
                b"subfield" => {
                    capture = Capture::Subfield(subfield_code(&e)?);
                    text.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"datafield" => {
                    if let Some(record) = current.as_mut() {
                        record.push(open_datafield(&e)?);
                    }
                }
                b"subfield" => {
                    let code = subfield_code(&e)?;
                    if let Some(field) = field.as_mut() {
                        field.add_subfield(code, "");
                    }
                }
                b"controlfield" => {
                    let tag = attribute(&e, b"tag")?.unwrap_or_default();
                    if let Some(record) = current.as_mut() {
                        record.set_control_field(&tag, "");
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if !matches!(capture, Capture::Nothing) {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if !matches!(capture, Capture::Nothing) {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"record" => {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
                b"leader" => {
                    if let Some(record) = current.as_mut() {
                        record.leader = Some(std::mem::take(&mut text));
                    }
                    capture = Capture::Nothing;
                }
                b"controlfield" => {
                    if let (Capture::Control(tag), Some(record)) = (&capture, current.as_mut()) {
                        record.set_control_field(tag, std::mem::take(&mut text));
                    }
                    capture = Capture::Nothing;
                }
                b"datafield" => {
                    if let (Some(done), Some(record)) = (field.take(), current.as_mut()) {
                        record.push(done);
                    }
                }
                b"subfield" => {
                    if let (Capture::Subfield(code), Some(field)) = (&capture, field.as_mut()) {
                        field.add_subfield(*code, std::mem::take(&mut text));
                    }
                    capture = Capture::Nothing;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!("Parsed {} MARCXML records", records.len());
    Ok(records)
}

/// Parse a document expected to hold exactly one record
pub fn parse_record(xml: &str) -> TranslateResult<Record> {
    parse_marcxml(xml)?
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::Xml("no <record> element found".to_string()))
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> TranslateResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn indicator(e: &BytesStart<'_>, name: &[u8]) -> TranslateResult<char> {
    Ok(attribute(e, name)?
        .and_then(|value| value.chars().next())
        .unwrap_or(' '))
}

fn open_datafield(e: &BytesStart<'_>) -> TranslateResult<DataField> {
    let tag = attribute(e, b"tag")?
        .ok_or_else(|| TranslateError::Xml("datafield without tag".to_string()))?;
    DataField::new(&tag, indicator(e, b"ind1")?, indicator(e, b"ind2")?)
}

fn subfield_code(e: &BytesStart<'_>) -> TranslateResult<char> {
    attribute(e, b"code")?
        .and_then(|code| code.chars().next())
        .ok_or_else(|| TranslateError::Xml("subfield without code".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<collection xmlns="http://www.loc.gov/MARC21/slim">
  <record>
    <controlfield tag="001">1234</controlfield>
    <datafield tag="653" ind1="1" ind2=" ">
      <subfield code="9">submitter</subfield>
      <subfield code="9">conference</subfield>
      <subfield code="a">Track &amp; vertex reconstruction</subfield>
    </datafield>
    <datafield tag="520" ind1=" " ind2=" ">
      <subfield code="a"><![CDATA[x < y]]></subfield>
    </datafield>
  </record>
  <record>
    <datafield tag="980" ind1="" ind2=""><subfield code="a">HEP</subfield></datafield>
  </record>
</collection>"#;

    #[test]
    fn test_parse_collection() {
        let records = parse_marcxml(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.get_control_field("001"), Some("1234"));
        assert_eq!(first.data_fields.len(), 2);

        let keywords = &first.data_fields[0];
        assert_eq!(keywords.tag, "653");
        assert_eq!(keywords.ind1, '1');
        assert_eq!(keywords.ind2, ' ');
        assert_eq!(keywords.get_all_subfields('9'), vec!["submitter", "conference"]);
        assert_eq!(keywords.get_subfield('a'), Some("Track & vertex reconstruction"));

        assert_eq!(first.get_subfield("520", 'a'), Some("x < y"));

        let second = &records[1];
        assert_eq!(second.data_fields[0].ind1, ' ');
        assert_eq!(second.get_subfield("980", 'a'), Some("HEP"));
    }

    #[test]
    fn test_parse_prefixed_single_record() {
        let xml = r#"<marc:record xmlns:marc="http://www.loc.gov/MARC21/slim">
            <marc:leader>00000nam a2200000 a 4500</marc:leader>
            <marc:datafield tag="245" ind1="1" ind2="0"><marc:subfield code="a">Title</marc:subfield></marc:datafield>
        </marc:record>"#;

        let record = parse_record(xml).unwrap();
        assert_eq!(record.leader.as_deref(), Some("00000nam a2200000 a 4500"));
        assert_eq!(record.get_subfield("245", 'a'), Some("Title"));
    }

    #[test]
    fn test_parse_without_record() {
        assert!(matches!(parse_record("<collection/>"), Err(TranslateError::Xml(_))));
    }

    #[test]
    fn test_parse_bad_tag() {
        let xml = r#"<record><datafield tag="24" ind1=" " ind2=" "/></record>"#;
        assert!(matches!(parse_marcxml(xml), Err(TranslateError::InvalidField(_))));
    }
}
