//! MARCXML serialization

use std::fmt::Write;

use super::record::Record;
use crate::utils::xml::{encode_for_xml, wash_for_xml_in, CharRange, XmlVersion};

const MARCXML_NS: &str = "http://www.loc.gov/MARC21/slim";

/// Serialize records as a MARCXML `<collection>`.
///
/// Values are washed for XML 1.0 with the given character range and
/// entity-encoded, so the output never contains raw `<` or `&`.
pub fn to_marcxml(records: &[Record], range: CharRange) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<collection xmlns=\"{}\">", MARCXML_NS);
    for record in records {
        write_record(&mut out, record, range);
    }
    out.push_str("</collection>\n");
    out
}

fn write_record(out: &mut String, record: &Record, range: CharRange) {
    let text = |value: &str| encode_for_xml(&wash_for_xml_in(value, XmlVersion::V1_0, range), true, false);

    out.push_str("  <record>\n");
    if let Some(leader) = &record.leader {
        let _ = writeln!(out, "    <leader>{}</leader>", text(leader));
    }
    for (tag, value) in &record.control_fields {
        let _ = writeln!(
            out,
            "    <controlfield tag=\"{}\">{}</controlfield>",
            text(tag),
            text(value)
        );
    }
    for field in &record.data_fields {
        let _ = writeln!(
            out,
            "    <datafield tag=\"{}\" ind1=\"{}\" ind2=\"{}\">",
            text(&field.tag),
            text(&field.ind1.to_string()),
            text(&field.ind2.to_string())
        );
        for subfield in &field.subfields {
            let _ = writeln!(
                out,
                "      <subfield code=\"{}\">{}</subfield>",
                text(&subfield.code.to_string()),
                text(&subfield.value)
            );
        }
        out.push_str("    </datafield>\n");
    }
    out.push_str("  </record>\n");
}
