//! Integration tests

mod forward_tests;
mod inverse_tests;
mod marcxml_tests;

use inspire_dojson::{parse_record, Record};

/// Wrap datafield XML snippets into a single MARCXML record
pub fn record(fields: &str) -> Record {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<record xmlns="http://www.loc.gov/MARC21/slim">
{}
</record>"#,
        fields
    );
    parse_record(&xml).expect("valid MARCXML")
}
