//! Forward translation: MARC-like record to JSON document

use crate::env::TranslationEnv;
use crate::error::{FieldConversionError, TranslateResult};
use crate::marc::Record;
use crate::models::{Document, RecordType};
use crate::rules::{rule_set, Context};

use super::merge::apply_contribution;

/// What a forward translation left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardReport {
    /// Fields a handler could not interpret
    pub skipped: Vec<FieldConversionError>,
    /// Tags no rule matched
    pub unmatched: Vec<String>,
}

impl ForwardReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.unmatched.is_empty()
    }
}

/// Translate a record into a JSON document of the given type
pub fn translate_forward(
    record_type: RecordType,
    record: &Record,
    env: &TranslationEnv,
) -> TranslateResult<Document> {
    translate_forward_with_report(record_type, record, env).map(|(doc, _)| doc)
}

/// Like [`translate_forward`], also reporting skipped and unmatched fields
pub fn translate_forward_with_report(
    record_type: RecordType,
    record: &Record,
    env: &TranslationEnv,
) -> TranslateResult<(Document, ForwardReport)> {
    let rules = rule_set(record_type);
    let mut doc = Document::new();
    let mut report = ForwardReport::default();
    doc.insert("$schema".to_string(), env.schema_url(record_type));

    tracing::debug!(
        "Translating {} record ({} control, {} data fields)",
        record_type,
        record.control_fields.len(),
        record.data_fields.len()
    );

    for (tag, value) in &record.control_fields {
        let Some(rule) = rules.find_control_rule(tag) else {
            tracing::trace!("No rule for control field {}", tag);
            report.unmatched.push(tag.clone());
            continue;
        };
        let outcome = {
            let ctx = Context::new(env, &doc);
            (rule.handler)(value, &ctx)
        };
        match outcome {
            Ok(contribution) => apply_contribution(&mut doc, rule.key, rule.cardinality, contribution),
            Err(e) if env.strict => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Skipping field: {}", e);
                report.skipped.push(e);
            }
        }
    }

    for field in &record.data_fields {
        let Some(rule) = rules.find_rule(field) else {
            tracing::trace!("No rule for field {}{}{}", field.tag, field.ind1, field.ind2);
            report.unmatched.push(field.tag.clone());
            continue;
        };
        let outcome = {
            let ctx = Context::new(env, &doc);
            (rule.handler)(field, &ctx)
        };
        match outcome {
            Ok(contribution) => apply_contribution(&mut doc, rule.key, rule.cardinality, contribution),
            Err(e) if env.strict => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Skipping field: {}", e);
                report.skipped.push(e);
            }
        }
    }

    for pass in rules.post_processors() {
        pass(&mut doc, env);
    }

    Ok((doc, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::marc::DataField;
    use serde_json::json;

    #[test]
    fn test_schema_comes_first() {
        let mut record = Record::new();
        record.set_control_field("001", "361769");
        let doc = translate_forward(RecordType::Data, &record, &TranslationEnv::default()).unwrap();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["$schema", "control_number"]);
        assert_eq!(doc["$schema"], "http://localhost:5000/schemas/records/data.json");
        assert_eq!(doc["control_number"], json!(361769));
    }

    #[test]
    fn test_malformed_field_is_skipped() {
        let mut record = Record::new();
        record.set_control_field("001", "not-a-number");
        record.set_control_field("005", "20170101000000.0");
        record.push(DataField::blank("999").subfield('a', "whatever"));

        let (doc, report) =
            translate_forward_with_report(RecordType::Data, &record, &TranslationEnv::default()).unwrap();
        assert!(!doc.contains_key("control_number"));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].tag, "001");
        assert_eq!(report.unmatched, vec!["005", "999"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_strict_mode_aborts() {
        let mut record = Record::new();
        record.set_control_field("001", "not-a-number");
        let env = TranslationEnv::default().with_strict(true);

        let result = translate_forward(RecordType::Data, &record, &env);
        assert!(matches!(result, Err(TranslateError::FieldConversion(e)) if e.tag == "001"));
    }

    #[test]
    fn test_empty_record_has_only_schema() {
        let doc = translate_forward(RecordType::Conferences, &Record::new(), &TranslationEnv::default()).unwrap();
        assert_eq!(doc.len(), 1);
    }
}
