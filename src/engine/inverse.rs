//! Inverse translation: JSON document to MARC-like record

use crate::env::TranslationEnv;
use crate::error::TranslateResult;
use crate::marc::Record;
use crate::models::{Document, RecordType};
use crate::rules::{rule_set, Context};

/// Translate a JSON document back into a record.
///
/// Fields come out in inverse-rule order. Keys without an inverse rule are
/// dropped. Returns `None` when nothing was produced.
pub fn translate_inverse(
    record_type: RecordType,
    doc: &Document,
    env: &TranslationEnv,
) -> TranslateResult<Option<Record>> {
    let rules = rule_set(record_type);
    let ctx = Context::new(env, doc);
    let mut record = Record::new();

    for rule in rules.control_inverse_rules() {
        if let Some(value) = ctx.get(rule.key).and_then(rule.handler) {
            record.set_control_field(rule.tag, value);
        }
    }

    for rule in rules.inverse_rules() {
        let Some(value) = ctx.get(rule.key) else {
            continue;
        };
        match (rule.handler)(value, &ctx) {
            Ok(fields) => {
                for field in fields.into_iter().filter(|f| !f.is_empty()) {
                    record.push(field);
                }
            }
            Err(e) if env.strict => return Err(e.into()),
            Err(e) => tracing::warn!("Skipping key {}: {}", rule.key, e),
        }
    }

    if tracing::enabled!(tracing::Level::TRACE) {
        for key in doc.keys() {
            let known = rules.inverse_rules().iter().any(|r| r.key == key)
                || rules.control_inverse_rules().iter().any(|r| r.key == key);
            if !known {
                tracing::trace!("No inverse rule for key {}", key);
            }
        }
    }

    Ok((!record.is_empty()).then_some(record))
}
