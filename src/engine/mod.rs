//! Translation engines
//!
//! The forward engine dispatches every field of a record to the most
//! specific rule of its record type and merges the contributions into a
//! JSON document. The inverse engine walks the inverse rules of the record
//! type in order and collects the fields they produce.

pub mod forward;
pub mod inverse;
pub mod merge;

pub use forward::{translate_forward, translate_forward_with_report, ForwardReport};
pub use inverse::translate_inverse;

use crate::config::AppConfig;
use crate::env::TranslationEnv;
use crate::error::TranslateResult;
use crate::marc::Record;
use crate::models::{Document, RecordType};

/// Translator bound to one environment
#[derive(Debug, Clone, Default)]
pub struct Translator {
    env: TranslationEnv,
}

impl Translator {
    pub fn new(env: TranslationEnv) -> Self {
        Self { env }
    }

    pub fn from_config(config: &AppConfig) -> TranslateResult<Self> {
        Ok(Self::new(TranslationEnv::from_config(config)?))
    }

    pub fn env(&self) -> &TranslationEnv {
        &self.env
    }

    pub fn forward(&self, record_type: RecordType, record: &Record) -> TranslateResult<Document> {
        translate_forward(record_type, record, &self.env)
    }

    /// Forward translation with the record type given by name
    pub fn forward_named(&self, record_type: &str, record: &Record) -> TranslateResult<Document> {
        self.forward(record_type.parse()?, record)
    }

    /// Forward translation with the record type read from the record itself
    pub fn forward_detect(&self, record: &Record) -> TranslateResult<(RecordType, Document)> {
        let record_type = RecordType::detect(record);
        Ok((record_type, self.forward(record_type, record)?))
    }

    pub fn inverse(&self, record_type: RecordType, doc: &Document) -> TranslateResult<Option<Record>> {
        translate_inverse(record_type, doc, &self.env)
    }

    pub fn inverse_named(&self, record_type: &str, doc: &Document) -> TranslateResult<Option<Record>> {
        self.inverse(record_type.parse()?, doc)
    }
}
