//! INSPIRE DoJSON
//!
//! Bidirectional translation between legacy MARCXML records and the JSON
//! documents of the INSPIRE record schemas (publications, authors,
//! conferences, experiments, institutions, journals, jobs and data).

pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod marc;
pub mod models;
pub mod rules;
#[cfg(feature = "schema-validation")]
pub mod schema;
pub mod utils;

pub use config::AppConfig;
pub use engine::{translate_forward, translate_forward_with_report, translate_inverse, ForwardReport, Translator};
pub use env::TranslationEnv;
pub use error::{FieldConversionError, FieldResult, TranslateError, TranslateResult};
pub use marc::{parse_marcxml, parse_record, to_marcxml, DataField, Record, Subfield};
pub use models::{Document, RecordType};
