//! Error types for the translator

use thiserror::Error;

/// Reason a single field could not be converted.
///
/// Raised by rule handlers; the forward engine logs and skips the field
/// unless the translation runs in strict mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert field {tag}: {reason}")]
pub struct FieldConversionError {
    pub tag: String,
    pub reason: String,
}

impl FieldConversionError {
    pub fn new(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            reason: reason.into(),
        }
    }
}

/// Main translator error type
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error(transparent)]
    FieldConversion(#[from] FieldConversionError),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl From<quick_xml::Error> for TranslateError {
    fn from(e: quick_xml::Error) -> Self {
        TranslateError::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for TranslateError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        TranslateError::Xml(e.to_string())
    }
}

/// Result type alias for translator operations
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Result type alias for rule handlers
pub type FieldResult<T> = Result<T, FieldConversionError>;
