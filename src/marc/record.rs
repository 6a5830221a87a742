//! In-memory representation of a MARC-like record
//!
//! A record is an ordered sequence of data fields, each made of a three
//! character tag, two indicators and an ordered list of subfields. Repeated
//! tags and repeated subfield codes are kept in source order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{TranslateError, TranslateResult};

/// A MARC-like record containing control and data fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The record leader, when the source carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    /// Control fields (00X), in source order
    #[serde(default)]
    pub control_fields: IndexMap<String, String>,
    /// Data fields with indicators and subfields
    #[serde(default)]
    pub data_fields: Vec<DataField>,
}

/// A data field (010-999)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator
    pub ind1: char,
    /// Second indicator
    pub ind2: char,
    /// Subfields
    pub subfields: Vec<Subfield>,
}

/// A subfield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a control field, keeping its original position when replaced
    pub fn set_control_field(&mut self, tag: &str, value: impl Into<String>) {
        self.control_fields.insert(tag.to_string(), value.into());
    }

    pub fn push(&mut self, field: DataField) {
        self.data_fields.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.control_fields.is_empty() && self.data_fields.is_empty()
    }

    /// Get a subfield value by tag and subfield code
    pub fn get_subfield(&self, tag: &str, code: char) -> Option<&str> {
        self.data_fields
            .iter()
            .filter(|f| f.tag == tag)
            .find_map(|f| f.get_subfield(code))
    }

    /// Get all subfield values for a tag and code
    pub fn get_all_subfields(&self, tag: &str, code: char) -> Vec<&str> {
        self.data_fields
            .iter()
            .filter(|f| f.tag == tag)
            .flat_map(|f| f.get_all_subfields(code))
            .collect()
    }

    /// Get a control field value
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    /// Get all data fields with a specific tag
    pub fn get_fields(&self, tag: &str) -> Vec<&DataField> {
        self.data_fields.iter().filter(|f| f.tag == tag).collect()
    }
}

impl DataField {
    /// Create an empty field, checking the tag and indicator invariants
    pub fn new(tag: &str, ind1: char, ind2: char) -> TranslateResult<Self> {
        if tag.chars().count() != 3 {
            return Err(TranslateError::InvalidField(format!(
                "tag must be three characters, got {:?}",
                tag
            )));
        }
        if ind1.is_control() || ind2.is_control() {
            return Err(TranslateError::InvalidField(format!(
                "invalid indicators {:?}/{:?} on tag {}",
                ind1, ind2, tag
            )));
        }
        Ok(Self {
            tag: tag.to_string(),
            ind1,
            ind2,
            subfields: Vec::new(),
        })
    }

    /// Field with blank indicators. Only for tags known to be valid.
    pub(crate) fn blank(tag: &'static str) -> Self {
        Self::with_indicators(tag, ' ', ' ')
    }

    pub(crate) fn with_indicators(tag: &'static str, ind1: char, ind2: char) -> Self {
        debug_assert_eq!(tag.len(), 3);
        Self {
            tag: tag.to_string(),
            ind1,
            ind2,
            subfields: Vec::new(),
        }
    }

    /// Append a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Builder-style variant of [`DataField::add_subfield`]
    pub fn subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.add_subfield(code, value);
        self
    }

    /// Append a subfield when a value is present
    pub fn subfield_opt(mut self, code: char, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.add_subfield(code, value);
        }
        self
    }

    /// Get a subfield value by code
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Get all subfield values for a code
    pub fn get_all_subfields(&self, code: char) -> Vec<&str> {
        self.subfields
            .iter()
            .filter(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
            .collect()
    }

    pub fn has_subfield(&self, code: char) -> bool {
        self.subfields.iter().any(|sf| sf.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.subfields.is_empty()
    }
}
