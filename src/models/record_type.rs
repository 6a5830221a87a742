//! Record types handled by the translator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TranslateError;
use crate::marc::Record;

/// Kind of scholarly record; each has its own rule set and JSON schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Publications (schema `hep`)
    Hep,
    Authors,
    Conferences,
    Experiments,
    Institutions,
    Journals,
    Jobs,
    Data,
}

impl RecordType {
    pub const ALL: [RecordType; 8] = [
        RecordType::Hep,
        RecordType::Authors,
        RecordType::Conferences,
        RecordType::Experiments,
        RecordType::Institutions,
        RecordType::Journals,
        RecordType::Jobs,
        RecordType::Data,
    ];

    /// REST collection name, used in `$ref` URLs
    pub fn collection(&self) -> &'static str {
        match self {
            RecordType::Hep => "literature",
            RecordType::Authors => "authors",
            RecordType::Conferences => "conferences",
            RecordType::Experiments => "experiments",
            RecordType::Institutions => "institutions",
            RecordType::Journals => "journals",
            RecordType::Jobs => "jobs",
            RecordType::Data => "data",
        }
    }

    /// Name of the JSON schema the forward output conforms to
    pub fn schema_name(&self) -> &'static str {
        match self {
            RecordType::Hep => "hep",
            other => other.collection(),
        }
    }

    /// Guess the record type from the `980__a` collection markers
    pub fn detect(record: &Record) -> Self {
        let collections: Vec<String> = record
            .get_all_subfields("980", 'a')
            .into_iter()
            .map(|c| c.trim().to_uppercase())
            .collect();
        let has = |name: &str| collections.iter().any(|c| c == name);

        if has("HEPNAMES") {
            RecordType::Authors
        } else if has("CONFERENCES") {
            RecordType::Conferences
        } else if has("EXPERIMENT") {
            RecordType::Experiments
        } else if has("INSTITUTION") {
            RecordType::Institutions
        } else if has("JOURNALS") || has("JOURNALSNEW") {
            RecordType::Journals
        } else if has("JOB") || has("JOBHIDDEN") {
            RecordType::Jobs
        } else if has("DATA") {
            RecordType::Data
        } else {
            RecordType::Hep
        }
    }
}

impl FromStr for RecordType {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hep" | "literature" | "publication" | "publications" => Ok(RecordType::Hep),
            "authors" | "author" | "hepnames" => Ok(RecordType::Authors),
            "conferences" | "conference" => Ok(RecordType::Conferences),
            "experiments" | "experiment" => Ok(RecordType::Experiments),
            "institutions" | "institution" => Ok(RecordType::Institutions),
            "journals" | "journal" => Ok(RecordType::Journals),
            "jobs" | "job" => Ok(RecordType::Jobs),
            "data" => Ok(RecordType::Data),
            _ => Err(TranslateError::UnknownRecordType(s.to_string())),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.schema_name())
    }
}
