//! Immutable translation environment
//!
//! Built once from configuration and passed into every translation call.
//! Handlers read the `$ref` server name and the lookup tables from here.

use indexmap::IndexMap;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::TranslateResult;
use crate::models::RecordType;
use crate::utils::arxiv::default_category_mapping;
use crate::utils::lang::{LanguageDetector, ScriptDetector};
use crate::utils::ranks::{default_rank_types, RankType};
use crate::utils::refs::get_record_ref;
use crate::utils::xml::CharRange;

#[derive(Debug, Clone)]
pub struct TranslationEnv {
    pub server_name: String,
    pub legacy_base_url: String,
    pub category_mapping: IndexMap<String, String>,
    pub rank_types: IndexMap<String, RankType>,
    pub strict: bool,
    pub char_range: CharRange,
    pub language_detector: Arc<dyn LanguageDetector>,
}

impl TranslationEnv {
    pub fn from_config(config: &AppConfig) -> TranslateResult<Self> {
        Ok(Self {
            server_name: config.server.server_name.clone(),
            legacy_base_url: config.server.legacy_base_url.clone(),
            category_mapping: config.category_mapping()?,
            rank_types: config.rank_types()?,
            strict: config.translation.strict,
            char_range: CharRange::from_supplementary_planes(config.xml.supplementary_planes),
            language_detector: Arc::new(ScriptDetector),
        })
    }

    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self
    }

    pub fn with_language_detector(mut self, detector: impl LanguageDetector + 'static) -> Self {
        self.language_detector = Arc::new(detector);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// `$ref` to a record of the given type; `None` if `id` is not a record id
    pub fn record_ref(&self, target: RecordType, id: &str) -> Option<Value> {
        get_record_ref(&self.server_name, target.collection(), id)
    }

    /// `$schema` value of a forward document
    pub fn schema_url(&self, record_type: RecordType) -> Value {
        json!(format!(
            "http://{}/schemas/records/{}.json",
            self.server_name,
            record_type.schema_name()
        ))
    }
}

impl Default for TranslationEnv {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            server_name: config.server.server_name,
            legacy_base_url: config.server.legacy_base_url,
            category_mapping: default_category_mapping(),
            rank_types: default_rank_types(),
            strict: config.translation.strict,
            char_range: CharRange::from_supplementary_planes(config.xml.supplementary_planes),
            language_detector: Arc::new(ScriptDetector),
        }
    }
}
