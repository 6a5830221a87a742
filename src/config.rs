//! Configuration management for the translator

use config::{Config, ConfigError, Environment, File};
use indexmap::IndexMap;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{TranslateError, TranslateResult};
use crate::utils::arxiv::default_category_mapping;
use crate::utils::ranks::{default_rank_types, RankType};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Host authority used as the prefix of every `$ref`
    pub server_name: String,
    /// Base of the legacy system, used to absolutise relative URLs
    pub legacy_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TranslationConfig {
    /// Abort on the first field that cannot be converted
    pub strict: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct XmlConfig {
    /// Whether characters outside the Basic Multilingual Plane survive the wash
    pub supplementary_planes: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// External JSON files overriding the built-in lookup tables
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MappingsConfig {
    pub arxiv_to_inspire_categories: Option<PathBuf>,
    pub rank_types: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub translation: TranslationConfig,
    pub xml: XmlConfig,
    pub logging: LoggingConfig,
    pub mappings: MappingsConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::builder(Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false)))?
        .build()?
        .try_deserialize()
    }

    /// Load configuration from an explicit file, still honouring the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::builder(Config::builder().add_source(File::from(path)))?
            .build()?
            .try_deserialize()
    }

    fn builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Environment variables with prefix DOJSON, e.g. DOJSON_SERVER__SERVER_NAME
            .add_source(
                Environment::with_prefix("DOJSON")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // The legacy variable names win over everything else
            .set_override_option("server.server_name", env::var("SERVER_NAME").ok())?
            .set_override_option("server.legacy_base_url", env::var("LEGACY_BASE_URL").ok())
    }

    /// Category mapping: the configured JSON file or the built-in table
    pub fn category_mapping(&self) -> TranslateResult<IndexMap<String, String>> {
        match &self.mappings.arxiv_to_inspire_categories {
            Some(path) => read_json_table(path),
            None => Ok(default_category_mapping()),
        }
    }

    /// Rank types: the configured JSON file or the built-in table
    pub fn rank_types(&self) -> TranslateResult<IndexMap<String, RankType>> {
        match &self.mappings.rank_types {
            Some(path) => read_json_table(path),
            None => Ok(default_rank_types()),
        }
    }
}

fn read_json_table<T: serde::de::DeserializeOwned>(path: &Path) -> TranslateResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TranslateError::Config(ConfigError::Message(format!(
            "cannot read {}: {}",
            path.display(),
            e
        )))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        TranslateError::Config(ConfigError::Message(format!(
            "invalid mapping in {}: {}",
            path.display(),
            e
        )))
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: "localhost:5000".to_string(),
            legacy_base_url: "https://old.inspirehep.net".to_string(),
        }
    }
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            supplementary_planes: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.server_name, "localhost:5000");
        assert!(!config.translation.strict);
        assert!(config.xml.supplementary_planes);
        assert!(config.category_mapping().unwrap().contains_key("hep-th"));
        assert!(config.rank_types().unwrap().contains_key("POSTDOC"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nlegacy_base_url = \"https://legacy.example.org\"\n\n[translation]\nstrict = true"
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.legacy_base_url, "https://legacy.example.org");
        assert!(config.translation.strict);
    }

    #[test]
    fn test_mapping_file_override() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"hep-th": "Theory-HEP"}}"#).unwrap();

        let config = AppConfig {
            mappings: MappingsConfig {
                arxiv_to_inspire_categories: Some(file.path().to_path_buf()),
                rank_types: None,
            },
            ..Default::default()
        };
        let mapping = config.category_mapping().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["hep-th"], "Theory-HEP");
    }

    #[test]
    fn test_missing_mapping_file() {
        let config = AppConfig {
            mappings: MappingsConfig {
                arxiv_to_inspire_categories: Some(PathBuf::from("/nonexistent/mapping.json")),
                rank_types: None,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.category_mapping(),
            Err(TranslateError::Config(_))
        ));
    }
}
