//! JSON Schema validation of forward documents
//!
//! Schemas are read from a local directory, one `{name}.json` file per
//! record type; nothing is fetched over the network. The schema a document
//! is checked against is picked from the last segment of its `$schema`.

use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{TranslateError, TranslateResult};
use crate::models::Document;

#[derive(Default)]
pub struct SchemaValidator {
    validators: HashMap<String, Validator>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `{dir}/{name}.json` and register it under `name`
    pub fn load_schema(&mut self, dir: &Path, name: &str) -> TranslateResult<()> {
        let path = dir.join(format!("{}.json", name));
        let content = std::fs::read_to_string(&path)
            .map_err(|e| TranslateError::Schema(format!("cannot read {}: {}", path.display(), e)))?;
        let schema: Value = serde_json::from_str(&content)
            .map_err(|e| TranslateError::Schema(format!("invalid JSON in {}: {}", path.display(), e)))?;
        let validator = Validator::new(&schema)
            .map_err(|e| TranslateError::Schema(format!("cannot compile {}: {}", name, e)))?;

        tracing::debug!(schema = name, "Loaded JSON schema");
        self.validators.insert(name.to_string(), validator);
        Ok(())
    }

    /// Validate a document against the schema named by its `$schema`
    pub fn validate(&self, document: &Document) -> TranslateResult<()> {
        let name = schema_name(document)
            .ok_or_else(|| TranslateError::Schema("document has no $schema".to_string()))?;
        let validator = self
            .validators
            .get(name)
            .ok_or_else(|| TranslateError::Schema(format!("schema {} is not loaded", name)))?;

        let instance = Value::Object(document.clone());
        validator.validate(&instance).map_err(|error| {
            let path = error.instance_path().to_string();
            let path = if path.is_empty() || path == "/" { "root".to_string() } else { path };
            TranslateError::Schema(format!("{} validation failed at '{}': {}", name, path, error))
        })
    }
}

/// `hep` from `http://localhost:5000/schemas/records/hep.json`
fn schema_name(document: &Document) -> Option<&str> {
    let url = document.get("$schema")?.as_str()?;
    let file = url.rsplit('/').next()?;
    Some(file.strip_suffix(".json").unwrap_or(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator_with_schema() -> (tempfile::TempDir, SchemaValidator) {
        let dir = tempfile::tempdir().unwrap();
        let schema = json!({
            "type": "object",
            "properties": {
                "control_number": {"type": "integer"},
                "titles": {"type": "array", "minItems": 1}
            },
            "required": ["titles"]
        });
        std::fs::write(dir.path().join("hep.json"), schema.to_string()).unwrap();

        let mut validator = SchemaValidator::new();
        validator.load_schema(dir.path(), "hep").unwrap();
        (dir, validator)
    }

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_document() {
        let (_dir, validator) = validator_with_schema();
        let doc = document(json!({
            "$schema": "http://localhost:5000/schemas/records/hep.json",
            "titles": [{"title": "A title"}]
        }));
        assert!(validator.validate(&doc).is_ok());
    }

    #[test]
    fn test_invalid_document() {
        let (_dir, validator) = validator_with_schema();
        let doc = document(json!({
            "$schema": "http://localhost:5000/schemas/records/hep.json",
            "control_number": "not a number",
            "titles": [{"title": "A title"}]
        }));
        assert!(matches!(validator.validate(&doc), Err(TranslateError::Schema(_))));
    }

    #[test]
    fn test_unknown_schema() {
        let (_dir, validator) = validator_with_schema();
        let doc = document(json!({"$schema": "http://localhost:5000/schemas/records/authors.json"}));
        assert!(validator.validate(&doc).is_err());
    }

    #[test]
    fn test_missing_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut validator = SchemaValidator::new();
        assert!(validator.load_schema(dir.path(), "hep").is_err());
    }
}
