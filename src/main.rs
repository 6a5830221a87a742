//! dojson - translate legacy MARCXML records to INSPIRE JSON and back

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspire_dojson::{
    parse_marcxml, to_marcxml, AppConfig, Document, RecordType, TranslationEnv, Translator,
};

#[derive(Parser, Debug)]
#[command(name = "dojson", version, about = "MARCXML <-> INSPIRE JSON translator")]
struct Cli {
    #[arg(long, global = true, help = "Configuration file (default: config/default.toml)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Abort on the first field that cannot be converted")]
    strict: bool,
    #[arg(short, long, global = true, help = "Output file (default: stdout)")]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// MARCXML to JSON
    Forward {
        /// MARCXML file (default: stdin)
        input: Option<PathBuf>,
        #[arg(long, help = "Record type; detected from 980 when omitted")]
        record_type: Option<String>,
        #[cfg(feature = "schema-validation")]
        #[arg(long, help = "Directory of JSON schemas to validate the output against")]
        schemas: Option<PathBuf>,
    },
    /// JSON (one document or an array of them) to MARCXML
    Inverse {
        /// JSON file (default: stdin)
        input: Option<PathBuf>,
        #[arg(long, default_value = "hep")]
        record_type: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&config);
    tracing::debug!("dojson v{}", env!("CARGO_PKG_VERSION"));

    let env = TranslationEnv::from_config(&config)?.with_strict(cli.strict || config.translation.strict);
    let translator = Translator::new(env);

    let output = match cli.command {
        Commands::Forward {
            input,
            record_type,
            #[cfg(feature = "schema-validation")]
            schemas,
        } => {
            let documents = forward(&translator, &read_input(input.as_ref())?, record_type.as_deref())?;
            #[cfg(feature = "schema-validation")]
            if let Some(dir) = schemas {
                validate(&dir, &documents)?;
            }
            let documents: Vec<Value> = documents.into_iter().map(Value::Object).collect();
            serde_json::to_string_pretty(&documents)? + "\n"
        }
        Commands::Inverse { input, record_type } => {
            inverse(&translator, &read_input(input.as_ref())?, &record_type)?
        }
    };

    match cli.output {
        Some(path) => std::fs::write(&path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(output.as_bytes())?,
    }
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("inspire_dojson={0},dojson={0}", config.logging.level).into());

    // Logs go to stderr, stdout carries the translation
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn forward(translator: &Translator, xml: &str, record_type: Option<&str>) -> anyhow::Result<Vec<Document>> {
    let record_type = record_type.map(str::parse::<RecordType>).transpose()?;
    let records = parse_marcxml(xml)?;
    tracing::info!(records = records.len(), "Parsed MARCXML");

    records
        .iter()
        .map(|record| -> anyhow::Result<Document> {
            match record_type {
                Some(record_type) => Ok(translator.forward(record_type, record)?),
                None => Ok(translator.forward_detect(record)?.1),
            }
        })
        .collect()
}

fn inverse(translator: &Translator, json: &str, record_type: &str) -> anyhow::Result<String> {
    let documents = match serde_json::from_str::<Value>(json).context("Invalid JSON input")? {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut records = Vec::new();
    for document in documents {
        let document = match document {
            Value::Object(document) => document,
            other => anyhow::bail!("Expected a JSON object, got {}", other),
        };
        match translator.inverse_named(record_type, &document)? {
            Some(record) => records.push(record),
            None => tracing::warn!("Document produced no fields, skipped"),
        }
    }
    tracing::info!(records = records.len(), "Translated to MARCXML");

    Ok(to_marcxml(&records, translator.env().char_range))
}

#[cfg(feature = "schema-validation")]
fn validate(dir: &std::path::Path, documents: &[Document]) -> anyhow::Result<()> {
    let mut validator = inspire_dojson::schema::SchemaValidator::new();
    for record_type in RecordType::ALL {
        if dir.join(format!("{}.json", record_type.schema_name())).exists() {
            validator.load_schema(dir, record_type.schema_name())?;
        }
    }
    for document in documents {
        validator.validate(document)?;
    }
    Ok(())
}
