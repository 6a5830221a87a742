//! Data models for the translator

pub mod record_type;

pub use record_type::RecordType;

/// A JSON record document, keys in insertion order
pub type Document = serde_json::Map<String, serde_json::Value>;
