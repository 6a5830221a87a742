//! MARC-like record model, MARCXML parsing and serialization
//!
//! This module provides the in-memory record the translation engines work
//! on, a reader for legacy MARCXML dumps and the matching writer.

pub mod parser;
pub mod record;
pub mod writer;

pub use parser::{parse_marcxml, parse_record};
pub use record::{DataField, Record, Subfield};
pub use writer::to_marcxml;
