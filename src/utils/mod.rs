//! Field-level value normalizers

pub mod arxiv;
pub mod dates;
pub mod isbn;
pub mod lang;
pub mod ranks;
pub mod refs;
pub mod text;
pub mod xml;

pub use arxiv::{classify_field, normalize_arxiv_category, valid_arxiv_categories};
pub use dates::{coerce_date, PartialDate};
pub use isbn::{clean_isbn, normalize_isbn, validate_isbn};
pub use lang::{FixedLanguage, LanguageDetector, ScriptDetector};
pub use ranks::{normalize_rank, RankType};
pub use refs::{absolute_url, get_recid_from_ref, get_record_ref};
pub use xml::{encode_for_xml, wash_for_xml, CharRange, XmlVersion};
