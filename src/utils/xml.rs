//! XML character sanitation and entity encoding

use std::str::FromStr;

use crate::error::TranslateError;

/// XML version whose `Char` production applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmlVersion {
    #[default]
    V1_0,
    V1_1,
}

impl FromStr for XmlVersion {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" => Ok(XmlVersion::V1_0),
            "1.1" => Ok(XmlVersion::V1_1),
            other => Err(TranslateError::Xml(format!("unsupported XML version {}", other))),
        }
    }
}

/// Range of code points a consumer can represent.
///
/// `Bmp` is for consumers limited to 16-bit code units, where supplementary
/// plane characters cannot be carried and must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharRange {
    #[default]
    Full,
    Bmp,
}

impl CharRange {
    pub fn from_supplementary_planes(enabled: bool) -> Self {
        if enabled {
            CharRange::Full
        } else {
            CharRange::Bmp
        }
    }
}

/// Whether `c` is allowed in a document of the given version and range
pub fn is_xml_char(c: char, version: XmlVersion, range: CharRange) -> bool {
    let cp = c as u32;
    let allowed = match version {
        XmlVersion::V1_0 => matches!(
            cp,
            0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
        ),
        XmlVersion::V1_1 => matches!(cp, 0x1..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF),
    };
    allowed && (range == CharRange::Full || cp <= 0xFFFF)
}

/// Remove every character not allowed by the given XML version
pub fn wash_for_xml(text: &str, version: XmlVersion) -> String {
    wash_for_xml_in(text, version, CharRange::Full)
}

/// Like [`wash_for_xml`], restricted to a character range
pub fn wash_for_xml_in(text: &str, version: XmlVersion, range: CharRange) -> String {
    text.chars()
        .filter(|&c| is_xml_char(c, version, range))
        .collect()
}

/// Encode `&`, `<` and, when `quote` is set, `"` as XML entities.
///
/// With `wash` set the text is first washed for XML 1.0.
pub fn encode_for_xml(text: &str, quote: bool, wash: bool) -> String {
    let washed;
    let text = if wash {
        washed = wash_for_xml(text, XmlVersion::V1_0);
        washed.as_str()
    } else {
        text
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
