//! Language detection hook

use std::collections::HashMap;
use std::fmt;

/// Detects the language of a text as an ISO 639-1 code
pub trait LanguageDetector: Send + Sync + fmt::Debug {
    fn detect(&self, text: &str) -> Option<String>;
}

/// Always answers the same language. Used to make translations deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguage(pub String);

impl LanguageDetector for FixedLanguage {
    fn detect(&self, text: &str) -> Option<String> {
        (!text.trim().is_empty()).then(|| self.0.clone())
    }
}

/// Heuristic detector: non-Latin scripts by code point, Latin-script
/// languages by stopword frequency.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

const STOPWORDS: &[(&str, &[&str])] = &[
    ("en", &["the", "of", "and", "in", "to", "for", "with", "on", "from", "is"]),
    ("fr", &["le", "la", "les", "des", "du", "et", "une", "dans", "pour", "sur"]),
    ("de", &["der", "die", "das", "und", "den", "von", "mit", "im", "für", "zur"]),
    ("it", &["il", "della", "delle", "dei", "e", "nel", "con", "per", "gli", "una"]),
    ("es", &["el", "los", "las", "del", "y", "en", "con", "para", "una", "por"]),
    ("pt", &["o", "os", "as", "do", "da", "dos", "e", "em", "com", "uma"]),
];

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let mut scripts: HashMap<&str, usize> = HashMap::new();
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            let script = match c as u32 {
                0x0370..=0x03FF => "el",
                0x0400..=0x04FF => "ru",
                0x0590..=0x05FF => "he",
                0x0600..=0x06FF => "ar",
                0x3040..=0x30FF => "ja",
                0xAC00..=0xD7AF => "ko",
                0x4E00..=0x9FFF => "zh",
                _ => "latin",
            };
            *scripts.entry(script).or_default() += 1;
        }

        // Kana anywhere means Japanese, even when kanji dominate
        if scripts.contains_key("ja") {
            return Some("ja".to_string());
        }
        let (script, _) = scripts.into_iter().max_by_key(|(script, count)| (*count, *script))?;
        if script != "latin" {
            return Some(script.to_string());
        }

        let words: Vec<String> = text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        STOPWORDS
            .iter()
            .map(|(lang, stopwords)| {
                let hits = words.iter().filter(|w| stopwords.contains(&w.as_str())).count();
                (hits, *lang)
            })
            .filter(|(hits, _)| *hits > 0)
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, lang)| lang.to_string())
            .or_else(|| Some("en".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_language() {
        let detector = FixedLanguage("fr".to_string());
        assert_eq!(detector.detect("anything").as_deref(), Some("fr"));
        assert_eq!(detector.detect("  "), None);
    }

    #[test]
    fn test_script_detector_non_latin() {
        let detector = ScriptDetector;
        assert_eq!(detector.detect("Квантовая хромодинамика").as_deref(), Some("ru"));
        assert_eq!(detector.detect("Κβαντική χρωμοδυναμική").as_deref(), Some("el"));
        assert_eq!(detector.detect("量子色力学の研究").as_deref(), Some("ja"));
    }

    #[test]
    fn test_script_detector_latin() {
        let detector = ScriptDetector;
        assert_eq!(
            detector.detect("Étude de la production des quarks dans les collisions").as_deref(),
            Some("fr")
        );
        assert_eq!(
            detector.detect("Measurement of the top quark mass with the ATLAS detector").as_deref(),
            Some("en")
        );
        assert_eq!(detector.detect("123"), None);
    }
}
