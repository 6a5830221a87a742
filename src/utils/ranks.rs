//! Academic rank normalization

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Alternative spellings of a rank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankType {
    pub abbreviations: Vec<String>,
    pub alternative_names: Vec<String>,
}

/// Resolve a free-text rank to its canonical key.
///
/// Unknown non-empty ranks resolve to `OTHER`.
pub fn normalize_rank(raw: &str, rank_types: &IndexMap<String, RankType>) -> Option<String> {
    let rank = raw.trim().to_uppercase().replace('.', "");
    if rank.is_empty() {
        return None;
    }

    for (key, rank_type) in rank_types {
        let matches = *key == rank
            || rank_type.abbreviations.iter().any(|a| a.to_uppercase() == rank)
            || rank_type
                .alternative_names
                .iter()
                .any(|n| n.to_uppercase() == rank);
        if matches {
            return Some(key.clone());
        }
    }
    Some("OTHER".to_string())
}

/// Built-in rank table
pub fn default_rank_types() -> IndexMap<String, RankType> {
    let rank = |abbreviations: &[&str], alternative_names: &[&str]| RankType {
        abbreviations: abbreviations.iter().map(|s| s.to_string()).collect(),
        alternative_names: alternative_names.iter().map(|s| s.to_string()).collect(),
    };

    IndexMap::from([
        ("STAFF".to_string(), rank(&[], &["staff"])),
        ("SENIOR".to_string(), rank(&[], &["senior"])),
        ("JUNIOR".to_string(), rank(&["JUN", "JR"], &["junior"])),
        ("VISITOR".to_string(), rank(&[], &["visitor", "visiting scientist"])),
        ("POSTDOC".to_string(), rank(&["PD"], &["post-doc", "postdoctoral"])),
        ("PHD".to_string(), rank(&[], &["student", "phd student"])),
        ("MASTER".to_string(), rank(&["MAS", "MS", "MSC"], &["master"])),
        ("UNDERGRADUATE".to_string(), rank(&["UG"], &["bachelor", "undergrad"])),
        ("OTHER".to_string(), rank(&[], &[])),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rank() {
        let ranks = default_rank_types();
        assert_eq!(normalize_rank("Staff", &ranks).as_deref(), Some("STAFF"));
        assert_eq!(normalize_rank("PD", &ranks).as_deref(), Some("POSTDOC"));
        assert_eq!(normalize_rank("Post-doc", &ranks).as_deref(), Some("POSTDOC"));
        assert_eq!(normalize_rank("Ph.D.", &ranks).as_deref(), Some("PHD"));
        assert_eq!(normalize_rank("M.Sc.", &ranks).as_deref(), Some("MASTER"));
        assert_eq!(normalize_rank("janitor", &ranks).as_deref(), Some("OTHER"));
        assert_eq!(normalize_rank("  ", &ranks), None);
    }
}
