//! arXiv category normalization and INSPIRE field classification

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Current arXiv category identifiers
const ARXIV_CATEGORIES: &[&str] = &[
    "astro-ph", "astro-ph.CO", "astro-ph.EP", "astro-ph.GA", "astro-ph.HE", "astro-ph.IM",
    "astro-ph.SR", "cond-mat", "cond-mat.dis-nn", "cond-mat.mes-hall", "cond-mat.mtrl-sci",
    "cond-mat.other", "cond-mat.quant-gas", "cond-mat.soft", "cond-mat.stat-mech",
    "cond-mat.str-el", "cond-mat.supr-con", "cs", "cs.AI", "cs.AR", "cs.CC", "cs.CE", "cs.CG",
    "cs.CL", "cs.CR", "cs.CV", "cs.CY", "cs.DB", "cs.DC", "cs.DL", "cs.DM", "cs.DS", "cs.ET",
    "cs.FL", "cs.GL", "cs.GR", "cs.GT", "cs.HC", "cs.IR", "cs.IT", "cs.LG", "cs.LO", "cs.MA",
    "cs.MM", "cs.MS", "cs.NA", "cs.NE", "cs.NI", "cs.OH", "cs.OS", "cs.PF", "cs.PL", "cs.RO",
    "cs.SC", "cs.SD", "cs.SE", "cs.SI", "cs.SY", "econ.EM", "eess.AS", "eess.IV", "eess.SP",
    "gr-qc", "hep-ex", "hep-lat", "hep-ph", "hep-th", "math", "math-ph", "math.AC", "math.AG",
    "math.AP", "math.AT", "math.CA", "math.CO", "math.CT", "math.CV", "math.DG", "math.DS",
    "math.FA", "math.GM", "math.GN", "math.GR", "math.GT", "math.HO", "math.IT", "math.KT",
    "math.LO", "math.MG", "math.MP", "math.NA", "math.NT", "math.OA", "math.OC", "math.PR",
    "math.QA", "math.RA", "math.RT", "math.SG", "math.SP", "math.ST", "nlin", "nlin.AO",
    "nlin.CD", "nlin.CG", "nlin.PS", "nlin.SI", "nucl-ex", "nucl-th", "physics",
    "physics.acc-ph", "physics.ao-ph", "physics.app-ph", "physics.atm-clus", "physics.atom-ph",
    "physics.bio-ph", "physics.chem-ph", "physics.class-ph", "physics.comp-ph",
    "physics.data-an", "physics.ed-ph", "physics.flu-dyn", "physics.gen-ph", "physics.geo-ph",
    "physics.hist-ph", "physics.ins-det", "physics.med-ph", "physics.optics",
    "physics.plasm-ph", "physics.pop-ph", "physics.soc-ph", "physics.space-ph", "q-bio",
    "q-bio.BM", "q-bio.CB", "q-bio.GN", "q-bio.MN", "q-bio.NC", "q-bio.OT", "q-bio.PE",
    "q-bio.QM", "q-bio.SC", "q-bio.TO", "q-fin", "q-fin.CP", "q-fin.EC", "q-fin.GN",
    "q-fin.MF", "q-fin.PM", "q-fin.PR", "q-fin.RM", "q-fin.ST", "q-fin.TR", "quant-ph", "stat",
    "stat.AP", "stat.CO", "stat.ME", "stat.ML", "stat.OT", "stat.TH",
];

/// Obsolete arXiv categories and their current replacement
const OBSOLETE_CATEGORIES: &[(&str, &str)] = &[
    ("acc-phys", "physics.acc-ph"),
    ("adap-org", "nlin.AO"),
    ("alg-geom", "math.AG"),
    ("ao-sci", "physics.ao-ph"),
    ("atom-ph", "physics.atom-ph"),
    ("bayes-an", "physics.data-an"),
    ("chao-dyn", "nlin.CD"),
    ("chem-ph", "physics.chem-ph"),
    ("cmp-lg", "cs.CL"),
    ("comp-gas", "nlin.CG"),
    ("dg-ga", "math.DG"),
    ("funct-an", "math.FA"),
    ("mtrl-th", "cond-mat.mtrl-sci"),
    ("patt-sol", "nlin.PS"),
    ("plasm-ph", "physics.plasm-ph"),
    ("q-alg", "math.QA"),
    ("solv-int", "nlin.SI"),
    ("supr-con", "cond-mat.supr-con"),
];

/// Terms of the INSPIRE field vocabulary
pub const INSPIRE_FIELDS: &[&str] = &[
    "Accelerators",
    "Astrophysics",
    "Computing",
    "Data Analysis and Statistics",
    "Experiment-HEP",
    "Experiment-Nucl",
    "General Physics",
    "Gravitation and Cosmology",
    "Instrumentation",
    "Lattice",
    "Math and Math Physics",
    "Other",
    "Phenomenology-HEP",
    "Quantum Physics",
    "Theory-HEP",
    "Theory-Nucl",
];

static OBSOLETE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| OBSOLETE_CATEGORIES.iter().copied().collect());

static CURRENT_BY_LOWERCASE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    ARXIV_CATEGORIES
        .iter()
        .map(|category| (category.to_lowercase(), *category))
        .collect()
});

/// Normalize an arXiv category to its current canonical spelling.
///
/// Obsolete categories are remapped, case is fixed for known categories and
/// `prefix-suffix` spellings of `prefix.suffix` categories are resolved.
/// Unknown input is returned unchanged.
pub fn normalize_arxiv_category(category: &str) -> String {
    let lowered = category.to_lowercase();
    if let Some(current) = OBSOLETE.get(lowered.as_str()) {
        return (*current).to_string();
    }
    if let Some(current) = CURRENT_BY_LOWERCASE.get(&lowered) {
        return (*current).to_string();
    }
    if let Some(current) = CURRENT_BY_LOWERCASE.get(&lowered.replace('-', ".")) {
        return (*current).to_string();
    }
    category.to_string()
}

static VALID_CATEGORIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    ARXIV_CATEGORIES
        .iter()
        .copied()
        .chain(OBSOLETE_CATEGORIES.iter().map(|(obsolete, _)| *obsolete))
        .collect()
});

/// Every known arXiv category identifier, current and obsolete
pub fn valid_arxiv_categories() -> &'static [&'static str] {
    &VALID_CATEGORIES
}

/// Map a category to an INSPIRE field term.
///
/// Accepts either an arXiv category or an already classified term. Returns
/// `None` on empty input and `"Other"` when nothing matches.
pub fn classify_field(value: &str, mapping: &IndexMap<String, String>) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(term) = INSPIRE_FIELDS
        .iter()
        .find(|term| term.eq_ignore_ascii_case(value))
    {
        return Some((*term).to_string());
    }

    let category = normalize_arxiv_category(value);
    let archive = category.split('.').next().unwrap_or(&category);
    let term = mapping
        .get(&category)
        .or_else(|| mapping.get(archive))
        .map(String::as_str)
        .unwrap_or("Other");
    Some(term.to_string())
}

/// Built-in arXiv to INSPIRE field mapping
pub fn default_category_mapping() -> IndexMap<String, String> {
    [
        ("astro-ph", "Astrophysics"),
        ("cond-mat", "General Physics"),
        ("cs", "Computing"),
        ("econ", "Other"),
        ("eess", "Other"),
        ("gr-qc", "Gravitation and Cosmology"),
        ("hep-ex", "Experiment-HEP"),
        ("hep-lat", "Lattice"),
        ("hep-ph", "Phenomenology-HEP"),
        ("hep-th", "Theory-HEP"),
        ("math", "Math and Math Physics"),
        ("math-ph", "Math and Math Physics"),
        ("nlin", "General Physics"),
        ("nucl-ex", "Experiment-Nucl"),
        ("nucl-th", "Theory-Nucl"),
        ("physics", "General Physics"),
        ("physics.acc-ph", "Accelerators"),
        ("physics.comp-ph", "Computing"),
        ("physics.data-an", "Data Analysis and Statistics"),
        ("physics.ins-det", "Instrumentation"),
        ("q-bio", "Other"),
        ("q-fin", "Other"),
        ("quant-ph", "Quantum Physics"),
        ("stat", "Data Analysis and Statistics"),
    ]
    .into_iter()
    .map(|(category, term)| (category.to_string(), term.to_string()))
    .collect()
}
