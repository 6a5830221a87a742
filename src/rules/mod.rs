//! Rule registry
//!
//! Every record type owns a [`RuleSet`]: a forward table dispatching data
//! fields by tag pattern, a control-field table, post-processing passes and
//! an inverse table keyed by JSON field name. The tables are built once, on
//! first use, and never change afterwards.

pub mod common;
pub mod conferences;
pub mod data;
pub mod experiments;
pub mod hep;
pub mod hepnames;
pub mod institutions;
pub mod jobs;
pub mod journals;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

use crate::env::TranslationEnv;
use crate::error::{FieldConversionError, FieldResult, TranslateResult};
use crate::marc::DataField;
use crate::models::{Document, RecordType};

// ---------------------------------------------------------------------------
// Contributions
// ---------------------------------------------------------------------------

/// How a contribution is merged into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Set unless already present (first writer wins)
    Scalar,
    /// Always set (last writer wins)
    ScalarReplace,
    /// Append one item to a list
    List,
    /// Append every item of an array to a list
    ListExtend,
    /// Deep-merge an object, keeping existing scalars
    Mapping,
    /// Deep-merge an object, overwriting existing scalars
    MappingReplace,
    /// Concatenate text with a separator
    Joined(&'static str),
}

/// One value destined for one key of the document
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: &'static str,
    pub cardinality: Cardinality,
    pub value: Value,
}

impl Entry {
    pub fn new(key: &'static str, cardinality: Cardinality, value: Value) -> Self {
        Self {
            key,
            cardinality,
            value,
        }
    }

    pub fn scalar(key: &'static str, value: Value) -> Self {
        Self::new(key, Cardinality::Scalar, value)
    }

    pub fn append(key: &'static str, value: Value) -> Self {
        Self::new(key, Cardinality::List, value)
    }

    pub fn merge(key: &'static str, value: Value) -> Self {
        Self::new(key, Cardinality::Mapping, value)
    }
}

/// What a forward handler produced for a field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Contribution {
    /// The field yields nothing (filtered or empty)
    #[default]
    Nothing,
    /// A value for the rule's own key and cardinality
    Value(Value),
    /// Values for explicit keys
    Entries(Vec<Entry>),
}

impl From<Option<Value>> for Contribution {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(Value::Null) | None => Contribution::Nothing,
            Some(value) => Contribution::Value(value),
        }
    }
}

impl From<Value> for Contribution {
    fn from(value: Value) -> Self {
        Some(value).into()
    }
}

impl From<Vec<Entry>> for Contribution {
    fn from(entries: Vec<Entry>) -> Self {
        if entries.is_empty() {
            Contribution::Nothing
        } else {
            Contribution::Entries(entries)
        }
    }
}

// ---------------------------------------------------------------------------
// Handler context
// ---------------------------------------------------------------------------

/// What a handler may look at besides its own field
pub struct Context<'a> {
    pub env: &'a TranslationEnv,
    /// Forward: the accumulating document. Inverse: the source document.
    pub doc: &'a Document,
}

impl<'a> Context<'a> {
    pub fn new(env: &'a TranslationEnv, doc: &'a Document) -> Self {
        Self { env, doc }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key).filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `$ref` to another record, warning when the id is malformed
    pub fn record_ref(&self, tag: &str, target: RecordType, id: Option<&str>) -> Option<Value> {
        let id = id?;
        let reference = self.env.record_ref(target, id);
        if reference.is_none() {
            tracing::warn!("Field {}: ignoring malformed record id {:?}", tag, id);
        }
        reference
    }
}

// ---------------------------------------------------------------------------
// Tag patterns
// ---------------------------------------------------------------------------

/// Matches a field by tag and, optionally, by indicators.
///
/// Tag positions may hold `.` to match any character. Indicator
/// constraints are sets of accepted characters, `None` accepting any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPattern {
    tag: &'static str,
    ind1: Option<&'static str>,
    ind2: Option<&'static str>,
}

/// Pattern matching a tag with any indicators
pub const fn pat(tag: &'static str) -> TagPattern {
    TagPattern {
        tag,
        ind1: None,
        ind2: None,
    }
}

impl TagPattern {
    pub const fn ind1(mut self, accepted: &'static str) -> Self {
        self.ind1 = Some(accepted);
        self
    }

    pub const fn ind2(mut self, accepted: &'static str) -> Self {
        self.ind2 = Some(accepted);
        self
    }

    pub fn matches(&self, field: &DataField) -> bool {
        self.tag.len() == field.tag.len()
            && self
                .tag
                .chars()
                .zip(field.tag.chars())
                .all(|(p, t)| p == '.' || p == t)
            && self.ind1.map_or(true, |set| set.contains(field.ind1))
            && self.ind2.map_or(true, |set| set.contains(field.ind2))
    }

    /// Higher is more specific
    pub fn specificity(&self) -> u32 {
        let indicator = |set: Option<&str>| match set {
            None => 0,
            Some(set) if set.chars().count() == 1 => 2,
            Some(_) => 1,
        };
        self.tag.chars().filter(|&c| c != '.').count() as u32 * 10
            + indicator(self.ind1)
            + indicator(self.ind2)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

pub type ForwardHandler = fn(&DataField, &Context<'_>) -> FieldResult<Contribution>;
pub type ControlHandler = fn(&str, &Context<'_>) -> FieldResult<Contribution>;
pub type InverseHandler = fn(&Value, &Context<'_>) -> FieldResult<Vec<DataField>>;
pub type ControlInverseHandler = fn(&Value) -> Option<String>;
pub type PostProcess = fn(&mut Document, &TranslationEnv);

/// Forward rule for data fields
#[derive(Clone)]
pub struct Rule {
    pub pattern: TagPattern,
    pub key: &'static str,
    pub cardinality: Cardinality,
    pub handler: ForwardHandler,
}

/// Forward rule for a control field
#[derive(Clone)]
pub struct ControlRule {
    pub tag: &'static str,
    pub key: &'static str,
    pub cardinality: Cardinality,
    pub handler: ControlHandler,
}

/// Inverse rule producing data fields from one JSON key
#[derive(Clone)]
pub struct InverseRule {
    pub key: &'static str,
    pub handler: InverseHandler,
}

/// Inverse rule producing a control field from one JSON key
#[derive(Clone)]
pub struct ControlInverseRule {
    pub key: &'static str,
    pub tag: &'static str,
    pub handler: ControlInverseHandler,
}

/// Rule tables of one record type
pub struct RuleSet {
    pub record_type: RecordType,
    control: Vec<ControlRule>,
    forward: Vec<Rule>,
    post: Vec<PostProcess>,
    control_inverse: Vec<ControlInverseRule>,
    inverse: Vec<InverseRule>,
}

impl RuleSet {
    pub fn builder(record_type: RecordType) -> RuleSetBuilder {
        RuleSetBuilder {
            set: RuleSet {
                record_type,
                control: Vec::new(),
                forward: Vec::new(),
                post: Vec::new(),
                control_inverse: Vec::new(),
                inverse: Vec::new(),
            },
        }
    }

    /// Most specific rule matching the field; earliest registered on ties
    pub fn find_rule(&self, field: &DataField) -> Option<&Rule> {
        let mut best: Option<&Rule> = None;
        for rule in self.forward.iter().filter(|r| r.pattern.matches(field)) {
            if best.map_or(true, |b| rule.pattern.specificity() > b.pattern.specificity()) {
                best = Some(rule);
            }
        }
        best
    }

    pub fn find_control_rule(&self, tag: &str) -> Option<&ControlRule> {
        self.control.iter().find(|r| r.tag == tag)
    }

    pub fn post_processors(&self) -> &[PostProcess] {
        &self.post
    }

    pub fn control_inverse_rules(&self) -> &[ControlInverseRule] {
        &self.control_inverse
    }

    /// Inverse rules in output order
    pub fn inverse_rules(&self) -> &[InverseRule] {
        &self.inverse
    }

    pub fn forward_rules(&self) -> &[Rule] {
        &self.forward
    }
}

pub struct RuleSetBuilder {
    set: RuleSet,
}

impl RuleSetBuilder {
    pub fn control(
        mut self,
        tag: &'static str,
        key: &'static str,
        cardinality: Cardinality,
        handler: ControlHandler,
    ) -> Self {
        self.set.control.push(ControlRule {
            tag,
            key,
            cardinality,
            handler,
        });
        self
    }

    pub fn rule(
        mut self,
        pattern: TagPattern,
        key: &'static str,
        cardinality: Cardinality,
        handler: ForwardHandler,
    ) -> Self {
        self.set.forward.push(Rule {
            pattern,
            key,
            cardinality,
            handler,
        });
        self
    }

    pub fn post(mut self, pass: PostProcess) -> Self {
        self.set.post.push(pass);
        self
    }

    pub fn control_inverse(
        mut self,
        key: &'static str,
        tag: &'static str,
        handler: ControlInverseHandler,
    ) -> Self {
        self.set.control_inverse.push(ControlInverseRule { key, tag, handler });
        self
    }

    pub fn inverse(mut self, key: &'static str, handler: InverseHandler) -> Self {
        self.set.inverse.push(InverseRule { key, handler });
        self
    }

    pub fn build(self) -> RuleSet {
        self.set
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static REGISTRY: Lazy<HashMap<RecordType, RuleSet>> = Lazy::new(|| {
    RecordType::ALL
        .into_iter()
        .map(|record_type| (record_type, build_rules(record_type)))
        .collect()
});

fn build_rules(record_type: RecordType) -> RuleSet {
    match record_type {
        RecordType::Hep => hep::rules(),
        RecordType::Authors => hepnames::rules(),
        RecordType::Conferences => conferences::rules(),
        RecordType::Experiments => experiments::rules(),
        RecordType::Institutions => institutions::rules(),
        RecordType::Journals => journals::rules(),
        RecordType::Jobs => jobs::rules(),
        RecordType::Data => data::rules(),
    }
}

/// Rule set of a record type
pub fn rule_set(record_type: RecordType) -> &'static RuleSet {
    &REGISTRY[&record_type]
}

/// Rule set looked up by record type name
pub fn rule_set_by_name(name: &str) -> TranslateResult<&'static RuleSet> {
    Ok(rule_set(name.parse()?))
}

/// Error for a field a handler cannot interpret
pub(crate) fn conversion_error(field: &DataField, reason: impl Into<String>) -> FieldConversionError {
    FieldConversionError::new(field.tag.clone(), reason)
}
