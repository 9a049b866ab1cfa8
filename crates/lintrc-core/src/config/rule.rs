//! Rule identifiers, settings and raw rule entries
//!
//! Configuration files carry *entries*: a bare severity (`"warn"`, `1`), an
//! array of severity plus options (`["error", "never"]`), or a conditional
//! object that picks one of two entries from the evaluation context. Entries
//! become concrete [`RuleSetting`]s only during resolution.

use schemars::JsonSchema;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

use super::context::{ContextValue, EvaluationContext};
use super::severity::Severity;

/// Identifier of a lint rule, optionally namespaced (`namespace/name`)
///
/// Equality is exact string equality: `vue/no-parsing-error` and
/// `no-parsing-error` are different rules.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace part (before the last `/`), if any
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(ns, _)| ns)
    }

    /// Bare rule name (after the last `/`)
    pub fn name(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RuleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A resolved rule setting: severity plus the rule's opaque options
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: Severity,
    /// Options payload, in declaration order. Empty means no options.
    pub options: Vec<Value>,
}

impl RuleSetting {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    /// Interpret a static configuration value.
    ///
    /// Returns `None` when the value (or the first array element) is not a
    /// recognized severity.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let (first, rest) = items.split_first()?;
                Some(Self::with_options(Severity::from_value(first)?, rest.to_vec()))
            }
            other => Severity::from_value(other).map(Self::new),
        }
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

impl From<Severity> for RuleSetting {
    fn from(severity: Severity) -> Self {
        Self::new(severity)
    }
}

impl Serialize for RuleSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            return self.severity.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(&self.severity)?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

impl fmt::Display for RuleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            write!(f, "{}", self.severity)
        } else {
            let options: Vec<String> = self.options.iter().map(Value::to_string).collect();
            write!(f, "{} {}", self.severity, options.join(" "))
        }
    }
}

/// Condition tested against the evaluation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    /// Name of the context value to test
    pub var: String,

    /// Expected value; when absent the variable's truthiness is tested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<ContextValue>,
}

impl Condition {
    /// A missing variable never satisfies a condition
    pub fn holds(&self, context: &EvaluationContext) -> bool {
        let Some(actual) = context.get(&self.var) else {
            return false;
        };
        match &self.equals {
            Some(expected) => actual.canonical() == expected.canonical(),
            None => actual.is_truthy(),
        }
    }
}

/// Entry chosen by a condition: `{ "when": .., "then": .., "else": .. }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConditionalEntry {
    pub when: Condition,
    pub then: Box<RuleEntry>,
    #[serde(rename = "else")]
    pub otherwise: Box<RuleEntry>,
}

/// A rule entry as written in a descriptor or fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleEntry {
    Conditional(ConditionalEntry),
    Static(Value),
}

impl RuleEntry {
    /// Build a conditional entry
    pub fn when(condition: Condition, then: RuleEntry, otherwise: RuleEntry) -> Self {
        RuleEntry::Conditional(ConditionalEntry {
            when: condition,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// Collapse conditionals against the context, yielding the static value
    pub fn evaluate<'a>(&'a self, context: &EvaluationContext) -> &'a Value {
        let mut entry = self;
        loop {
            match entry {
                RuleEntry::Static(value) => return value,
                RuleEntry::Conditional(cond) => {
                    entry = if cond.when.holds(context) {
                        &*cond.then
                    } else {
                        &*cond.otherwise
                    };
                }
            }
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, RuleEntry::Conditional(_))
    }
}

impl From<Severity> for RuleEntry {
    fn from(severity: Severity) -> Self {
        RuleEntry::Static(Value::String(severity.as_str().to_string()))
    }
}

impl From<Value> for RuleEntry {
    fn from(value: Value) -> Self {
        RuleEntry::Static(value)
    }
}
