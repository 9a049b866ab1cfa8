//! The resolved, flattened configuration handed to rule execution

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::rule::{RuleId, RuleSetting};
use super::severity::Severity;

/// Layer whose write produced a rule's final value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    /// A named base rule-set from the extends chain
    Extends(String),
    /// Settings implied by an enabled environment
    Environment(String),
    /// The descriptor's own rule overrides
    Local,
}

impl fmt::Display for RuleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOrigin::Extends(name) => write!(f, "extends:{name}"),
            RuleOrigin::Environment(name) => write!(f, "env:{name}"),
            RuleOrigin::Local => f.write_str("local"),
        }
    }
}

impl Serialize for RuleOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rule counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    pub off: usize,
    pub warn: usize,
    pub error: usize,
}

impl SeveritySummary {
    pub fn total(&self) -> usize {
        self.off + self.warn + self.error
    }

    pub fn enabled(&self) -> usize {
        self.warn + self.error
    }

    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Off => self.off += 1,
            Severity::Warn => self.warn += 1,
            Severity::Error => self.error += 1,
        }
    }
}

impl fmt::Display for SeveritySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rules: {} error, {} warn, {} off",
            self.total(),
            self.error,
            self.warn,
            self.off
        )
    }
}

/// Effective configuration produced by resolution.
///
/// Immutable once built; a changed descriptor means a fresh resolution.
/// All maps are ordered so that serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub root: bool,

    /// Extends chain as listed in the descriptor
    pub extends: Vec<String>,

    pub env: BTreeMap<String, bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    /// Parser settings other than the parser itself
    pub parser_options: BTreeMap<String, Value>,

    pub rules: BTreeMap<RuleId, RuleSetting>,

    /// Which layer wrote each rule's final value
    pub origins: BTreeMap<RuleId, RuleOrigin>,
}

impl EffectiveConfig {
    pub fn rule(&self, id: &str) -> Option<&RuleSetting> {
        self.rules.get(id)
    }

    pub fn severity(&self, id: &str) -> Option<Severity> {
        self.rule(id).map(|setting| setting.severity)
    }

    pub fn origin(&self, id: &str) -> Option<&RuleOrigin> {
        self.origins.get(id)
    }

    /// Whether a rule is configured at `warn` or `error`
    pub fn is_enabled(&self, id: &str) -> bool {
        self.severity(id).is_some_and(|s| s.is_enabled())
    }

    pub fn is_env_enabled(&self, name: &str) -> bool {
        self.env.get(name).copied().unwrap_or(false)
    }

    /// Rules that will actually run, in identifier order
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&RuleId, &RuleSetting)> {
        self.rules
            .iter()
            .filter(|(_, setting)| setting.severity.is_enabled())
    }

    pub fn summary(&self) -> SeveritySummary {
        let mut summary = SeveritySummary::default();
        for setting in self.rules.values() {
            summary.record(setting.severity);
        }
        summary
    }
}
