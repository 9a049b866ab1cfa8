//! Evaluation context for conditional rule entries
//!
//! A read-only set of named values (typically captured from the process
//! environment by the host) that conditional entries are evaluated against.
//! Resolution never reads the process environment itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use tracing::trace;

/// A string or boolean condition value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    String(String),
}

impl ContextValue {
    /// Canonical string form used for `equals` comparisons
    pub fn canonical(&self) -> &str {
        match self {
            ContextValue::Bool(true) => "true",
            ContextValue::Bool(false) => "false",
            ContextValue::String(s) => s,
        }
    }

    /// Truthiness used by conditions without an `equals` clause
    pub fn is_truthy(&self) -> bool {
        match self {
            ContextValue::Bool(b) => *b,
            ContextValue::String(s) => !(s.is_empty() || s == "0" || s == "false"),
        }
    }

    /// Parse a `--define` style value: `true`/`false` become booleans
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => ContextValue::Bool(true),
            "false" => ContextValue::Bool(false),
            other => ContextValue::String(other.to_string()),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

/// Named values consulted by conditional rule entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationContext {
    values: BTreeMap<String, ContextValue>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a context from string pairs, all values kept as strings
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = vars
            .into_iter()
            .map(|(k, v)| (k.into(), ContextValue::String(v.into())))
            .collect();
        Self { values }
    }

    /// Build a context from OS string pairs.
    ///
    /// Pairs whose name or value is not valid UTF-8 cannot be named by a
    /// condition and are skipped.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(vars.into_iter().filter_map(|(k, v)| {
            match (k.into_string(), v.into_string()) {
                (Ok(k), Ok(v)) => Some((k, v)),
                (k, _) => {
                    trace!("Skipping non UTF-8 environment variable {:?}", k);
                    None
                }
            }
        }))
    }

    /// Snapshot of the current process environment
    pub fn from_process_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Overlay another context on top of this one (other wins)
    pub fn extend(&mut self, other: EvaluationContext) {
        self.values.extend(other.values);
    }
}
