//! Root configuration descriptor and the parser-options block
//!
//! ## Example (`.lintrc.json`)
//!
//! ```jsonc
//! {
//!   "root": true,
//!   "env": { "node": true },
//!   "extends": ["plugin:vue/essential", "@vue/standard"],
//!   "parserOptions": { "parser": "@babel/eslint-parser" },
//!   "rules": {
//!     "no-console": {
//!       "when": { "var": "NODE_ENV", "equals": "production" },
//!       "then": "warn",
//!       "else": "off"
//!     },
//!     "comma-dangle": ["error", "never"],
//!     "quotes": "off"
//!   }
//! }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::rule::{RuleEntry, RuleId};

/// Parser selection plus parser-specific settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    /// Parser reference (module or package name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Parser used to read sources")]
    pub parser: Option<String>,

    /// Remaining parser settings, opaque to resolution
    #[serde(flatten)]
    pub settings: BTreeMap<String, Value>,
}

impl ParserOptions {
    pub fn with_parser(parser: impl Into<String>) -> Self {
        Self {
            parser: Some(parser.into()),
            settings: BTreeMap::new(),
        }
    }
}

/// The input to resolution: one project's configuration as written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RootConfigDescriptor {
    /// JSON schema reference (ignored)
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Marks the top of a configuration hierarchy
    #[serde(default)]
    #[schemars(description = "Marks this file as the root configuration")]
    pub root: bool,

    /// Base rule-sets in precedence order (later entries win)
    #[serde(default, deserialize_with = "one_or_many")]
    #[schemars(with = "RuleSetNames")]
    #[schemars(description = "Named rule-sets to inherit, later entries take precedence")]
    pub extends: Vec<String>,

    /// Environment declaration
    #[serde(default)]
    #[schemars(description = "Runtime environments, e.g. { \"node\": true }")]
    pub env: BTreeMap<String, bool>,

    /// Parser selection and settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<ParserOptions>,

    /// Let the local parser replace a different inherited one
    #[serde(default)]
    #[schemars(description = "Allow the local parser to replace an inherited parser")]
    pub allow_parser_override: bool,

    /// Local rule overrides, applied last
    #[serde(default)]
    #[schemars(description = "Rule overrides: severity, [severity, ...options] or a conditional")]
    pub rules: BTreeMap<RuleId, RuleEntry>,
}

impl RootConfigDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(mut self, name: impl Into<String>) -> Self {
        self.extends.push(name.into());
        self
    }

    pub fn env(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.env.insert(name.into(), enabled);
        self
    }

    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.parser_options
            .get_or_insert_with(ParserOptions::default)
            .parser = Some(parser.into());
        self
    }

    pub fn allow_parser_override(mut self, allow: bool) -> Self {
        self.allow_parser_override = allow;
        self
    }

    pub fn rule(mut self, id: impl Into<RuleId>, entry: impl Into<RuleEntry>) -> Self {
        self.rules.insert(id.into(), entry.into());
        self
    }

    /// Declared local parser, if any
    pub fn declared_parser(&self) -> Option<&str> {
        self.parser_options
            .as_ref()
            .and_then(|p| p.parser.as_deref())
    }
}

/// On-disk form of `extends`: one rule-set name or a list of them
#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum RuleSetNames {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RuleSetNames::deserialize(deserializer)? {
        RuleSetNames::One(name) => vec![name],
        RuleSetNames::Many(names) => names,
    })
}
