//! Partial configurations returned by an [`ExtendsResolver`](super::ExtendsResolver)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::descriptor::ParserOptions;
use super::rule::{RuleEntry, RuleId};

/// A named rule-set or an environment's implied settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFragment {
    /// Environment flags implied by this rule-set
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, bool>,

    /// Parser selection and settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<ParserOptions>,

    /// Rule settings contributed by this fragment
    #[serde(default)]
    pub rules: BTreeMap<RuleId, RuleEntry>,
}

impl ConfigFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, id: impl Into<RuleId>, entry: impl Into<RuleEntry>) -> Self {
        self.rules.insert(id.into(), entry.into());
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

    pub fn declared_parser(&self) -> Option<&str> {
        self.parser_options
            .as_ref()
            .and_then(|p| p.parser.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.env.is_empty() && self.parser_options.is_none() && self.rules.is_empty()
    }
}
