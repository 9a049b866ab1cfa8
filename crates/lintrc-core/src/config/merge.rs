//! Layer merging logic
//!
//! Every layer is overlaid key by key onto an accumulator: a key present in
//! the incoming layer replaces the accumulated value, keys it does not
//! mention are left untouched. Option payloads are never merged recursively.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::descriptor::ParserOptions;
use super::effective::RuleOrigin;
use super::fragment::ConfigFragment;
use super::rule::{RuleEntry, RuleId};
use crate::error::ResolveError;

/// A parser together with the layer that declared it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParserDeclaration {
    pub parser: String,
    pub source: String,
}

/// Merge state carried between resolution stages
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    pub env: BTreeMap<String, bool>,
    pub parser: Option<ParserDeclaration>,
    pub parser_options: BTreeMap<String, Value>,
    pub rules: BTreeMap<RuleId, (RuleEntry, RuleOrigin)>,
}

impl Accumulator {
    /// Overlay a fragment returned by the lookup source.
    ///
    /// Environment fragments pass `include_env = false`: only the
    /// declaration decides which environments are active.
    pub fn overlay_fragment(
        &mut self,
        fragment: ConfigFragment,
        origin: RuleOrigin,
        include_env: bool,
        allow_parser_override: bool,
    ) -> Result<(), ResolveError> {
        if include_env {
            self.overlay_env(&fragment.env);
        }

        if let Some(options) = &fragment.parser_options {
            self.overlay_parser_options(options, origin.to_string(), allow_parser_override)?;
        }

        for (id, entry) in fragment.rules {
            self.rules.insert(id, (entry, origin.clone()));
        }

        Ok(())
    }

    pub fn overlay_env(&mut self, env: &BTreeMap<String, bool>) {
        for (name, enabled) in env {
            self.env.insert(name.clone(), *enabled);
        }
    }

    pub fn overlay_parser_options(
        &mut self,
        options: &ParserOptions,
        source: String,
        allow_parser_override: bool,
    ) -> Result<(), ResolveError> {
        if let Some(parser) = &options.parser {
            self.declare_parser(parser, source, allow_parser_override)?;
        }
        for (key, value) in &options.settings {
            self.parser_options.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    pub fn overlay_rules<'a>(
        &mut self,
        rules: impl IntoIterator<Item = (&'a RuleId, &'a RuleEntry)>,
        origin: &RuleOrigin,
    ) {
        for (id, entry) in rules {
            self.rules
                .insert(id.clone(), (entry.clone(), origin.clone()));
        }
    }

    /// Record a parser declaration.
    ///
    /// Identical re-declarations are accepted (the later source is kept).
    /// A different parser is a conflict unless overriding is allowed, in
    /// which case the later declaration wins.
    pub fn declare_parser(
        &mut self,
        parser: &str,
        source: String,
        allow_parser_override: bool,
    ) -> Result<(), ResolveError> {
        if let Some(current) = &self.parser
            && current.parser != parser
        {
            if !allow_parser_override {
                return Err(ResolveError::ConflictingParser {
                    inherited: current.parser.clone(),
                    inherited_from: current.source.clone(),
                    declared: parser.to_string(),
                    declared_from: source,
                });
            }
            warn!(
                "Parser '{}' from {} overrides '{}' from {}",
                parser,
                source,
                current.parser,
                current.source
            );
        }

        self.parser = Some(ParserDeclaration {
            parser: parser.to_string(),
            source,
        });
        Ok(())
    }
}
