//! Configuration resolution
//!
//! Turns a [`RootConfigDescriptor`] into an [`EffectiveConfig`] by applying,
//! in this fixed order:
//!
//! 1. the `extends` chain, in listed order (later rule-sets win);
//! 2. fragments implied by each enabled environment;
//! 3. the local parser-options block;
//! 4. the local rule overrides;
//! 5. conditional evaluation and severity validation of the merged table.
//!
//! Resolution is pure: the only outside calls are read-only lookups through
//! the [`ExtendsResolver`] and reads of the [`EvaluationContext`].

use std::sync::Arc;
use tracing::{debug, trace};

use super::context::EvaluationContext;
use super::descriptor::RootConfigDescriptor;
use super::effective::{EffectiveConfig, RuleOrigin};
use super::fragment::ConfigFragment;
use super::merge::Accumulator;
use super::rule::RuleSetting;
use crate::error::{ResolveError, SeverityViolation};

const LOCAL_PARSER_SOURCE: &str = "local parserOptions";

/// Source of named base rule-sets and environment fragments
pub trait ExtendsResolver: Send + Sync {
    /// Look up a base rule-set by name.
    ///
    /// Unknown names must fail with [`ResolveError::UnresolvedExtends`].
    fn lookup(&self, name: &str) -> Result<ConfigFragment, ResolveError>;

    /// Settings implied by an enabled environment; `None` implies nothing
    fn environment(&self, _name: &str) -> Result<Option<ConfigFragment>, ResolveError> {
        Ok(None)
    }
}

impl<T: ExtendsResolver + ?Sized> ExtendsResolver for &T {
    fn lookup(&self, name: &str) -> Result<ConfigFragment, ResolveError> {
        (**self).lookup(name)
    }

    fn environment(&self, name: &str) -> Result<Option<ConfigFragment>, ResolveError> {
        (**self).environment(name)
    }
}

impl<T: ExtendsResolver + ?Sized> ExtendsResolver for Box<T> {
    fn lookup(&self, name: &str) -> Result<ConfigFragment, ResolveError> {
        (**self).lookup(name)
    }

    fn environment(&self, name: &str) -> Result<Option<ConfigFragment>, ResolveError> {
        (**self).environment(name)
    }
}

impl<T: ExtendsResolver + ?Sized> ExtendsResolver for Arc<T> {
    fn lookup(&self, name: &str) -> Result<ConfigFragment, ResolveError> {
        (**self).lookup(name)
    }

    fn environment(&self, name: &str) -> Result<Option<ConfigFragment>, ResolveError> {
        (**self).environment(name)
    }
}

/// Resolver bound to a lookup source and an evaluation context
#[derive(Debug, Clone)]
pub struct ConfigResolver<R> {
    lookup: R,
    context: EvaluationContext,
}

impl<R: ExtendsResolver> ConfigResolver<R> {
    pub fn new(lookup: R) -> Self {
        Self {
            lookup,
            context: EvaluationContext::default(),
        }
    }

    pub fn with_context(mut self, context: EvaluationContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    pub fn lookup(&self) -> &R {
        &self.lookup
    }

    /// Resolve a descriptor against this resolver's lookup and context
    pub fn resolve(&self, descriptor: &RootConfigDescriptor) -> Result<EffectiveConfig, ResolveError> {
        resolve(descriptor, &self.lookup, &self.context)
    }
}

/// Resolve a descriptor into an effective configuration.
///
/// Either the whole configuration resolves or an error is returned; partial
/// results are never produced.
pub fn resolve<R: ExtendsResolver + ?Sized>(
    descriptor: &RootConfigDescriptor,
    lookup: &R,
    context: &EvaluationContext,
) -> Result<EffectiveConfig, ResolveError> {
    let allow_override = descriptor.allow_parser_override;
    let mut acc = Accumulator::default();

    for name in &descriptor.extends {
        let fragment = lookup.lookup(name)?;
        debug!(
            "Overlaying rule-set '{}' ({} rules)",
            name,
            fragment.rules.len()
        );
        acc.overlay_fragment(
            fragment,
            RuleOrigin::Extends(name.clone()),
            true,
            allow_override,
        )?;
    }

    acc.overlay_env(&descriptor.env);
    let enabled_envs: Vec<String> = acc
        .env
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(name, _)| name.clone())
        .collect();
    for name in enabled_envs {
        match lookup.environment(&name)? {
            Some(fragment) => {
                debug!(
                    "Overlaying environment '{}' ({} rules)",
                    name,
                    fragment.rules.len()
                );
                acc.overlay_fragment(
                    fragment,
                    RuleOrigin::Environment(name),
                    false,
                    allow_override,
                )?;
            }
            None => trace!("Environment '{}' implies no settings", name),
        }
    }

    if let Some(options) = &descriptor.parser_options {
        acc.overlay_parser_options(options, LOCAL_PARSER_SOURCE.to_string(), allow_override)?;
    }

    debug!("Overlaying {} local rule overrides", descriptor.rules.len());
    acc.overlay_rules(&descriptor.rules, &RuleOrigin::Local);

    let mut config = EffectiveConfig {
        root: descriptor.root,
        extends: descriptor.extends.clone(),
        env: acc.env,
        parser: acc.parser.map(|decl| decl.parser),
        parser_options: acc.parser_options,
        ..EffectiveConfig::default()
    };

    let mut violations = Vec::new();
    for (id, (entry, origin)) in acc.rules {
        if entry.is_conditional() {
            trace!("Evaluating conditional entry for '{}'", id);
        }
        let value = entry.evaluate(context);
        match RuleSetting::from_value(value) {
            Some(setting) => {
                config.rules.insert(id.clone(), setting);
                config.origins.insert(id, origin);
            }
            None => violations.push(SeverityViolation {
                rule: id,
                value: value.to_string(),
            }),
        }
    }

    if !violations.is_empty() {
        return Err(ResolveError::InvalidSeverity { violations });
    }

    debug!("Resolved configuration: {}", config.summary());
    Ok(config)
}
