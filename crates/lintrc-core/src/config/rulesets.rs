//! Rule-set sources
//!
//! [`RuleSetRegistry`] is an in-memory [`ExtendsResolver`], usually loaded
//! from one or more registry files:
//!
//! ```yaml
//! ruleSets:
//!   base-style:
//!     rules:
//!       quotes: error
//!       semi: error
//! environments:
//!   node:
//!     rules:
//!       no-process-exit: error
//! ```
//!
//! [`CachedExtendsResolver`] memoizes lookups of any other resolver across
//! resolutions.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use super::fragment::ConfigFragment;
use super::resolver::ExtendsResolver;
use crate::error::ResolveError;

/// Named rule-sets and environment fragments held in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetRegistry {
    #[serde(default)]
    pub rule_sets: BTreeMap<String, ConfigFragment>,

    #[serde(default)]
    pub environments: BTreeMap<String, ConfigFragment>,
}

impl RuleSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule_set(mut self, name: impl Into<String>, fragment: ConfigFragment) -> Self {
        self.insert_rule_set(name, fragment);
        self
    }

    pub fn with_environment(mut self, name: impl Into<String>, fragment: ConfigFragment) -> Self {
        self.insert_environment(name, fragment);
        self
    }

    pub fn insert_rule_set(&mut self, name: impl Into<String>, fragment: ConfigFragment) {
        self.rule_sets.insert(name.into(), fragment);
    }

    pub fn insert_environment(&mut self, name: impl Into<String>, fragment: ConfigFragment) {
        self.environments.insert(name.into(), fragment);
    }

    /// Combine with another registry; its entries replace same-named ones
    pub fn merge_with(&mut self, other: RuleSetRegistry) {
        self.rule_sets.extend(other.rule_sets);
        self.environments.extend(other.environments);
    }

    pub fn rule_set_names(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty() && self.environments.is_empty()
    }
}

impl ExtendsResolver for RuleSetRegistry {
    fn lookup(&self, name: &str) -> Result<ConfigFragment, ResolveError> {
        self.rule_sets
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::unresolved(name))
    }

    fn environment(&self, name: &str) -> Result<Option<ConfigFragment>, ResolveError> {
        Ok(self.environments.get(name).cloned())
    }
}

/// Memoizing wrapper around another lookup source.
///
/// Successful lookups are cached per name; failures are never cached, so a
/// corrected source is picked up on the next call.
#[derive(Debug)]
pub struct CachedExtendsResolver<R> {
    inner: R,
    rule_sets: DashMap<String, ConfigFragment>,
    environments: DashMap<String, Option<ConfigFragment>>,
}

impl<R: ExtendsResolver> CachedExtendsResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            rule_sets: DashMap::new(),
            environments: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached rule-set and environment entries
    pub fn cached_len(&self) -> usize {
        self.rule_sets.len() + self.environments.len()
    }

    /// Drop one cached name (rule-set and environment alike)
    pub fn invalidate(&self, name: &str) {
        self.rule_sets.remove(name);
        self.environments.remove(name);
    }

    pub fn clear(&self) {
        self.rule_sets.clear();
        self.environments.clear();
    }
}

impl<R: ExtendsResolver> ExtendsResolver for CachedExtendsResolver<R> {
    fn lookup(&self, name: &str) -> Result<ConfigFragment, ResolveError> {
        if let Some(hit) = self.rule_sets.get(name) {
            trace!("Rule-set cache hit: {}", name);
            return Ok(hit.value().clone());
        }

        let fragment = self.inner.lookup(name)?;
        self.rule_sets.insert(name.to_string(), fragment.clone());
        Ok(fragment)
    }

    fn environment(&self, name: &str) -> Result<Option<ConfigFragment>, ResolveError> {
        if let Some(hit) = self.environments.get(name) {
            trace!("Environment cache hit: {}", name);
            return Ok(hit.value().clone());
        }

        let fragment = self.inner.environment(name)?;
        self.environments.insert(name.to_string(), fragment.clone());
        Ok(fragment)
    }
}
