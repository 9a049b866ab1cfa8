//! Configuration system for lintrc
//!
//! This module turns a layered lint configuration into one effective rule
//! table:
//! - Root descriptors in JSON, JSONC, YAML or TOML with upward auto-discovery
//! - Inheritance through an ordered `extends` chain of named rule-sets
//! - Environment flags whose implied settings come from the rule-set source
//! - A single parser selection with conflict detection
//! - Conditional rule entries evaluated once against an explicit context
//!
//! ## Resolution order
//!
//! Each layer overwrites keys set by earlier ones (last write wins per rule,
//! option payloads are replaced, never deep-merged):
//!
//! 1. `extends` entries, in listed order
//! 2. fragments implied by enabled environments
//! 3. the local `parserOptions` block
//! 4. the local `rules` overrides
//!
//! The merged table is then evaluated against the [`EvaluationContext`] and
//! validated; every invalid severity is reported in a single error.
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "root": true,
//!   "env": { "node": true },
//!   "extends": ["base-style"],
//!   "rules": {
//!     "quotes": "off",
//!     "no-console": "warn"
//!   }
//! }
//! ```

mod context;
mod descriptor;
mod effective;
mod fragment;
mod loader;
mod merge;
mod resolver;
mod rule;
mod rulesets;
mod severity;

pub use context::{ContextValue, EvaluationContext};
pub use descriptor::{ParserOptions, RootConfigDescriptor};
pub use effective::{EffectiveConfig, RuleOrigin, SeveritySummary};
pub use fragment::ConfigFragment;
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use resolver::{ConfigResolver, ExtendsResolver, resolve};
pub use rule::{Condition, ConditionalEntry, RuleEntry, RuleId, RuleSetting};
pub use rulesets::{CachedExtendsResolver, RuleSetRegistry};
pub use severity::Severity;

/// JSON schema of the root descriptor file
pub fn descriptor_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(RootConfigDescriptor))
        .unwrap_or(serde_json::Value::Null)
}
