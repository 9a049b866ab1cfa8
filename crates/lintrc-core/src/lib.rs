//! lintrc core
//!
//! Resolution of layered lint configurations: an `extends` chain of named
//! rule-sets, environment flags, a parser selection and local rule overrides
//! are merged into one deterministic [`EffectiveConfig`].

pub mod config;
pub mod error;
pub mod result;

// Configuration system
pub use config::{
    CachedExtendsResolver, ConfigFragment, ConfigLoader, ConfigResolver, EffectiveConfig,
    EvaluationContext, ExtendsResolver, RootConfigDescriptor, RuleId, RuleOrigin, RuleSetRegistry,
    RuleSetting, Severity, resolve,
};
pub use error::{ErrorKind, LintrcError, ResolveError, SeverityViolation};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintrc=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
