//! Error types for configuration loading and resolution

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::RuleId;

/// A rule whose resolved severity is not one of `off`, `warn`, `error`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityViolation {
    /// Offending rule
    pub rule: RuleId,
    /// The rejected value, rendered as JSON
    pub value: String,
}

impl fmt::Display for SeverityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.rule, self.value)
    }
}

fn render_violations(violations: &[SeverityViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures produced while resolving a descriptor into an effective config.
///
/// Every variant is fatal for the resolution that raised it: no partial
/// configuration is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A named base rule-set could not be located
    #[error("Unresolved extends: no rule-set named '{name}'")]
    UnresolvedExtends { name: String },

    /// One or more rules carry a severity outside the recognized set
    #[error(
        "Invalid severity for {} rule(s): {}",
        .violations.len(),
        render_violations(.violations)
    )]
    InvalidSeverity { violations: Vec<SeverityViolation> },

    /// Two layers declared different parsers
    #[error(
        "Conflicting parsers: '{inherited}' (from {inherited_from}) and '{declared}' (from {declared_from})"
    )]
    ConflictingParser {
        inherited: String,
        inherited_from: String,
        declared: String,
        declared_from: String,
    },

    /// The lookup source failed for a reason other than an unknown name
    #[error("Lookup of '{name}' failed: {message}")]
    Lookup { name: String, message: String },
}

impl ResolveError {
    /// Create an unresolved-extends error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedExtends { name: name.into() }
    }

    /// Create a lookup failure
    pub fn lookup(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lookup {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Rules named by an aggregate severity failure (empty for other variants)
    pub fn offending_rules(&self) -> Vec<&RuleId> {
        match self {
            Self::InvalidSeverity { violations } => violations.iter().map(|v| &v.rule).collect(),
            _ => Vec::new(),
        }
    }
}

/// Main error type for lintrc operations
#[derive(Debug, Error)]
pub enum LintrcError {
    /// Configuration loading or discovery errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resolution failures
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Resolve,
    Internal,
}

impl LintrcError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintrcError::ConfigError { .. } => ErrorKind::Config,
            LintrcError::IoError { .. } => ErrorKind::Io,
            LintrcError::Resolve(_) => ErrorKind::Resolve,
            LintrcError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for LintrcError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
