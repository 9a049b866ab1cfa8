//! CLI command implementations

use lintrc_core::config::{ContextValue, descriptor_schema};
use lintrc_core::{
    CachedExtendsResolver, ConfigLoader, ConfigResolver, EffectiveConfig, EvaluationContext,
    LintrcError, Result, RuleSetRegistry,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::output::OutputFormatter;
use crate::{ConfigFormat, OutputFormat};

type SharedResolver = ConfigResolver<CachedExtendsResolver<RuleSetRegistry>>;

/// Options shared by every command that resolves a configuration
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub config: Option<PathBuf>,
    pub rulesets: Vec<PathBuf>,
    pub defines: Vec<(String, String)>,
    pub no_env: bool,
    pub allow_parser_override: bool,
}

impl ResolveOptions {
    /// Process environment (unless disabled) overlaid with `--define` entries
    pub fn context(&self) -> EvaluationContext {
        let mut context = if self.no_env {
            EvaluationContext::new()
        } else {
            EvaluationContext::from_process_env()
        };
        for (key, value) in &self.defines {
            context.insert(key.clone(), ContextValue::parse(value));
        }
        context
    }

    fn build_resolver(&self) -> Result<SharedResolver> {
        let registry = ConfigLoader::load_rule_set_files(&self.rulesets)?;
        debug!(
            "Loaded {} rule-set(s) from {} file(s)",
            registry.rule_set_names().count(),
            self.rulesets.len()
        );
        Ok(ConfigResolver::new(CachedExtendsResolver::new(registry)).with_context(self.context()))
    }

    /// Descriptor path for a command target: a file, a directory to search
    /// upward from, or `--config`/discovery from the current directory
    fn locate(&self, target: Option<&Path>) -> Result<PathBuf> {
        match target {
            Some(path) if path.is_dir() => Ok(ConfigLoader::load(None, Some(path))?.0),
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(ConfigLoader::load(self.config.as_deref(), None)?.0),
        }
    }
}

fn resolve_file(
    resolver: &SharedResolver,
    path: &Path,
    options: &ResolveOptions,
) -> Result<EffectiveConfig> {
    let mut descriptor = ConfigLoader::load_descriptor(path)?;
    if options.allow_parser_override {
        descriptor.allow_parser_override = true;
    }
    Ok(resolver.resolve(&descriptor)?)
}

/// Resolve command implementation
pub fn resolve_command(
    paths: Vec<PathBuf>,
    format: OutputFormat,
    options: &ResolveOptions,
    use_colors: bool,
) -> Result<()> {
    let start_time = Instant::now();

    let targets = if paths.is_empty() {
        vec![options.locate(None)?]
    } else {
        paths
            .iter()
            .map(|path| options.locate(Some(path)))
            .collect::<Result<Vec<_>>>()?
    };

    let resolver = options.build_resolver()?;
    info!("Resolving {} configuration(s)", targets.len());

    let results: Vec<(PathBuf, Result<EffectiveConfig>)> = targets
        .into_par_iter()
        .map(|path| {
            let result = resolve_file(&resolver, &path, options);
            (path, result)
        })
        .collect();

    let total = results.len();
    let mut resolved = Vec::with_capacity(total);
    let mut failures = 0;

    for (path, result) in results {
        match result {
            Ok(config) => resolved.push((path, config)),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    OutputFormatter::new(format, use_colors).print_configs(&resolved, total > 1)?;

    debug!(
        "Resolved {} configuration(s) in {:?} ({} cached rule-set lookups)",
        total,
        start_time.elapsed(),
        resolver.lookup().cached_len()
    );

    if failures > 0 {
        return Err(LintrcError::config_error(format!(
            "{failures} of {total} configuration(s) failed to resolve"
        )));
    }

    Ok(())
}

/// Explain command implementation
pub fn explain_command(rule: &str, options: &ResolveOptions) -> Result<()> {
    debug!("Explaining rule: {}", rule);

    let path = options.locate(None)?;
    let resolver = options.build_resolver()?;
    let config = resolve_file(&resolver, &path, options)?;

    let (Some(setting), Some(origin)) = (config.rule(rule), config.origin(rule)) else {
        println!("Rule '{rule}' is not configured in {}.", path.display());
        println!();
        println!("Use 'lintrc resolve' to list all configured rules.");
        return Err(LintrcError::config_error(format!(
            "Rule '{rule}' is not configured"
        )));
    };

    println!("Rule: {rule}");
    println!("{}", "=".repeat(rule.len() + 6));
    println!();
    println!("Severity: {}", setting.severity);
    if setting.has_options() {
        let rendered = serde_json::to_string(&setting.options).map_err(|e| {
            LintrcError::internal_error(format!("Failed to serialize options: {e}"))
        })?;
        println!("Options: {rendered}");
    }
    println!("Set by: {origin}");
    println!("Config: {}", path.display());

    Ok(())
}

/// Validate command implementation
pub fn validate_command(path: Option<PathBuf>, options: &ResolveOptions) -> Result<()> {
    debug!("Validating configuration file: {:?}", path);

    let outcome = options.locate(path.as_deref()).and_then(|path| {
        let resolver = options.build_resolver()?;
        resolve_file(&resolver, &path, options).map(|config| (path, config))
    });

    match outcome {
        Ok((path, config)) => {
            println!("✅ Configuration is valid: {}", path.display());
            println!("   {}", config.summary());
            if let Some(parser) = &config.parser {
                println!("   Parser: {parser}");
            }
            Ok(())
        }
        Err(e) => {
            error!("❌ Configuration validation failed: {}", e);
            Err(e)
        }
    }
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".lintrc.json",
        ConfigFormat::Yaml => ".lintrc.yaml",
        ConfigFormat::Toml => ".lintrc.toml",
    };

    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        error!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            filename
        );
        return Err(LintrcError::config_error(format!(
            "Configuration file '{filename}' already exists"
        )));
    }

    let starter = create_starter_config();

    let config_content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&starter)
            .map_err(|e| LintrcError::config_error(format!("Failed to serialize JSON: {e}")))?,
        ConfigFormat::Yaml => serde_yaml::to_string(&starter)
            .map_err(|e| LintrcError::config_error(format!("Failed to serialize YAML: {e}")))?,
        ConfigFormat::Toml => toml::to_string_pretty(&starter)
            .map_err(|e| LintrcError::config_error(format!("Failed to serialize TOML: {e}")))?,
    };

    std::fs::write(&config_path, config_content)
        .map_err(|e| LintrcError::io_error(&config_path, e))?;

    println!("✅ Created configuration file: {filename}");
    println!("   Edit the file to customize your lint rules.");

    Ok(())
}

/// Config schema command implementation
pub fn config_schema_command() -> Result<()> {
    let schema = serde_json::to_string_pretty(&descriptor_schema())
        .map_err(|e| LintrcError::internal_error(format!("Failed to serialize schema: {e}")))?;
    println!("{schema}");
    Ok(())
}

/// Starter descriptor written by `config init`
fn create_starter_config() -> serde_json::Value {
    serde_json::json!({
        "root": true,
        "extends": [],
        "allowParserOverride": false,
        "env": {
            "node": true
        },
        "rules": {
            "comma-dangle": ["error", "never"],
            "no-debugger": "warn",
            "no-console": {
                "when": { "var": "NODE_ENV", "equals": "production" },
                "then": "warn",
                "else": "off"
            }
        }
    })
}
