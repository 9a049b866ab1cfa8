//! Output formatting for effective configurations

use colored::*;
use lintrc_core::{EffectiveConfig, LintrcError, Result, Severity};
use serde::Serialize;
use std::path::PathBuf;

use crate::OutputFormat;

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Print resolved configurations in argument order.
    ///
    /// With `keyed` set, machine formats emit one document mapping each
    /// descriptor path to its configuration; human output gets a header per
    /// path instead.
    pub fn print_configs(
        &self,
        configs: &[(PathBuf, EffectiveConfig)],
        keyed: bool,
    ) -> Result<()> {
        if !keyed {
            for (_, config) in configs {
                println!("{}", self.render(config)?);
            }
            return Ok(());
        }

        match self.format {
            OutputFormat::Human => {
                for (path, config) in configs {
                    let header = path.display().to_string();
                    if self.use_colors {
                        println!("{}", header.bold().underline());
                    } else {
                        println!("{header}");
                    }
                    println!("{}", self.render_human(config));
                }
            }
            _ => println!("{}", self.render_keyed(configs)?),
        }
        Ok(())
    }

    /// Render a configuration in the configured format
    pub fn render(&self, config: &EffectiveConfig) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.render_human(config)),
            _ => self.render_document(config),
        }
    }

    /// Render several configurations as one document keyed by path
    pub fn render_keyed(&self, configs: &[(PathBuf, EffectiveConfig)]) -> Result<String> {
        let mut document = serde_json::Map::new();
        for (path, config) in configs {
            let value = serde_json::to_value(config).map_err(|e| {
                LintrcError::internal_error(format!("Failed to serialize configuration: {e}"))
            })?;
            document.insert(path.display().to_string(), value);
        }
        self.render_document(&document)
    }

    fn render_document<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json | OutputFormat::Human => serde_json::to_string_pretty(value)
                .map_err(|e| LintrcError::internal_error(format!("Failed to serialize JSON: {e}"))),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| LintrcError::internal_error(format!("Failed to serialize YAML: {e}"))),
            OutputFormat::Toml => toml::to_string_pretty(value)
                .map_err(|e| LintrcError::internal_error(format!("Failed to serialize TOML: {e}"))),
        }
    }

    fn render_human(&self, config: &EffectiveConfig) -> String {
        let mut lines = Vec::new();

        let extends = if config.extends.is_empty() {
            "(none)".to_string()
        } else {
            config.extends.join(", ")
        };
        lines.push(format!("{} {}", self.label("extends:"), extends));

        let enabled_envs: Vec<&str> = config
            .env
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
            .collect();
        let env = if enabled_envs.is_empty() {
            "(none)".to_string()
        } else {
            enabled_envs.join(", ")
        };
        lines.push(format!("{} {}", self.label("env:"), env));

        lines.push(format!(
            "{} {}",
            self.label("parser:"),
            config.parser.as_deref().unwrap_or("(default)")
        ));

        if !config.parser_options.is_empty() {
            let settings: Vec<String> = config
                .parser_options
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            lines.push(format!(
                "{} {}",
                self.label("parserOptions:"),
                settings.join(", ")
            ));
        }

        lines.push(self.label("rules:"));
        for (id, setting) in &config.rules {
            let mut line = format!("  {} {}", self.severity(setting.severity), id);
            for option in &setting.options {
                line.push(' ');
                line.push_str(&option.to_string());
            }
            if let Some(origin) = config.origin(id.as_str()) {
                let origin = format!("({origin})");
                if self.use_colors {
                    line.push_str(&format!(" {}", origin.dimmed()));
                } else {
                    line.push(' ');
                    line.push_str(&origin);
                }
            }
            lines.push(line);
        }

        lines.push(config.summary().to_string());
        lines.join("\n")
    }

    fn label(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn severity(&self, severity: Severity) -> String {
        let padded = format!("{:<5}", severity.as_str());
        if !self.use_colors {
            return padded;
        }
        match severity {
            Severity::Error => padded.red().bold().to_string(),
            Severity::Warn => padded.yellow().to_string(),
            Severity::Off => padded.dimmed().to_string(),
        }
    }
}
