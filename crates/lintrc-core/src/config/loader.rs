//! Configuration file discovery and loading

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::descriptor::RootConfigDescriptor;
use super::rulesets::RuleSetRegistry;
use crate::error::LintrcError;
use crate::result::Result;

/// Descriptor file names, in discovery priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".lintrc.json",
    ".lintrc.jsonc",
    ".lintrc.yaml",
    ".lintrc.yml",
    ".lintrc.toml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a descriptor by traversing upward from start_path
    ///
    /// Within one directory the names in [`CONFIG_FILE_NAMES`] are tried in
    /// order; the first directory containing any of them wins.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| LintrcError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load a root descriptor from a specific file
    pub fn load_descriptor(path: &Path) -> Result<RootConfigDescriptor> {
        Self::parse_file(path)
    }

    /// Load a rule-set registry from a specific file
    pub fn load_rule_sets(path: &Path) -> Result<RuleSetRegistry> {
        Self::parse_file(path)
    }

    /// Load several registry files, later files replacing same-named entries
    pub fn load_rule_set_files<P: AsRef<Path>>(paths: &[P]) -> Result<RuleSetRegistry> {
        let mut registry = RuleSetRegistry::new();
        for path in paths {
            registry.merge_with(Self::load_rule_sets(path.as_ref())?);
        }
        Ok(registry)
    }

    /// Load descriptor from path or auto-discover
    ///
    /// If a custom path is provided, loads from that path. Otherwise searches
    /// upward from `start_dir` (or the current directory).
    pub fn load(
        custom_path: Option<&Path>,
        start_dir: Option<&Path>,
    ) -> Result<(PathBuf, RootConfigDescriptor)> {
        let config_path = match custom_path {
            Some(path) => {
                if !path.exists() {
                    return Err(LintrcError::config_error(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
                Self::auto_discover(search_dir)?.ok_or_else(|| {
                    LintrcError::config_error(format!(
                        "No config file found ({}). Run 'lintrc config init' to create one",
                        CONFIG_FILE_NAMES.join(", ")
                    ))
                })?
            }
        };

        let descriptor = Self::load_descriptor(&config_path)?;
        Ok((config_path, descriptor))
    }

    fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = fs::read_to_string(path).map_err(|e| LintrcError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed = match ext {
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("jsonc") | Some("json5") => json5::from_str(&content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => Err(
                "Unsupported file extension (expected .json, .jsonc, .yaml, .yml or .toml)"
                    .to_string(),
            ),
        };

        parsed.map_err(|message| {
            LintrcError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                message
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtendsResolver, RuleEntry, Severity};
    use crate::error::ErrorKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            ".lintrc.json",
            r#"{
                "root": true,
                "env": {"node": true},
                "extends": ["base-style"],
                "rules": {"quotes": "off", "no-console": "warn"}
            }"#,
        );

        let descriptor = ConfigLoader::load_descriptor(&path).unwrap();
        assert!(descriptor.root);
        assert_eq!(descriptor.extends, vec!["base-style"]);
        assert_eq!(descriptor.rules["quotes"], RuleEntry::from(Severity::Off));
    }

    #[test]
    fn test_load_jsonc_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            ".lintrc.jsonc",
            r#"{
                // stylistic checks are left to the formatter
                "rules": {
                    "semi": "off",
                    "comma-dangle": ["error", "never"],
                },
            }"#,
        );

        let descriptor = ConfigLoader::load_descriptor(&path).unwrap();
        assert_eq!(
            descriptor.rules["comma-dangle"],
            RuleEntry::Static(json!(["error", "never"]))
        );
    }

    #[test]
    fn test_load_yaml_descriptor_with_conditional() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            ".lintrc.yaml",
            r#"
extends: base-style
parserOptions:
  parser: "@babel/eslint-parser"
rules:
  no-debugger:
    when:
      var: NODE_ENV
      equals: production
    then: warn
    else: "off"
"#,
        );

        let descriptor = ConfigLoader::load_descriptor(&path).unwrap();
        assert_eq!(descriptor.extends, vec!["base-style"]);
        assert_eq!(descriptor.declared_parser(), Some("@babel/eslint-parser"));
        assert!(descriptor.rules["no-debugger"].is_conditional());
    }

    #[test]
    fn test_load_toml_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            ".lintrc.toml",
            r#"
extends = ["base-style"]
allowParserOverride = true

[env]
node = true

[rules]
quotes = "off"
"new-cap" = 0
"#,
        );

        let descriptor = ConfigLoader::load_descriptor(&path).unwrap();
        assert!(descriptor.allow_parser_override);
        assert_eq!(descriptor.rules["new-cap"], RuleEntry::Static(json!(0)));
    }

    #[test]
    fn test_load_rule_set_files_merge() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_temp_config(
            temp_dir.path(),
            "base.yaml",
            "ruleSets:\n  base-style:\n    rules:\n      semi: error\n",
        );
        let second = create_temp_config(
            temp_dir.path(),
            "team.json",
            r#"{"ruleSets": {"base-style": {"rules": {"semi": "warn"}}, "team": {}}}"#,
        );

        let registry = ConfigLoader::load_rule_set_files(&[first, second]).unwrap();
        let fragment = registry.lookup("base-style").unwrap();
        assert_eq!(fragment.rules["semi"], RuleEntry::from(Severity::Warn));
        assert!(registry.lookup("team").is_ok());
    }

    #[test]
    fn test_auto_discover_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), ".lintrc.yaml", "root: true\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".lintrc.yaml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), ".lintrc.toml", "root = true\n");
        create_temp_config(temp_dir.path(), ".lintrc.json", r#"{"root": true}"#);
        create_temp_config(temp_dir.path(), ".lintrc.yml", "root: true\n");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".lintrc.json");
    }

    #[test]
    fn test_load_with_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "custom.yml", "env:\n  node: true\n");

        let (found, descriptor) = ConfigLoader::load(Some(&path), None).unwrap();
        assert_eq!(found, path);
        assert_eq!(descriptor.env.get("node"), Some(&true));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = ConfigLoader::load(Some(Path::new("nonexistent.json")), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = ConfigLoader::load_descriptor(Path::new("nonexistent.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "invalid.json", r#"{ invalid json }"#);

        let err = ConfigLoader::load_descriptor(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("invalid.json"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "lintrc.ini", "root=true");

        let err = ConfigLoader::load_descriptor(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
