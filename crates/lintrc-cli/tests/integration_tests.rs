//! Integration tests for the lintrc CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const RULE_SETS: &str = r#"
ruleSets:
  base-style:
    parserOptions:
      ecmaVersion: 2020
    rules:
      semi: [error, never]
      quotes: [error, single]
environments:
  node:
    rules:
      no-process-exit: error
"#;

const PROJECT_CONFIG: &str = r#"{
  "root": true,
  "extends": ["base-style"],
  "env": { "node": true },
  "rules": {
    "quotes": "off",
    "no-console": {
      "when": { "var": "NODE_ENV", "equals": "production" },
      "then": "warn",
      "else": "off"
    }
  }
}"#;

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("lintrc").unwrap()
}

/// CLI command running inside `dir` with a deterministic context
fn cli_in(dir: &Path) -> Command {
    let mut cmd = cli();
    cmd.current_dir(dir)
        .args(["--no-env", "--no-color", "-r", "rulesets.yaml"]);
    cmd
}

/// Helper function to create a temporary project with a registry and descriptor
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("rulesets.yaml"), RULE_SETS).unwrap();
    fs::write(temp_dir.path().join(".lintrc.json"), PROJECT_CONFIG).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("merges an extends chain of named rule-sets"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("lintrc {VERSION}")))
        .stdout(predicate::str::contains("Build information:"));
}

#[test]
fn test_resolve_human_output() {
    let project = create_test_project();

    cli_in(project.path())
        .args(["-D", "NODE_ENV=production", "resolve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extends: base-style"))
        .stdout(predicate::str::contains("env: node"))
        .stdout(predicate::str::contains("parserOptions: ecmaVersion=2020"))
        .stdout(predicate::str::contains("  warn  no-console (local)"))
        .stdout(predicate::str::contains("  error no-process-exit (env:node)"))
        .stdout(predicate::str::contains("  off   quotes (local)"))
        .stdout(predicate::str::contains(
            r#"  error semi "never" (extends:base-style)"#,
        ))
        .stdout(predicate::str::contains("4 rules: 2 error, 1 warn, 1 off"));
}

#[test]
fn test_resolve_conditional_else_branch() {
    let project = create_test_project();

    cli_in(project.path())
        .args(["resolve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  off   no-console (local)"));
}

#[test]
fn test_resolve_json_output() {
    let project = create_test_project();

    let output = cli_in(project.path())
        .args(["-D", "NODE_ENV=production", "resolve", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["root"], serde_json::json!(true));
    assert_eq!(config["rules"]["semi"], serde_json::json!(["error", "never"]));
    assert_eq!(config["rules"]["no-console"], serde_json::json!("warn"));
    assert_eq!(config["origins"]["no-process-exit"], serde_json::json!("env:node"));
    assert_eq!(config["parserOptions"]["ecmaVersion"], serde_json::json!(2020));
}

#[test]
fn test_resolve_yaml_output() {
    let project = create_test_project();

    let output = cli_in(project.path())
        .args(["resolve", "-f", "yaml"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(config["rules"]["quotes"].as_str(), Some("off"));
    assert_eq!(config["origins"]["semi"].as_str(), Some("extends:base-style"));
}

#[test]
fn test_resolve_multiple_directories() {
    let first = create_test_project();
    let second = first.path().join("packages/web");
    fs::create_dir_all(&second).unwrap();
    fs::write(
        second.join(".lintrc.yaml"),
        "extends: base-style\nrules:\n  semi: \"off\"\n",
    )
    .unwrap();

    cli_in(first.path())
        .args(["resolve", ".", "packages/web"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".lintrc.json"))
        .stdout(predicate::str::contains(".lintrc.yaml"))
        .stdout(predicate::str::contains("  off   semi (local)"));

    // Machine formats emit one document keyed by descriptor path
    let output = cli_in(first.path())
        .args(["resolve", "-f", "json", ".", "packages/web"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let document: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&output.stdout).unwrap();
    let paths: Vec<&String> = document.keys().collect();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with(".lintrc.json"));
    assert!(paths[1].ends_with(".lintrc.yaml"));
    assert_eq!(
        document[paths[0].as_str()]["rules"]["semi"],
        serde_json::json!(["error", "never"])
    );
    assert_eq!(
        document[paths[1].as_str()]["rules"]["semi"],
        serde_json::json!("off")
    );

    let output = cli_in(first.path())
        .args(["resolve", "-f", "yaml", ".", "packages/web"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let document: serde_yaml::Mapping = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(document.len(), 2);
    let web = document
        .iter()
        .find(|(path, _)| path.as_str().is_some_and(|p| p.ends_with(".lintrc.yaml")))
        .map(|(_, config)| config)
        .unwrap();
    assert_eq!(web["origins"]["semi"].as_str(), Some("local"));
}

#[cfg(unix)]
#[test]
fn test_resolve_with_non_utf8_environment_variable() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let project = create_test_project();

    cli()
        .current_dir(project.path())
        .env("LINTRC_BINARY_VALUE", OsStr::from_bytes(b"f\xffo"))
        .env("NODE_ENV", "production")
        .args(["--no-color", "-r", "rulesets.yaml", "resolve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  warn  no-console (local)"));
}

#[test]
fn test_resolve_unresolved_extends_fails() {
    let project = create_test_project();
    fs::write(
        project.path().join(".lintrc.json"),
        r#"{"extends": ["base-style", "missing"]}"#,
    )
    .unwrap();

    cli_in(project.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unresolved extends: no rule-set named 'missing'",
        ));
}

#[test]
fn test_resolve_reports_every_invalid_severity() {
    let project = create_test_project();
    fs::write(
        project.path().join(".lintrc.json"),
        r#"{"rules": {"a": "loud", "b": "warning", "c": "warn"}}"#,
    )
    .unwrap();

    cli_in(project.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid severity for 2 rule(s)"))
        .stderr(predicate::str::contains("a (\"loud\")"))
        .stderr(predicate::str::contains("b (\"warning\")"));
}

#[test]
fn test_parser_conflict_and_override_flag() {
    let project = create_test_project();
    fs::write(
        project.path().join("rulesets.yaml"),
        "ruleSets:\n  vue:\n    parserOptions:\n      parser: vue-eslint-parser\n",
    )
    .unwrap();
    fs::write(
        project.path().join(".lintrc.json"),
        r#"{"extends": ["vue"], "parserOptions": {"parser": "@babel/eslint-parser"}}"#,
    )
    .unwrap();

    cli_in(project.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conflicting parsers"));

    cli_in(project.path())
        .args(["--allow-parser-override", "resolve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parser: @babel/eslint-parser"));
}

#[test]
fn test_explain_rule() {
    let project = create_test_project();

    cli_in(project.path())
        .args(["explain", "semi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule: semi"))
        .stdout(predicate::str::contains("Severity: error"))
        .stdout(predicate::str::contains(r#"Options: ["never"]"#))
        .stdout(predicate::str::contains("Set by: extends:base-style"));
}

#[test]
fn test_explain_unknown_rule() {
    let project = create_test_project();

    cli_in(project.path())
        .args(["explain", "no-such-rule"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Rule 'no-such-rule' is not configured"));
}

#[test]
fn test_validate_command() {
    let project = create_test_project();

    cli_in(project.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("4 rules: 2 error, 0 warn, 2 off"));
}

#[test]
fn test_validate_missing_config() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["--no-env", "validate", "does-not-exist.json"])
        .assert()
        .failure();
}

#[test]
fn test_config_init_json() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file: .lintrc.json"));
    assert!(temp_dir.path().join(".lintrc.json").exists());

    // Refuses to overwrite without --force
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();

    cli()
        .current_dir(temp_dir.path())
        .args(["--no-env", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rules: 1 error, 1 warn, 1 off"));
}

#[test]
fn test_config_init_yaml_and_toml() {
    for (format, filename) in [("yaml", ".lintrc.yaml"), ("toml", ".lintrc.toml")] {
        let temp_dir = TempDir::new().unwrap();

        cli()
            .current_dir(temp_dir.path())
            .args(["config", "init", "--format", format])
            .assert()
            .success();
        assert!(temp_dir.path().join(filename).exists());

        cli()
            .current_dir(temp_dir.path())
            .args(["--no-env", "-D", "NODE_ENV=production", "validate", filename])
            .assert()
            .success()
            .stdout(predicate::str::contains("3 rules: 1 error, 2 warn, 0 off"));
    }
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowParserOverride"))
        .stdout(predicate::str::contains("parserOptions"));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lintrc"));
}

#[test]
fn test_invalid_define() {
    cli()
        .args(["-D", "NODE_ENV", "resolve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}
