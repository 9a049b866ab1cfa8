//! lintrc CLI
//!
//! Command-line interface for resolving layered lint configurations

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use lintrc_core::{Result, init_tracing};
use std::io;
use std::path::PathBuf;
use tracing::error;

use commands::ResolveOptions;

#[derive(Parser)]
#[command(name = "lintrc")]
#[command(about = "lintrc: resolve layered lint configurations into one effective rule table")]
#[command(version = lintrc_core::VERSION)]
#[command(
    long_about = "lintrc merges an extends chain of named rule-sets, environment flags, a parser\n\
selection and local rule overrides into a single effective configuration.\n\
\n\
Examples:\n  \
lintrc resolve                          # Resolve the discovered .lintrc.* file\n  \
lintrc -r rulesets.yaml resolve -f json # Resolve against a rule-set registry\n  \
lintrc -D NODE_ENV=production explain no-console\n  \
lintrc config init --format yaml        # Write a starter .lintrc.yaml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to the root configuration file (default: search for .lintrc.*)"
    )]
    config: Option<PathBuf>,

    /// Rule-set registry files
    #[arg(
        short = 'r',
        long = "rulesets",
        global = true,
        help = "Rule-set registry file (can be used multiple times, later files win)"
    )]
    rulesets: Vec<PathBuf>,

    /// Evaluation context entries
    #[arg(
        short = 'D',
        long = "define",
        global = true,
        value_parser = parse_define,
        help = "Define a condition value as KEY=VALUE (can be used multiple times)"
    )]
    define: Vec<(String, String)>,

    /// Do not seed the evaluation context from the process environment
    #[arg(long, global = true, help = "Ignore process environment variables in conditions")]
    no_env: bool,

    /// Let a local parser replace an inherited one
    #[arg(long, global = true, help = "Allow the local parser to override inherited parsers")]
    allow_parser_override: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve configuration files into effective rule tables
    Resolve {
        /// Configuration files or directories to resolve
        #[arg(help = "Files or directories to resolve (default: --config or discovered file)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for the effective configuration"
        )]
        format: OutputFormat,
    },

    /// Show a rule's effective setting and where it came from
    Explain {
        /// Rule identifier
        #[arg(help = "Rule identifier, e.g. no-console or vue/no-parsing-error")]
        rule: String,
    },

    /// Check that a configuration resolves cleanly
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search for .lintrc.*)")]
        path: Option<PathBuf>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// YAML configuration format
    Yaml,
    /// TOML configuration format
    Toml,
}

/// Parse a context definition in the format KEY=VALUE
fn parse_define(s: &str) -> anyhow::Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        anyhow::bail!("Invalid definition '{s}'. Expected 'KEY=VALUE'");
    };
    if key.is_empty() {
        anyhow::bail!("Invalid definition '{s}'. The key must not be empty");
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    // Initialize colored output
    let use_colors = !cli.no_color && std::env::var("NO_COLOR").is_err();
    colored::control::set_override(use_colors);

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "lintrc=error", // Only errors by default
        1 => "lintrc=warn",  // Warnings on first -v
        2 => "lintrc=info",  // Info on -vv
        3 => "lintrc=debug", // Debug on -vvv
        _ => "lintrc=trace", // Trace on -vvvv+
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    match run_command(cli, use_colors) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("lintrc failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli, use_colors: bool) -> Result<()> {
    let options = ResolveOptions {
        config: cli.config,
        rulesets: cli.rulesets,
        defines: cli.define,
        no_env: cli.no_env,
        allow_parser_override: cli.allow_parser_override,
    };

    match cli.command {
        Some(Commands::Resolve { paths, format }) => {
            commands::resolve_command(paths, format, &options, use_colors)
        }

        Some(Commands::Explain { rule }) => commands::explain_command(&rule, &options),

        Some(Commands::Validate { path }) => commands::validate_command(path, &options),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Schema => commands::config_schema_command(),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("lintrc {}", lintrc_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!(
                    "  Rust version: {}",
                    option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown")
                );
            } else {
                println!("{}", lintrc_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
