//! # skein-cli
//!
//! Command line access to the Skein workflow helpers.
//!
//! This is the main entry point for the `skein` tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use clap::{ArgAction, Parser, Subcommand};
use skein_core::error::{SkeinError, SkeinResult};
use skein_core::types::DigestAlgorithm;
use skein_core::utils::JsonStyle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Fingerprints, tables and paths for reproducible workflow runs
#[derive(Parser)]
#[command(name = "skein", version, about = "Workflow fingerprints, tables and paths")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase diagnostic output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Override a configuration value, e.g. `--set table.columns=name,status`
    #[arg(long = "set", value_name = "KEY=VALUE", global = true, value_parser = parse_key_value)]
    pub overrides: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fingerprint the contents of one or more directories
    HashDir {
        #[arg(required = true, value_name = "DIR")]
        dirs: Vec<PathBuf>,
        /// Checksum to use
        #[arg(long)]
        algorithm: Option<DigestAlgorithm>,
        /// Print a JSON object instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fingerprint a job specification together with its workflow
    JobHash {
        /// JSON file holding the job specification
        job: PathBuf,
        /// JSON file holding the workflow descriptor
        workflow: PathBuf,
        /// Checksum to use
        #[arg(long)]
        algorithm: Option<DigestAlgorithm>,
        /// Layout of the canonical JSON
        #[arg(long)]
        style: Option<JsonStyle>,
        /// Write the digest bytes instead of hex
        #[arg(long)]
        raw: bool,
    },
    /// Print the analyses directory of a user
    AnalysesDir {
        org: String,
        user: String,
    },
    /// Print a JSON array of rows as an aligned table
    Table {
        /// JSON file with an array of rows
        rows: PathBuf,
        /// Column headers, in row order
        #[arg(long, value_delimiter = ',', required = true)]
        headers: Vec<String>,
        /// Columns to show (case-insensitive)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Show version information
    Version,
}

impl Cli {
    /// Configuration overrides named on the command line, keyed by dotted field
    pub fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides: HashMap<String, String> = self.overrides.iter().cloned().collect();

        if self.verbose > 0 {
            overrides.insert("fingerprint.verbose".to_string(), self.verbose.to_string());
        }

        match &self.command {
            Commands::HashDir { algorithm, .. } => {
                if let Some(algorithm) = algorithm {
                    overrides.insert("fingerprint.algorithm".to_string(), algorithm.to_string());
                }
            },
            Commands::JobHash { algorithm, style, .. } => {
                if let Some(algorithm) = algorithm {
                    overrides.insert("fingerprint.algorithm".to_string(), algorithm.to_string());
                }
                if let Some(style) = style {
                    overrides.insert("job.json-style".to_string(), style.to_string());
                }
            },
            Commands::Table { columns, .. } if !columns.is_empty() => {
                overrides.insert("table.columns".to_string(), columns.join(","));
            },
            _ => {},
        }

        overrides
    }
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting Skein CLI v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "Command failed");
            eprint!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> SkeinResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| SkeinError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(&cli.config_overrides()).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: u8) {
    let level = if verbose > 0 { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "skein_cli={level},skein_core={level},skein_config={level}",
            level = level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Skein encountered an unexpected error: {}", panic_info);
        eprintln!("skein crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/skein-dev/skein/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
