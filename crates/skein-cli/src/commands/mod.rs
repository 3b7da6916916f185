//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking the parsed arguments and a
//! CommandContext. Rendering is split from printing so output can be tested.

use skein_config::{utf8_path, ConfigLoader, SkeinToml};
use skein_core::error::{SkeinError, SkeinResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod analyses_dir;
pub mod hash_dir;
pub mod job_hash;
pub mod table;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: PathBuf,
    pub output: OutputHandler,
    pub config: SkeinToml,
}

impl CommandContext {
    /// Create a command context, loading configuration for the current directory
    pub async fn new(cli_overrides: &HashMap<String, String>) -> SkeinResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SkeinError::io("Failed to get current directory".to_string(), e))?;

        let loader = ConfigLoader::new(utf8_path(&cwd, "cwd")?);
        let (config, _sources) = loader.load(cli_overrides).await?;

        Ok(Self::with_config(cwd, config))
    }

    /// Create a command context from an already resolved configuration
    pub fn with_config(cwd: PathBuf, config: SkeinToml) -> Self {
        Self {
            cwd,
            output: OutputHandler::new(),
            config,
        }
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> SkeinResult<()> {
    match command {
        Commands::HashDir { dirs, json, .. } => {
            info!("Fingerprinting {} directories", dirs.len());
            hash_dir::execute(dirs, json, ctx).await
        },
        Commands::JobHash { job, workflow, raw, .. } => {
            info!("Fingerprinting job {} with workflow {}", job.display(), workflow.display());
            job_hash::execute(job, workflow, raw, ctx).await
        },
        Commands::AnalysesDir { org, user } => analyses_dir::execute(org, user, ctx).await,
        Commands::Table { rows, headers, .. } => {
            info!("Printing table from {}", rows.display());
            table::execute(rows, headers, ctx).await
        },
        Commands::Version => show_version(ctx).await,
    }
}

/// Show version information
async fn show_version(ctx: &CommandContext) -> SkeinResult<()> {
    for line in version_lines() {
        ctx.output.data(&line);
    }
    Ok(())
}

fn version_lines() -> Vec<String> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    vec![
        format!("skein v{}", env!("CARGO_PKG_VERSION")),
        format!("Built: {}", env!("BUILD_DATE")),
        format!("Target: {}", target),
        format!("Rust: {}", env!("RUSTC_VERSION")),
    ]
}
