//! Fingerprint directory trees

use super::CommandContext;
use skein_core::error::{SkeinError, SkeinResult};
use skein_core::types::{DigestAlgorithm, DirFingerprint};
use skein_core::utils::{fingerprint_dir_with, Table};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Fingerprint of one directory named on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct DirReport {
    /// Path as the user wrote it
    pub path: String,
    pub fingerprint: DirFingerprint,
}

pub async fn execute(dirs: Vec<PathBuf>, json: bool, ctx: &CommandContext) -> SkeinResult<()> {
    let algorithm = ctx.config.fingerprint.algorithm;
    let verbose = ctx.config.fingerprint.verbose;
    let targets: Vec<(String, PathBuf)> = dirs
        .iter()
        .map(|dir| (dir.display().to_string(), ctx.resolve(dir)))
        .collect();

    // Walking and reading files is blocking work
    let reports = tokio::task::spawn_blocking(move || fingerprint_all(targets, algorithm, verbose))
        .await
        .map_err(|e| SkeinError::traversal("Fingerprint worker failed".to_string(), e))?;

    let lines = if json {
        vec![render_json(&reports)?]
    } else {
        render_table(&reports)
    };
    for line in &lines {
        ctx.output.data(line);
    }

    let unavailable = reports.iter().filter(|r| !r.fingerprint.is_available()).count();
    if unavailable > 0 {
        ctx.output.warn(&format!(
            "{} of {} directories could not be fingerprinted (use -v for details)",
            unavailable,
            reports.len()
        ));
    }

    Ok(())
}

/// Fingerprint every target in order
pub fn fingerprint_all(
    targets: Vec<(String, PathBuf)>,
    algorithm: DigestAlgorithm,
    verbose: u8,
) -> Vec<DirReport> {
    targets
        .into_iter()
        .map(|(path, resolved)| {
            let fingerprint = fingerprint_dir_with(&resolved, algorithm, verbose);
            debug!(%path, %fingerprint, %algorithm, "Fingerprinted directory");
            DirReport { path, fingerprint }
        })
        .collect()
}

/// PATH / FINGERPRINT table, unavailable fingerprints shown as -1
pub fn render_table(reports: &[DirReport]) -> Vec<String> {
    Table::new(["path", "fingerprint"])
        .rows(reports.iter().map(|r| [r.path.clone(), r.fingerprint.to_string()]))
        .render()
}

/// JSON object from path to fingerprint, unavailable fingerprints as -1
pub fn render_json(reports: &[DirReport]) -> SkeinResult<String> {
    let by_path: BTreeMap<&str, &DirFingerprint> =
        reports.iter().map(|r| (r.path.as_str(), &r.fingerprint)).collect();

    serde_json::to_string_pretty(&by_path).map_err(|e| SkeinError::Serialization {
        message: "directory fingerprints".to_string(),
        source: e,
    })
}
