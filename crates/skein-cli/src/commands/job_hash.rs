//! Fingerprint a job specification and its workflow descriptor

use super::CommandContext;
use serde_json::Value;
use skein_config::{json, utf8_path};
use skein_core::error::{SkeinError, SkeinResult};
use skein_core::types::JobFingerprint;
use skein_core::utils::fingerprint_job_with;
use std::path::{Path, PathBuf};

pub async fn execute(job: PathBuf, workflow: PathBuf, raw: bool, ctx: &CommandContext) -> SkeinResult<()> {
    let job_spec = load_document(&ctx.resolve(&job)).await?;
    let workflow_spec = load_document(&ctx.resolve(&workflow)).await?;

    let fingerprint = compute(&job_spec, &workflow_spec, ctx)?;

    if raw {
        ctx.output
            .raw(fingerprint.as_bytes())
            .map_err(|e| SkeinError::io("Failed to write fingerprint".to_string(), e))
    } else {
        ctx.output.data(&fingerprint.to_hex());
        Ok(())
    }
}

/// Fingerprint two parsed documents with the configured algorithm and layout
pub fn compute(job_spec: &Value, workflow: &Value, ctx: &CommandContext) -> SkeinResult<JobFingerprint> {
    fingerprint_job_with(
        job_spec,
        workflow,
        ctx.config.fingerprint.algorithm,
        ctx.config.job.json_style,
    )
}

async fn load_document(path: &Path) -> SkeinResult<Value> {
    json::load_from_file(&utf8_path(path, "path")?).await
}
