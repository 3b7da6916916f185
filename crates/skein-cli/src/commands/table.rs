//! Print JSON rows as an aligned table

use super::CommandContext;
use skein_config::{json, rows_from_document, utf8_path};
use skein_core::error::SkeinResult;
use skein_core::utils::Table;
use std::path::PathBuf;

pub async fn execute(rows: PathBuf, headers: Vec<String>, ctx: &CommandContext) -> SkeinResult<()> {
    let path = utf8_path(&ctx.resolve(&rows), "rows")?;
    let document = json::load_from_file(&path).await?;
    let rows = rows_from_document(&document)?;

    for line in render(headers, rows, ctx) {
        ctx.output.data(&line);
    }
    Ok(())
}

/// Render rows under the headers, filtered by the configured columns
pub fn render(headers: Vec<String>, rows: Vec<Vec<String>>, ctx: &CommandContext) -> Vec<String> {
    Table::new(headers)
        .filter(ctx.config.table.columns.iter().cloned())
        .rows(rows)
        .render()
}
