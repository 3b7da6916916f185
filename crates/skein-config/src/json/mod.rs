//! JSON document loading
//!
//! Job specifications, workflow descriptors and table rows reach the CLI as
//! JSON files. Parse failures carry the line and column serde_json reports.

use crate::ConfigResult;
use camino::Utf8Path;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skein_core::error::SkeinError;

/// Parse a JSON document
pub fn parse_document(content: &str) -> ConfigResult<Value> {
    parse_document_as(content)
}

/// Parse a JSON document into a typed record
pub fn parse_document_as<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    serde_json::from_str(content).map_err(|e| SkeinError::JsonParse {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
    })
}

/// Load and parse a JSON document from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SkeinError::io(format!("Failed to read {}", path), e))?;

    parse_document(&content).map_err(|e| match e {
        SkeinError::JsonParse { message, line, column } => SkeinError::JsonParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        other => other,
    })
}

/// Interpret a document as table rows: an array of arrays of scalars.
///
/// Strings are used as-is, every other value as its JSON text.
pub fn rows_from_document(document: &Value) -> ConfigResult<Vec<Vec<String>>> {
    let rows = document.as_array().ok_or_else(|| SkeinError::ConfigValidation {
        field: "rows".to_string(),
        reason: "expected a JSON array of rows".to_string(),
    })?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let cells = row.as_array().ok_or_else(|| SkeinError::ConfigValidation {
                field: format!("rows[{}]", idx),
                reason: "expected an array of cells".to_string(),
            })?;
            Ok(cells.iter().map(cell_text).collect())
        })
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
