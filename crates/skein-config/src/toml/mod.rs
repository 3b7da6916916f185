//! skein.toml configuration parsing and serialization

use crate::ConfigResult;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use skein_core::error::SkeinError;
use skein_core::types::DigestAlgorithm;
use skein_core::utils::JsonStyle;

/// Complete skein.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkeinToml {
    /// Directory fingerprint settings
    pub fingerprint: FingerprintSection,

    /// Job fingerprint settings
    pub job: JobSection,

    /// Table output settings
    pub table: TableSection,
}

/// `[fingerprint]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FingerprintSection {
    /// Checksum used for both directory and job fingerprints
    pub algorithm: DigestAlgorithm,

    /// Diagnostic verbosity; never changes a fingerprint
    pub verbose: u8,
}

/// `[job]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct JobSection {
    /// Layout of the canonical JSON that gets hashed
    pub json_style: JsonStyle,
}

/// `[table]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSection {
    /// Default column filter; empty shows every column
    pub columns: Vec<String>,
}

/// Parse TOML string to SkeinToml configuration
pub fn parse_skein_toml(content: &str) -> ConfigResult<SkeinToml> {
    check_syntax(content)?;

    // Then parse with serde for type safety
    let config: SkeinToml = ::toml::from_str(content).map_err(|e| {
        let (line, column) = e.span().map(|s| location(content, s.start)).unwrap_or((0, 0));
        SkeinError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Parse TOML string to a raw table, for layering.
///
/// The table is also checked against the SkeinToml schema so mistakes are
/// reported with their location in this file rather than after merging.
pub fn parse_table(content: &str) -> ConfigResult<::toml::Table> {
    parse_skein_toml(content)?;

    content.parse::<::toml::Table>().map_err(|e| SkeinError::TomlParse {
        message: e.message().to_string(),
        line: 0,
        column: 0,
    })
}

/// Build a validated SkeinToml from a (merged) raw table
pub fn from_table(table: ::toml::Table) -> ConfigResult<SkeinToml> {
    let config: SkeinToml = ::toml::Value::Table(table)
        .try_into()
        .map_err(|e: ::toml::de::Error| SkeinError::ConfigValidation {
            field: "config".to_string(),
            reason: e.message().to_string(),
        })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize SkeinToml to TOML string
pub fn serialize_skein_toml(config: &SkeinToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config).map_err(|e| SkeinError::ConfigValidation {
        field: "config".to_string(),
        reason: format!("TOML serialization error: {}", e),
    })
}

/// Validate configuration completeness
pub fn validate_config(config: &SkeinToml) -> ConfigResult<()> {
    let mut seen: Vec<String> = Vec::new();

    for column in &config.table.columns {
        let key = column.trim().to_lowercase();
        if key.is_empty() {
            return Err(SkeinError::ConfigValidation {
                field: "table.columns".to_string(),
                reason: "column names must not be empty".to_string(),
            });
        }
        if seen.contains(&key) {
            return Err(SkeinError::ConfigValidation {
                field: "table.columns".to_string(),
                reason: format!("column '{}' is listed more than once", column),
            });
        }
        seen.push(key);
    }

    Ok(())
}

/// Load and parse skein.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<SkeinToml> {
    let content = read_config(path).await?;
    parse_skein_toml(&content).map_err(|e| in_file(path, e))
}

/// Load a raw configuration table from file path
pub async fn load_table_from_file(path: &Utf8Path) -> ConfigResult<::toml::Table> {
    let content = read_config(path).await?;
    parse_table(&content).map_err(|e| in_file(path, e))
}

async fn read_config(path: &Utf8Path) -> ConfigResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SkeinError::io(format!("Failed to read {}", path), e))
}

fn in_file(path: &Utf8Path, error: SkeinError) -> SkeinError {
    match error {
        SkeinError::TomlParse { message, line, column } => SkeinError::TomlParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        SkeinError::ConfigValidation { field, reason } => SkeinError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    }
}

/// Use toml_edit first for better syntax error reporting
fn check_syntax(content: &str) -> ConfigResult<()> {
    content.parse::<toml_edit::DocumentMut>().map(|_| ()).map_err(|e| {
        let (line, column) = e.span().map(|s| location(content, s.start)).unwrap_or((0, 0));
        SkeinError::TomlParse {
            message: e.message().trim().to_string(),
            line,
            column,
        }
    })
}

/// 1-based line and column of a byte offset
pub(crate) fn location(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_skein_toml("").unwrap();
        assert_eq!(config, SkeinToml::default());
        assert_eq!(config.fingerprint.algorithm, DigestAlgorithm::Md5);
        assert_eq!(config.job.json_style, JsonStyle::Spaced);
        assert!(config.table.columns.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[fingerprint]
algorithm = "sha256"
verbose = 2

[job]
json-style = "compact"

[table]
columns = ["name", "status"]
"#;

        let config = parse_skein_toml(toml).unwrap();
        assert_eq!(config.fingerprint.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.fingerprint.verbose, 2);
        assert_eq!(config.job.json_style, JsonStyle::Compact);
        assert_eq!(config.table.columns, vec!["name", "status"]);
    }

    #[test]
    fn test_syntax_error_location() {
        let toml = "a = 1\nb = = 2\n";
        match parse_skein_toml(toml).unwrap_err() {
            SkeinError::TomlParse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected TomlParse, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_algorithm() {
        let toml = "[fingerprint]\nalgorithm = \"crc32\"\n";
        match parse_skein_toml(toml).unwrap_err() {
            SkeinError::TomlParse { message, .. } => assert!(message.contains("crc32")),
            other => panic!("expected TomlParse, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = "[table]\ncolums = [\"name\"]\n";
        assert!(parse_skein_toml(toml).is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let toml = "[table]\ncolumns = [\"name\", \"NAME\"]\n";
        assert!(matches!(
            parse_skein_toml(toml).unwrap_err(),
            SkeinError::ConfigValidation { .. }
        ));
    }

    #[test]
    fn test_round_trip_serialization() {
        let toml = r#"
[fingerprint]
algorithm = "sha256"

[table]
columns = ["path"]
"#;

        let config = parse_skein_toml(toml).unwrap();
        let serialized = serialize_skein_toml(&config).unwrap();
        let reparsed = parse_skein_toml(&serialized).unwrap();

        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_from_table() {
        let table = parse_table("[job]\njson-style = \"compact\"\n").unwrap();
        let config = from_table(table).unwrap();
        assert_eq!(config.job.json_style, JsonStyle::Compact);
    }

    #[test]
    fn test_location() {
        assert_eq!(location("abc", 0), (1, 1));
        assert_eq!(location("ab\ncd", 4), (2, 2));
    }
}
