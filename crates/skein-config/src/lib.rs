//! Configuration parsing for Skein
//!
//! This crate handles parsing and validation of skein.toml files, loading of
//! the JSON documents the CLI fingerprints or tabulates, and layering of
//! global, project, environment and command-line settings.

pub mod json;
pub mod merge;
pub mod toml;

// Re-export main types
pub use crate::json::{parse_document, rows_from_document};
pub use crate::merge::{utf8_path, ConfigLayering, ConfigLoader, ConfigSource};
pub use crate::toml::{FingerprintSection, JobSection, SkeinToml, TableSection};

use skein_core::error::SkeinError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, SkeinError>;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "skein.toml";
