//! # skein-core
//!
//! Core types and utilities shared across all Skein crates.
//!
//! This crate provides:
//! - Content fingerprints for working directories and job submissions
//! - A canonical JSON encoder used to fingerprint structured records
//! - A column-aligned table printer for CLI output
//! - The analyses directory path builder
//! - SkeinError enum for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Fingerprint value types and digest algorithm selection
//! - `error`: Error types and result aliases
//! - `utils`: Hashing, canonical JSON, table and path helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{SkeinError, SkeinResult};
pub use types::{DigestAlgorithm, DirFingerprint, JobFingerprint};
pub use utils::{analyses_dir, fingerprint_dir, fingerprint_job, print_table};
