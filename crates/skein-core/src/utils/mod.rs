//! Utility functions and helpers.
//!
//! Common functionality used across multiple Skein crates.

pub mod canonical;
pub mod hash;
pub mod path;
pub mod table;

// Re-export commonly used utilities
pub use canonical::{to_canonical_json, JsonStyle};
pub use hash::{
    fingerprint_dir, fingerprint_dir_with, fingerprint_job, fingerprint_job_with,
    try_fingerprint_dir, CHUNK_SIZE,
};
pub use path::{analyses_dir, join_paths, normalize_path};
pub use table::{print_table, Table};
