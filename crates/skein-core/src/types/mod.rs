//! Fingerprint value types.
//!
//! This module provides the values produced by the hashing helpers:
//! - Directory fingerprints with an explicit "unavailable" sentinel
//! - Job fingerprints as raw digest bytes
//! - Digest algorithm selection

pub mod algorithm;
pub mod fingerprint;

// Re-export all public types
pub use algorithm::DigestAlgorithm;
pub use fingerprint::{DirFingerprint, JobFingerprint};
