//! Digest algorithm selection.

use crate::error::SkeinError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Checksum used by the fingerprint helpers.
///
/// `Md5` is the platform's reference algorithm; fingerprints stored by other
/// platform components were produced with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Length in bytes of a raw digest
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha256 => 32,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SkeinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            other => Err(SkeinError::ConfigValidation {
                field: "fingerprint.algorithm".to_string(),
                reason: format!("unknown algorithm '{}', expected 'md5' or 'sha256'", other),
            }),
        }
    }
}
