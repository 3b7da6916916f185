//! Directory and job fingerprints.
//!
//! A fingerprint summarizes content for equality and change detection. It is
//! not a security guarantee.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fingerprint of the recursive file content of a directory.
///
/// `Unavailable` means the content could not be read in full, so nothing can
/// be asserted about it. It compares unequal to everything, itself included.
#[derive(Debug, Clone)]
pub enum DirFingerprint {
    /// Lowercase hexadecimal digest
    Digest(String),
    /// Hashing could not be completed
    Unavailable,
}

impl DirFingerprint {
    /// Integer encoding of `Unavailable` on the wire
    pub const SENTINEL: i64 = -1;

    pub fn is_available(&self) -> bool {
        matches!(self, DirFingerprint::Digest(_))
    }

    /// The hex digest, if hashing completed
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            DirFingerprint::Digest(hex) => Some(hex),
            DirFingerprint::Unavailable => None,
        }
    }
}

impl PartialEq for DirFingerprint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DirFingerprint::Digest(a), DirFingerprint::Digest(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DirFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirFingerprint::Digest(hex) => f.write_str(hex),
            DirFingerprint::Unavailable => write!(f, "{}", Self::SENTINEL),
        }
    }
}

impl Serialize for DirFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DirFingerprint::Digest(hex) => serializer.serialize_str(hex),
            DirFingerprint::Unavailable => serializer.serialize_i64(Self::SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for DirFingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Sentinel(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(hex) => Ok(DirFingerprint::Digest(hex)),
            Repr::Sentinel(Self::SENTINEL) => Ok(DirFingerprint::Unavailable),
            Repr::Sentinel(other) => Err(de::Error::custom(format!(
                "invalid fingerprint sentinel {}, expected {}",
                other,
                Self::SENTINEL
            ))),
        }
    }
}

/// Raw digest of a job specification together with its workflow descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobFingerprint {
    bytes: Vec<u8>,
}

impl JobFingerprint {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw digest bytes (16 for MD5)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Convert digest to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex digest of a supported length (16 or 32 bytes)
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_str)?;
        if !matches!(bytes.len(), 16 | 32) {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        Ok(Self { bytes })
    }
}

impl AsRef<[u8]> for JobFingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for JobFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for JobFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for JobFingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_never_equal() {
        assert_ne!(DirFingerprint::Unavailable, DirFingerprint::Unavailable);
        assert_ne!(
            DirFingerprint::Unavailable,
            DirFingerprint::Digest("d41d8cd98f00b204e9800998ecf8427e".to_string())
        );
    }

    #[test]
    fn test_digest_equality() {
        let a = DirFingerprint::Digest("abc".to_string());
        let b = DirFingerprint::Digest("abc".to_string());
        assert_eq!(a, b);
        assert_eq!(a.as_hex(), Some("abc"));
    }

    #[test]
    fn test_sentinel_display_and_json() {
        assert_eq!(DirFingerprint::Unavailable.to_string(), "-1");
        assert_eq!(serde_json::to_string(&DirFingerprint::Unavailable).unwrap(), "-1");

        let parsed: DirFingerprint = serde_json::from_str("-1").unwrap();
        assert!(!parsed.is_available());

        let parsed: DirFingerprint = serde_json::from_str("\"00ff\"").unwrap();
        assert_eq!(parsed.as_hex(), Some("00ff"));

        assert!(serde_json::from_str::<DirFingerprint>("7").is_err());
    }

    #[test]
    fn test_job_fingerprint_hex() {
        let fp = JobFingerprint::new(vec![0xab; 16]);
        assert_eq!(fp.len(), 16);
        assert_eq!(fp.to_hex(), "ab".repeat(16));
        assert_eq!(JobFingerprint::from_hex(&fp.to_hex()).unwrap(), fp);
    }

    #[test]
    fn test_job_fingerprint_invalid_length() {
        assert!(JobFingerprint::from_hex("abcd").is_err());
        assert!(JobFingerprint::from_hex("zz").is_err());
    }
}
