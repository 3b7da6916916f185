//! Content fingerprints for working directories and job submissions.
//!
//! Directory fingerprints let the platform tell whether a workspace changed
//! between two runs; job fingerprints tell whether two submissions are the same.
//!
//! Only regular files contribute to a directory fingerprint. FIFOs, sockets
//! and device nodes are skipped without being opened, since reading them can
//! block forever or yield content that is not part of the workspace. Links to
//! files are read through; links to directories are not followed.

use crate::error::{SkeinError, SkeinResult};
use crate::types::{DigestAlgorithm, DirFingerprint, JobFingerprint};
use crate::utils::canonical::{self, JsonStyle};
use digest::Digest;
use md5::Md5;
use serde::Serialize;
use sha2::Sha256;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Bytes read from a file per step. Part of the fingerprint format.
pub const CHUNK_SIZE: usize = 4096;

/// Fingerprint a directory tree with the reference MD5 algorithm.
///
/// Every failure (missing path, unreadable file, walk error) collapses to
/// [`DirFingerprint::Unavailable`]. `verbose` only controls diagnostics.
pub fn fingerprint_dir<P: AsRef<Path>>(path: P, verbose: u8) -> DirFingerprint {
    fingerprint_dir_with(path, DigestAlgorithm::Md5, verbose)
}

/// Fingerprint a directory tree with the given algorithm
pub fn fingerprint_dir_with<P: AsRef<Path>>(
    path: P,
    algorithm: DigestAlgorithm,
    verbose: u8,
) -> DirFingerprint {
    match try_fingerprint_dir(path.as_ref(), algorithm, verbose) {
        Ok(hex) => DirFingerprint::Digest(hex),
        Err(e) => {
            if verbose > 0 {
                debug!(path = %path.as_ref().display(), error = %e, "Directory fingerprint unavailable");
            }
            DirFingerprint::Unavailable
        },
    }
}

/// Fingerprint a directory tree, reporting why it could not be done.
///
/// Produces the same digest as [`fingerprint_dir_with`].
pub fn try_fingerprint_dir<P: AsRef<Path>>(
    path: P,
    algorithm: DigestAlgorithm,
    verbose: u8,
) -> SkeinResult<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SkeinError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    match algorithm {
        DigestAlgorithm::Md5 => accumulate_dir::<Md5>(path, verbose),
        DigestAlgorithm::Sha256 => accumulate_dir::<Sha256>(path, verbose),
    }
}

/// Feed the hex digest of every chunk of every file into one accumulator
fn accumulate_dir<D: Digest>(root: &Path, verbose: u8) -> SkeinResult<String> {
    accumulate_entries::<D, _, _>(root, walk(root), verbose)
}

/// Accumulate over walk results; the first walk error aborts the fingerprint
fn accumulate_entries<D, I, E>(root: &Path, entries: I, verbose: u8) -> SkeinResult<String>
where
    D: Digest,
    I: IntoIterator<Item = Result<DirEntry, E>>,
    E: Error + Send + Sync + 'static,
{
    let mut accumulator = D::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut files = 0usize;

    for entry in entries {
        let entry = entry.map_err(|e| {
            SkeinError::traversal(format!("failed to walk {}", root.display()), e)
        })?;
        if is_directory(&entry) {
            continue;
        }

        let unreadable = |source| SkeinError::Unreadable {
            path: entry.path().to_path_buf(),
            source,
        };
        // Follows links, so a dangling link is unreadable rather than skipped
        let metadata = fs::metadata(entry.path()).map_err(unreadable)?;
        if !metadata.is_file() {
            if verbose > 0 {
                debug!(path = %entry.path().display(), "Skipped special file");
            }
            continue;
        }

        let file = File::open(entry.path()).map_err(unreadable)?;
        absorb_file(&mut accumulator, file, &mut buf).map_err(unreadable)?;

        files += 1;
        if verbose > 0 {
            debug!(path = %entry.path().display(), "Hashed file");
        }
    }

    let hex = hex::encode(accumulator.finalize());
    if verbose > 0 {
        debug!(root = %root.display(), files, fingerprint = %hex, "Directory fingerprinted");
    }
    Ok(hex)
}

/// Top-down walk: within a directory, files by name, then subdirectories by name
fn walk(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by(|a, b| {
            is_directory(a)
                .cmp(&is_directory(b))
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
}

/// Directories and links to directories; the latter are never descended into
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn absorb_file<D: Digest>(accumulator: &mut D, mut file: File, buf: &mut [u8]) -> io::Result<()> {
    loop {
        let n = read_chunk(&mut file, buf)?;
        if n == 0 {
            return Ok(());
        }
        let chunk_digest = D::digest(&buf[..n]);
        accumulator.update(hex::encode(chunk_digest).as_bytes());
    }
}

/// Fill `buf` completely unless EOF comes first
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Fingerprint a job specification together with its workflow descriptor.
///
/// Uses MD5 over the spaced canonical JSON of both records, job first.
pub fn fingerprint_job<J, W>(job_spec: &J, workflow: &W) -> SkeinResult<JobFingerprint>
where
    J: Serialize + ?Sized,
    W: Serialize + ?Sized,
{
    fingerprint_job_with(job_spec, workflow, DigestAlgorithm::Md5, JsonStyle::Spaced)
}

/// Fingerprint a job with an explicit algorithm and JSON layout
pub fn fingerprint_job_with<J, W>(
    job_spec: &J,
    workflow: &W,
    algorithm: DigestAlgorithm,
    style: JsonStyle,
) -> SkeinResult<JobFingerprint>
where
    J: Serialize + ?Sized,
    W: Serialize + ?Sized,
{
    let job_text = canonical::encode(job_spec, style, "job specification")?;
    let workflow_text = canonical::encode(workflow, style, "workflow descriptor")?;

    let bytes = match algorithm {
        DigestAlgorithm::Md5 => digest_texts::<Md5>(&job_text, &workflow_text),
        DigestAlgorithm::Sha256 => digest_texts::<Sha256>(&job_text, &workflow_text),
    };
    Ok(JobFingerprint::new(bytes))
}

fn digest_texts<D: Digest>(first: &str, second: &str) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(first.as_bytes());
    hasher.update(second.as_bytes());
    hasher.finalize().to_vec()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config as ProptestConfig;
    use std::collections::BTreeMap;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]
        /// Rehashing an untouched tree always yields the same fingerprint
        #[test]
        fn dir_fingerprint_determinism(
            files in prop::collection::btree_map("[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..9000), 0..6)
        ) {
            let temp_dir = tempfile::tempdir().unwrap();
            for (name, content) in &files {
                std::fs::write(temp_dir.path().join(name), content).unwrap();
            }

            let first = fingerprint_dir(temp_dir.path(), 0);
            let second = fingerprint_dir(temp_dir.path(), 0);
            prop_assert!(first.is_available());
            prop_assert_eq!(first, second);
        }

        /// Job fingerprints depend on content, not on map insertion order
        #[test]
        fn job_fingerprint_key_order_independent(
            entries in prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 0..10)
        ) {
            let forward: serde_json::Map<String, serde_json::Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(*v)))
                .collect();
            let sorted: BTreeMap<String, i64> = forward
                .iter()
                .map(|(k, v)| (k.clone(), v.as_i64().unwrap_or_default()))
                .collect();

            let a = fingerprint_job(&forward, &serde_json::json!([])).unwrap();
            let b = fingerprint_job(&sorted, &serde_json::json!([])).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
