//! File and project fingerprinting for cache invalidation.
//!
//! A fingerprint identifies a file cheaply: size and mtime by default, with an
//! optional SHA-256 content hash for callers that judge mtime-based detection
//! insufficiently reliable (e.g. filesystems with coarse mtime resolution).
//! Strong hashing is always explicitly requested, never inferred.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

const HASH_CHUNK_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path:?} for hashing: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How much work to spend identifying a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashMode {
    /// Size + mtime only; never reads file content.
    #[default]
    Fast,
    /// Additionally hashes the full content with SHA-256.
    Strong,
}

/// Identity of one file at a point in time. Never mutated; superseded by a
/// fresh fingerprint after the file changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub path: String,
    pub size: u64,
    pub mtime_secs: u64,
    pub mtime_nanos: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// Ordered mapping from relative path to [`FileFingerprint`] for exactly the
/// file set relevant to a cache key. Two project fingerprints are equal iff
/// every path/fingerprint pair matches; any file added, removed, or changed
/// breaks equality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectFingerprint(BTreeMap<String, FileFingerprint>);

impl ProjectFingerprint {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// SHA-256 hex digest over the stable serialization. The BTreeMap gives
    /// lexicographic key order, so two equal file sets always serialize
    /// identically.
    pub fn combined_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for (path, fp) in &self.0 {
            hasher.update(path.as_bytes());
            hasher.update(b":");
            hasher.update(fp.size.to_le_bytes());
            hasher.update(fp.mtime_secs.to_le_bytes());
            hasher.update(fp.mtime_nanos.to_le_bytes());
            if let Some(hash) = &fp.content_hash {
                hasher.update(hash.as_bytes());
            }
            hasher.update(b"|");
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Fingerprint a single file relative to `root`.
///
/// Fails when the file cannot be stat'ed (or read, in [`HashMode::Strong`]).
pub fn fingerprint_file(
    root: &Path,
    relative_path: &str,
    mode: HashMode,
) -> Result<FileFingerprint, FingerprintError> {
    let abs = root.join(relative_path);
    let metadata = abs
        .metadata()
        .map_err(|source| FingerprintError::Stat { path: abs.clone(), source })?;

    let (mtime_secs, mtime_nanos) = metadata
        .modified()
        .ok()
        .and_then(|mtime| mtime.duration_since(UNIX_EPOCH).ok())
        .map(|d| (d.as_secs(), d.subsec_nanos()))
        .unwrap_or((0, 0));

    let content_hash = match mode {
        HashMode::Fast => None,
        HashMode::Strong => Some(hash_file_content(&abs)?),
    };

    Ok(FileFingerprint {
        path: relative_path.replace('\\', "/"),
        size: metadata.len(),
        mtime_secs,
        mtime_nanos,
        content_hash,
    })
}

/// Fingerprint a whole file set.
///
/// Runs per-file fingerprinting in parallel (no shared mutable state) and
/// merges by collecting into the ordered map, so the result is identical
/// regardless of completion order. Files that cannot be stat'ed are skipped
/// with a debug log: the resulting fingerprint then differs from any stored
/// one that included them, which downstream resolves to a cache miss.
pub fn fingerprint_project(root: &Path, relative_paths: &[String], mode: HashMode) -> ProjectFingerprint {
    let entries: BTreeMap<String, FileFingerprint> = relative_paths
        .par_iter()
        .filter_map(|rel| match fingerprint_file(root, rel, mode) {
            Ok(fp) => Some((fp.path.clone(), fp)),
            Err(e) => {
                tracing::debug!("skipping unfingerprintable file: {}", e);
                None
            }
        })
        .collect();
    ProjectFingerprint(entries)
}

fn hash_file_content(path: &Path) -> Result<String, FingerprintError> {
    let mut file = File::open(path)
        .map_err(|source| FingerprintError::Read { path: path.to_path_buf(), source })?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|source| FingerprintError::Read { path: path.to_path_buf(), source })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
