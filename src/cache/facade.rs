//! Composes fingerprinting and the cache store around any expensive,
//! deterministic analysis step.

use crate::cache::store::{CacheError, CacheStore};
use crate::fingerprint::{fingerprint_project, HashMode, ProjectFingerprint};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacadeError<E> {
    /// The producer itself failed; nothing was cached.
    #[error("analysis step failed: {0}")]
    Producer(E),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("result payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Cache wrapper for expensive analysis steps, keyed by an opaque string
/// (conventionally `"<step>:<mode>"`) and scoped by a project fingerprint.
pub struct AnalysisCache {
    project_root: PathBuf,
    store: CacheStore,
    hash_mode: HashMode,
}

impl AnalysisCache {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            store: CacheStore::new(project_root),
            hash_mode: HashMode::Fast,
        }
    }

    /// Override the default 24h TTL for results stored through this facade.
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.store = self.store.with_ttl_seconds(ttl_seconds);
        self
    }

    /// Use strong content hashing instead of size+mtime when fingerprinting
    /// the relevant file set.
    pub fn with_hash_mode(mut self, mode: HashMode) -> Self {
        self.hash_mode = mode;
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Return the cached result for `key` if still valid for the current
    /// state of `relevant_files`; otherwise run `producer`, cache its result,
    /// and return it. Producer failures propagate uncached; a failed run is
    /// never stored as if it succeeded.
    pub fn with_cache<T, E, F>(
        &self,
        key: &str,
        relevant_files: &[String],
        producer: F,
    ) -> Result<T, FacadeError<E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let fingerprint = fingerprint_project(&self.project_root, relevant_files, self.hash_mode);

        if let Some(hit) = self.lookup(key, &fingerprint) {
            return Ok(hit);
        }

        let result = producer().map_err(FacadeError::Producer)?;
        let payload = serde_json::to_value(&result)?;
        self.store.put(key, payload, fingerprint)?;
        Ok(result)
    }

    fn lookup<T: DeserializeOwned>(&self, key: &str, fingerprint: &ProjectFingerprint) -> Option<T> {
        let payload = self.store.get(key, fingerprint)?;
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                // Schema drift between releases reads as a miss, same as any
                // other validity ambiguity.
                tracing::warn!("cached payload no longer deserializes, re-running {}: {}", key, e);
                None
            }
        }
    }
}
