//! On-disk cache store with fingerprint and TTL validation.

use crate::fingerprint::ProjectFingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TTL_SECONDS: u64 = 24 * 60 * 60;

const CACHE_DIR_NAME: &str = ".vibe-audit-cache";
const CACHE_FILE_NAME: &str = "cache.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache write failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One persisted record: timestamp, TTL, the fingerprint that produced the
/// result, and the result itself as an opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub stored_at: DateTime<Utc>,
    pub ttl_seconds: u64,
    pub fingerprint: ProjectFingerprint,
    pub result: JsonValue,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let elapsed = now.signed_duration_since(self.stored_at);
        elapsed >= chrono::Duration::seconds(self.ttl_seconds as i64)
    }
}

/// Read-only cache introspection.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entry_count: usize,
    /// Size of the record file on disk, an approximation of stored bytes.
    pub total_stored_bytes: u64,
    pub oldest_entry_age_secs: Option<i64>,
}

/// Persists analysis results keyed by an opaque string, scoped to a single
/// project root. Constructed with an explicit root so tests can use
/// temporary directories; there is no ambient global cache.
pub struct CacheStore {
    cache_dir: PathBuf,
    cache_file: PathBuf,
    ttl_seconds: u64,
}

impl CacheStore {
    pub fn new(project_root: &Path) -> Self {
        let cache_dir = project_root.join(CACHE_DIR_NAME);
        let cache_file = cache_dir.join(CACHE_FILE_NAME);
        Self { cache_dir, cache_file, ttl_seconds: DEFAULT_TTL_SECONDS }
    }

    /// Override the TTL applied to subsequent `put` calls.
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Return the cached result for `key` iff the entry exists, its TTL has
    /// not elapsed, and the stored fingerprint equals `current`. Everything
    /// else, including unreadable or malformed record files, is a miss.
    pub fn get(&self, key: &str, current: &ProjectFingerprint) -> Option<JsonValue> {
        let entries = self.load_entries();
        let entry = match entries.get(key) {
            Some(e) => e,
            None => {
                tracing::debug!("cache miss (no entry): {}", key);
                return None;
            }
        };

        if entry.is_expired(Utc::now()) {
            tracing::debug!("cache miss (expired): {}", key);
            return None;
        }

        if &entry.fingerprint != current {
            tracing::debug!("cache miss (files changed): {}", key);
            return None;
        }

        tracing::info!("cache hit: {}", key);
        Some(entry.result.clone())
    }

    /// Store `result` under `key`, stamped with the current time and the
    /// store's TTL. Overwrites any existing entry. Write failures are
    /// returned, never swallowed; a failed write leaves the previous record
    /// file intact.
    pub fn put(
        &self,
        key: &str,
        result: JsonValue,
        fingerprint: ProjectFingerprint,
    ) -> Result<(), CacheError> {
        let mut entries = self.load_entries();
        entries.insert(
            key.to_string(),
            CacheEntry { stored_at: Utc::now(), ttl_seconds: self.ttl_seconds, fingerprint, result },
        );
        self.save_entries(&entries)?;
        tracing::info!("result cached: {}", key);
        Ok(())
    }

    /// Delete one entry, or the whole record file when `key` is `None`.
    pub fn invalidate(&self, key: Option<&str>) -> Result<(), CacheError> {
        match key {
            None => {
                if self.cache_file.exists() {
                    fs::remove_file(&self.cache_file).map_err(|source| CacheError::Io {
                        path: self.cache_file.clone(),
                        source,
                    })?;
                    tracing::info!("cache cleared");
                }
                Ok(())
            }
            Some(key) => {
                let mut entries = self.load_entries();
                if entries.remove(key).is_some() {
                    self.save_entries(&entries)?;
                    tracing::info!("cache invalidated: {}", key);
                }
                Ok(())
            }
        }
    }

    /// Remove TTL-expired entries and return how many were removed. Explicit
    /// and caller-triggered; `get` never rewrites the record file.
    pub fn sweep_expired(&self) -> Result<usize, CacheError> {
        let mut entries = self.load_entries();
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            self.save_entries(&entries)?;
        }
        tracing::debug!("swept {} expired cache entries", removed);
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.load_entries();
        let now = Utc::now();
        let oldest_entry_age_secs = entries
            .values()
            .map(|e| now.signed_duration_since(e.stored_at).num_seconds())
            .max();
        let total_stored_bytes =
            self.cache_file.metadata().map(|m| m.len()).unwrap_or(0);
        CacheStats { entry_count: entries.len(), total_stored_bytes, oldest_entry_age_secs }
    }

    fn load_entries(&self) -> BTreeMap<String, CacheEntry> {
        let content = match fs::read_to_string(&self.cache_file) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("failed to read cache file, treating as empty: {}", e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("malformed cache file, treating as empty: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// Atomic rename-over write: a crash mid-write can never leave a
    /// partially written record file in place of a readable one.
    fn save_entries(&self, entries: &BTreeMap<String, CacheEntry>) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|source| CacheError::Io { path: self.cache_dir.clone(), source })?;
        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp_file = self.cache_file.with_extension("json.tmp");
        fs::write(&tmp_file, serialized)
            .map_err(|source| CacheError::Io { path: tmp_file.clone(), source })?;
        fs::rename(&tmp_file, &self.cache_file)
            .map_err(|source| CacheError::Io { path: self.cache_file.clone(), source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{fingerprint_project, HashMode};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn project_fp(root: &Path, paths: &[&str]) -> ProjectFingerprint {
        let owned: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        fingerprint_project(root, &owned, HashMode::Fast)
    }

    #[test]
    fn test_put_then_get_within_ttl_returns_result() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.py"), "print('a')").unwrap();
        let store = CacheStore::new(tmp.path());
        let fp = project_fp(tmp.path(), &["a.py"]);

        let result = json!({"issues": [], "total": 0});
        store.put("static:deployment", result.clone(), fp.clone()).unwrap();

        assert_eq!(store.get("static:deployment", &fp), Some(result));
    }

    #[test]
    fn test_missing_key_is_miss() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        assert!(store.get("absent", &ProjectFingerprint::default()).is_none());
    }

    #[test]
    fn test_changed_file_is_miss() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.py"), "original").unwrap();
        let store = CacheStore::new(tmp.path());
        let fp = project_fp(tmp.path(), &["a.py"]);
        store.put("static:deployment", json!(1), fp).unwrap();

        fs::write(tmp.path().join("a.py"), "modified, and longer").unwrap();
        let fresh = project_fp(tmp.path(), &["a.py"]);
        assert!(store.get("static:deployment", &fresh).is_none());
    }

    #[test]
    fn test_added_file_is_miss() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.py"), "a").unwrap();
        let store = CacheStore::new(tmp.path());
        let fp = project_fp(tmp.path(), &["a.py"]);
        store.put("static:deployment", json!(1), fp).unwrap();

        fs::write(tmp.path().join("b.py"), "b").unwrap();
        let fresh = project_fp(tmp.path(), &["a.py", "b.py"]);
        assert!(store.get("static:deployment", &fresh).is_none());
    }

    #[test]
    fn test_zero_ttl_is_always_miss() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.py"), "a").unwrap();
        let store = CacheStore::new(tmp.path()).with_ttl_seconds(0);
        let fp = project_fp(tmp.path(), &["a.py"]);
        store.put("static:deployment", json!(1), fp.clone()).unwrap();

        assert!(store.get("static:deployment", &fp).is_none());
    }

    #[test]
    fn test_invalidate_specific_key_leaves_others() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        let fp = ProjectFingerprint::default();
        store.put("key1", json!(1), fp.clone()).unwrap();
        store.put("key2", json!(2), fp.clone()).unwrap();

        store.invalidate(Some("key1")).unwrap();

        assert!(store.get("key1", &fp).is_none());
        assert_eq!(store.get("key2", &fp), Some(json!(2)));
    }

    #[test]
    fn test_invalidate_all_removes_record_file() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        store.put("key1", json!(1), ProjectFingerprint::default()).unwrap();

        store.invalidate(None).unwrap();
        assert!(!store.cache_file().exists());
    }

    #[test]
    fn test_malformed_record_file_is_miss_not_error() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        fs::create_dir_all(tmp.path().join(CACHE_DIR_NAME)).unwrap();
        fs::write(store.cache_file(), "{not valid json").unwrap();

        assert!(store.get("key", &ProjectFingerprint::default()).is_none());
    }

    #[test]
    fn test_sweep_expired_removes_and_counts() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path()).with_ttl_seconds(0);
        let fp = ProjectFingerprint::default();
        store.put("key1", json!(1), fp.clone()).unwrap();
        store.put("key2", json!(2), fp).unwrap();

        let removed = store.sweep_expired().unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.stats().entry_count, 0);
    }

    #[test]
    fn test_sweep_keeps_live_entries() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        store.put("key1", json!(1), ProjectFingerprint::default()).unwrap();

        assert_eq!(store.sweep_expired().unwrap(), 0);
        assert_eq!(store.stats().entry_count, 1);
    }

    #[test]
    fn test_stats_reports_entries_and_age() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        store.put("key1", json!(1), ProjectFingerprint::default()).unwrap();
        store.put("key2", json!(2), ProjectFingerprint::default()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.entry_count, 2);
        assert!(stats.total_stored_bytes > 0);
        assert!(stats.oldest_entry_age_secs.unwrap() >= 0);
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        let fp = ProjectFingerprint::default();
        store.put("key", json!({"v": 1}), fp.clone()).unwrap();
        store.put("key", json!({"v": 2}), fp.clone()).unwrap();

        assert_eq!(store.get("key", &fp), Some(json!({"v": 2})));
        assert_eq!(store.stats().entry_count, 1);
    }
}
