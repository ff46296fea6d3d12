//! Fingerprint-keyed result caching for expensive analysis steps.
//!
//! The store persists one JSON record file per project root and answers "is
//! this result still valid?" by comparing a stored project fingerprint against
//! a freshly computed one. Any ambiguity (missing file, unreadable record,
//! expired TTL, fingerprint drift) resolves to a miss, never a stale hit.

pub mod facade;
pub mod store;

pub use facade::{AnalysisCache, FacadeError};
pub use store::{CacheError, CacheStats, CacheStore, DEFAULT_TTL_SECONDS};
