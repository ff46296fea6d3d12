//! Importance scoring and budgeted file selection.
//!
//! The scorer is a pure function over precomputed candidate attributes; the
//! selector ranks every candidate and returns a bounded, deterministic subset
//! with content truncated to the per-class line cap.

pub mod scorer;
pub mod selector;

pub use scorer::{score, NameClass};
pub use selector::select;
