//! vibe-audit: cache-aware artifact selection for AI-assisted code audits
//!
//! This crate holds the two load-bearing pieces of the audit pipeline: a
//! fingerprint-keyed result cache that prevents re-running expensive analysis
//! when nothing relevant changed, and a budgeted importance scorer that picks
//! which files get submitted to the downstream review service under a hard
//! cap. The analyzers and the review service itself are external processes;
//! this crate only decides what to run them on and whether to run them at all.

pub mod cache;
pub mod cli;
pub mod collect;
pub mod config;
pub mod domain;
pub mod fingerprint;
pub mod select;
