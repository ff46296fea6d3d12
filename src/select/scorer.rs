//! Candidate importance scoring.
//!
//! Four additive signals: name pattern, depth from root, structural
//! complexity, and size fit. All inputs are precomputed by the collector, so
//! scoring does no I/O and never fails: a candidate with no recognizable
//! shape simply gets the baseline name and depth signals.

use crate::domain::Candidate;
use std::path::Path;

const ENTRYPOINT_PATTERNS: &[&str] = &[
    "main", "app", "index", "server", "config", "router", "controller", "service", "handler",
    "api",
];
const DOMAIN_MODEL_PATTERNS: &[&str] = &["model", "view", "component", "module"];
const UTILITY_PATTERNS: &[&str] = &["util", "helper", "common", "test", "spec"];

/// Lower bound of the size sweet spot, in lines. Files below it read as
/// stubs and earn no size credit.
const SIZE_SWEET_SPOT_MIN: usize = 50;
/// Upper bound for entrypoint-class files, which are expected to be larger
/// and more central than ordinary files.
const SIZE_SWEET_SPOT_MAX_ENTRYPOINT: usize = 1000;
const SIZE_SWEET_SPOT_MAX_NORMAL: usize = 500;

/// Closed set of filename classes, checked in precedence order so that a
/// name matching several lists still classifies deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameClass {
    Entrypoint,
    DomainModel,
    Utility,
    Unclassified,
}

impl NameClass {
    /// Classify by case-insensitive substring match on the file stem.
    /// First match wins: Entrypoint > DomainModel > Utility.
    pub fn of(relative_path: &str) -> Self {
        let stem = Path::new(relative_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if ENTRYPOINT_PATTERNS.iter().any(|p| stem.contains(p)) {
            NameClass::Entrypoint
        } else if DOMAIN_MODEL_PATTERNS.iter().any(|p| stem.contains(p)) {
            NameClass::DomainModel
        } else if UTILITY_PATTERNS.iter().any(|p| stem.contains(p)) {
            NameClass::Utility
        } else {
            NameClass::Unclassified
        }
    }

    fn signal(self) -> i64 {
        match self {
            NameClass::Entrypoint => 100,
            NameClass::DomainModel => 50,
            NameClass::Utility => -30,
            NameClass::Unclassified => 0,
        }
    }
}

/// Score a candidate. Deterministic and infallible.
pub fn score(candidate: &Candidate) -> i64 {
    let class = NameClass::of(&candidate.relative_path);
    class.signal()
        + depth_signal(candidate.depth)
        + structure_signal(candidate)
        + size_fit_signal(candidate.line_count, class)
}

/// Root-level files (depth 1) score 50, minus 10 per directory level,
/// floored at 0 beyond depth 5.
fn depth_signal(depth: usize) -> i64 {
    let levels_below_root = depth.saturating_sub(1) as i64;
    (50 - 10 * levels_below_root).max(0)
}

fn structure_signal(candidate: &Candidate) -> i64 {
    5 * candidate.function_count as i64
        + 10 * candidate.class_count as i64
        + 3 * candidate.import_count as i64
}

/// Within the class's sweet-spot band → +20; oversized → +10 (penalized but
/// still ranked); undersized → 0.
fn size_fit_signal(line_count: usize, class: NameClass) -> i64 {
    let upper = match class {
        NameClass::Entrypoint => SIZE_SWEET_SPOT_MAX_ENTRYPOINT,
        _ => SIZE_SWEET_SPOT_MAX_NORMAL,
    };
    if line_count < SIZE_SWEET_SPOT_MIN {
        0
    } else if line_count <= upper {
        20
    } else {
        10
    }
}
