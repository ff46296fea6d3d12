//! Shared domain types for candidate selection.

use serde::{Deserialize, Serialize};

/// File extensions the audit considers source code.
pub fn default_include_extensions() -> &'static [&'static str] {
    &[
        ".py", ".js", ".jsx", ".ts", ".tsx", ".go", ".rs", ".java", ".kt", ".kts", ".php", ".cs",
        ".rb", ".swift",
    ]
}

/// Directories never worth descending into.
pub fn default_exclude_dirs() -> &'static [&'static str] {
    &[
        "node_modules",
        "venv",
        ".venv",
        ".git",
        "__pycache__",
        "build",
        "dist",
        "target",
        "vendor",
    ]
}

/// Coarse size bucket derived from a file's line count.
///
/// Used for display and logging only; the scorer works from the raw line
/// count and the file's name class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Tiny,
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    pub fn from_line_count(lines: usize) -> Self {
        match lines {
            0..=49 => SizeCategory::Tiny,
            50..=199 => SizeCategory::Small,
            200..=499 => SizeCategory::Medium,
            _ => SizeCategory::Large,
        }
    }
}

/// A file awaiting scoring. Computed fresh per selection round, never
/// persisted. All attributes are precomputed by the collector so that
/// scoring itself does no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path relative to the project root, '/'-normalized.
    pub relative_path: String,
    /// Directory depth from the root; a root-level file has depth 1.
    pub depth: usize,
    pub line_count: usize,
    /// Approximate declaration counts from lightweight pattern matching.
    pub function_count: usize,
    pub class_count: usize,
    pub import_count: usize,
    pub size_category: SizeCategory,
}

/// A candidate together with its content, as produced by the collector.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub candidate: Candidate,
    pub content: String,
}

/// Hard caps on what gets submitted downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionBudget {
    /// Maximum number of files submitted per review round.
    pub max_files: usize,
    /// Line cap for entrypoint-class files.
    pub max_lines_high_priority: usize,
    /// Line cap for every other file.
    pub max_lines_normal: usize,
}

impl Default for SelectionBudget {
    fn default() -> Self {
        Self { max_files: 50, max_lines_high_priority: 1000, max_lines_normal: 500 }
    }
}

/// One file chosen for submission, content already truncated to budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub relative_path: String,
    pub content: String,
    /// True when the content was cut to the line cap.
    pub truncated: bool,
    pub score: i64,
}
