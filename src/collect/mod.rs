//! Candidate collection: walks the project tree and precomputes the
//! attributes the scorer needs.
//!
//! Declaration counts come from lightweight pattern matching across common
//! syntaxes, not a parse. Approximate by design, optimized for breadth of
//! language coverage over precision.

use crate::domain::{
    default_exclude_dirs, default_include_extensions, Candidate, CandidateFile, SizeCategory,
};
use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(?:pub|public|private|protected|static|async|export|default)\s+)*(?:fn|def|func|function)\s+[A-Za-z_]",
    )
    .unwrap()
});

static TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(?:pub|public|private|protected|abstract|final|export|default)\s+)*(?:class|struct|interface|trait|enum)\s+[A-Za-z_]",
    )
    .unwrap()
});

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(?:import\s|from\s+\S+\s+import\s|use\s+[A-Za-z_:]|require\s*\(|#include\s|using\s+[A-Za-z_])"#)
        .unwrap()
});

/// Walks a project root and produces scoring candidates in deterministic,
/// path-lexicographic order. That ordering is the discovery order the
/// selector's tie-break relies on.
pub struct CandidateCollector {
    root: PathBuf,
    include_extensions: Vec<String>,
    exclude_globs: Vec<String>,
    max_file_bytes: u64,
    respect_gitignore: bool,
}

impl CandidateCollector {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            include_extensions: default_include_extensions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_globs: Vec::new(),
            max_file_bytes: 1_048_576, // 1MB
            respect_gitignore: true,
        }
    }

    /// Set file extensions to include (e.g., ".rs", ".py")
    pub fn include_extensions(mut self, extensions: Vec<String>) -> Self {
        self.include_extensions = extensions;
        self
    }

    /// Set maximum file size in bytes
    pub fn max_file_bytes(mut self, max_bytes: u64) -> Self {
        self.max_file_bytes = max_bytes;
        self
    }

    /// Set whether to respect gitignore files
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set glob patterns to exclude
    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    fn build_exclude_globset(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        Ok(builder.build()?)
    }

    fn should_include_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if ext.is_empty() {
            return false;
        }
        let ext_with_dot = format!(".{ext}");
        self.include_extensions.contains(&ext_with_dot)
    }

    /// Walk the tree and build candidates, sorted by relative path.
    pub fn collect(&self) -> Result<Vec<CandidateFile>> {
        let dir_filter = |entry: &ignore::DirEntry| -> bool {
            if let Some(file_type) = entry.file_type() {
                if file_type.is_dir() {
                    if let Some(name) = entry.file_name().to_str() {
                        if default_exclude_dirs().contains(&name) {
                            return false;
                        }
                        if name.starts_with('.') {
                            return false;
                        }
                    }
                }
            }
            true
        };

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .follow_links(false)
            .hidden(false)
            .parents(self.respect_gitignore)
            .filter_entry(dir_filter);

        let exclude_globset = self.build_exclude_globset()?;

        let mut discovered: Vec<(PathBuf, String)> = Vec::new();
        for entry in builder.build().flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if !self.should_include_extension(path) {
                continue;
            }
            let metadata = match path.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };
            if metadata.len() > self.max_file_bytes {
                continue;
            }
            let rel_path = match path.strip_prefix(&self.root) {
                Ok(p) => p.to_str().unwrap_or("").replace('\\', "/"),
                Err(_) => continue,
            };
            if rel_path.is_empty() || exclude_globset.is_match(&rel_path) {
                continue;
            }
            discovered.push((path.to_path_buf(), rel_path));
        }

        // Sort by relative path for deterministic discovery order.
        discovered.sort_by(|a, b| a.1.cmp(&b.1));

        let mut candidates = Vec::with_capacity(discovered.len());
        for (path, rel_path) in discovered {
            let content = match std::fs::read(&path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::debug!("skipping unreadable file {}: {}", rel_path, e);
                    continue;
                }
            };
            candidates.push(build_candidate(rel_path, content));
        }

        Ok(candidates)
    }

    /// Relative paths of all candidate files, for fingerprinting the scope
    /// of a cache key.
    pub fn relative_paths(candidates: &[CandidateFile]) -> Vec<String> {
        candidates.iter().map(|c| c.candidate.relative_path.clone()).collect()
    }
}

fn build_candidate(relative_path: String, content: String) -> CandidateFile {
    let line_count = content.lines().count();
    let candidate = Candidate {
        depth: relative_path.split('/').count(),
        line_count,
        function_count: FUNCTION_RE.find_iter(&content).count(),
        class_count: TYPE_RE.find_iter(&content).count(),
        import_count: IMPORT_RE.find_iter(&content).count(),
        size_category: SizeCategory::from_line_count(line_count),
        relative_path,
    };
    CandidateFile { candidate, content }
}
