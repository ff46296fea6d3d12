//! Configuration loading.
//!
//! Settings come from `vibe-audit.toml` (or `.vibe-audit.toml`) at the
//! project root. An explicitly provided config file fails hard on parse
//! errors; an auto-discovered one warns and falls back to defaults.

use crate::domain::{default_include_extensions, SelectionBudget};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub max_files: usize,
    pub max_lines_high_priority: usize,
    pub max_lines_normal: usize,
    pub cache_ttl_hours: u64,
    pub include_extensions: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub respect_gitignore: bool,
    pub max_file_bytes: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        let budget = SelectionBudget::default();
        Self {
            max_files: budget.max_files,
            max_lines_high_priority: budget.max_lines_high_priority,
            max_lines_normal: budget.max_lines_normal,
            cache_ttl_hours: 24,
            include_extensions: default_include_extensions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_globs: Vec::new(),
            respect_gitignore: true,
            max_file_bytes: 1_048_576,
        }
    }
}

impl AuditConfig {
    pub fn budget(&self) -> SelectionBudget {
        SelectionBudget {
            max_files: self.max_files,
            max_lines_high_priority: self.max_lines_high_priority,
            max_lines_normal: self.max_lines_normal,
        }
    }

    pub fn cache_ttl_seconds(&self) -> u64 {
        self.cache_ttl_hours * 3600
    }
}

pub fn load_config(project_root: &Path, config_path: Option<&Path>) -> Result<AuditConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(project_root),
    };

    let Some(config_file) = discovered else {
        return Ok(AuditConfig::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    match toml::from_str(&content)
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
    {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            if config_path_provided {
                return Err(e);
            }
            // Auto-discovered: warn and fall back to defaults.
            tracing::warn!("ignoring unparseable config {}: {}", config_file.display(), e);
            Ok(AuditConfig::default())
        }
    }
}

fn discover_config(project_root: &Path) -> Option<PathBuf> {
    let candidates = ["vibe-audit.toml", ".vibe-audit.toml"];
    for candidate in candidates {
        let path = project_root.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
