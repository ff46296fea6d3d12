//! Fingerprint command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::collect::CandidateCollector;
use crate::config::load_config;
use crate::fingerprint::{fingerprint_project, HashMode};

#[derive(Args)]
pub struct FingerprintArgs {
    /// Project directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Hash full file content instead of size+mtime
    #[arg(long)]
    pub strong: bool,
}

pub fn run(args: FingerprintArgs) -> Result<()> {
    let root = args.path.canonicalize()?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config = load_config(&root, None)?;
    let collector = CandidateCollector::new(root.clone())
        .include_extensions(config.include_extensions.clone())
        .exclude_globs(config.exclude_globs.clone())
        .max_file_bytes(config.max_file_bytes)
        .respect_gitignore(config.respect_gitignore);
    let candidates = collector.collect()?;
    let paths = CandidateCollector::relative_paths(&candidates);

    let mode = if args.strong { HashMode::Strong } else { HashMode::Fast };
    let fingerprint = fingerprint_project(&root, &paths, mode);

    println!("Files: {}", fingerprint.len());
    println!("Fingerprint: {}", fingerprint.combined_hash());

    Ok(())
}
