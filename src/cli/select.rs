//! Select command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::collect::CandidateCollector;
use crate::config::load_config;
use crate::select::select;

#[derive(Args)]
pub struct SelectArgs {
    /// Project directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Config file (defaults to vibe-audit.toml at the project root)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the maximum number of files submitted
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,

    /// Print the truncated content of each selected file
    #[arg(long)]
    pub show_content: bool,
}

pub fn run(args: SelectArgs) -> Result<()> {
    let root = args.path.canonicalize()?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config = load_config(&root, args.config.as_deref())?;
    let mut budget = config.budget();
    if let Some(max_files) = args.max_files {
        budget.max_files = max_files;
    }

    let collector = CandidateCollector::new(root.clone())
        .include_extensions(config.include_extensions.clone())
        .exclude_globs(config.exclude_globs.clone())
        .max_file_bytes(config.max_file_bytes)
        .respect_gitignore(config.respect_gitignore && !args.no_gitignore);
    let candidates = collector.collect()?;
    let candidate_count = candidates.len();

    let selected = select(&candidates, &budget);

    println!("Candidates: {}", candidate_count);
    println!("Selected: {} (budget: {})", selected.len(), budget.max_files);
    for file in &selected {
        let marker = if file.truncated { " [truncated]" } else { "" };
        println!(
            "  {:>5}  {} ({} lines){}",
            file.score,
            file.relative_path,
            file.content.lines().count(),
            marker
        );
    }

    if args.show_content {
        for file in &selected {
            println!("\n### {}\n{}", file.relative_path, file.content);
        }
    }

    Ok(())
}
