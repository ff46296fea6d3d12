//! Cache command implementation

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cache::CacheStore;
use crate::config::load_config;

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Show entry count, stored bytes, and oldest entry age
    Stats {
        /// Project directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Remove expired entries
    Sweep {
        /// Project directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Delete one entry, or the whole cache
    Clear {
        /// Project directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Invalidate only this analysis key (e.g. "static:deployment")
        #[arg(long, value_name = "KEY")]
        key: Option<String>,
    },
}

pub fn run(args: CacheArgs) -> Result<()> {
    match args.command {
        CacheCommand::Stats { path } => {
            let store = store_for(&path)?;
            let stats = store.stats();
            println!("Cache entries: {}", stats.entry_count);
            println!("Stored bytes: {}", stats.total_stored_bytes);
            match stats.oldest_entry_age_secs {
                Some(age) => println!("Oldest entry age: {}s", age),
                None => println!("Oldest entry age: n/a"),
            }
        }
        CacheCommand::Sweep { path } => {
            let store = store_for(&path)?;
            let removed = store.sweep_expired()?;
            println!("Removed {} expired entries", removed);
        }
        CacheCommand::Clear { path, key } => {
            let store = store_for(&path)?;
            store.invalidate(key.as_deref())?;
            match key {
                Some(key) => println!("Invalidated: {}", key),
                None => println!("Cache cleared"),
            }
        }
    }
    Ok(())
}

fn store_for(path: &PathBuf) -> Result<CacheStore> {
    let root = path.canonicalize()?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }
    let config = load_config(&root, None)?;
    Ok(CacheStore::new(&root).with_ttl_seconds(config.cache_ttl_seconds()))
}
