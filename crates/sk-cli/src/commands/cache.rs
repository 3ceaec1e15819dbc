//! Cache command implementation

use anyhow::{Context, Result};
use sk_core::TableRef;
use sk_meta::SchemaCache;
use std::path::Path;

use crate::cli::{CacheArgs, CacheClearArgs, CacheCommands, GlobalArgs};
use crate::commands::common::load_config;

/// Execute the cache command
pub async fn execute(args: &CacheArgs, global: &GlobalArgs) -> Result<()> {
    match &args.command {
        CacheCommands::Clear(clear) => execute_clear(clear, global),
    }
}

fn execute_clear(args: &CacheClearArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let dir = config.cache_dir_absolute(Path::new(&global.project_dir));
    let cache = SchemaCache::new(&dir, config.cache.ttl_seconds);

    if global.verbose {
        eprintln!("[verbose] Schema cache directory: {}", dir.display());
    }

    match &args.table_ref {
        Some(reference) => {
            let table_ref = TableRef::parse(reference)
                .with_context(|| format!("Invalid table reference '{reference}'"))?;
            cache
                .invalidate(&table_ref)
                .with_context(|| format!("Failed to clear cached schema for {table_ref}"))?;
            println!("Cleared cached schema for {}", table_ref);
        }
        None => {
            let removed = cache
                .invalidate_all()
                .context("Failed to clear schema cache")?;
            println!("Removed {} cached schemas from {}", removed, dir.display());
        }
    }
    Ok(())
}
