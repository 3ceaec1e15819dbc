//! Keys command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, TableArgs};
use crate::commands::common::{print_json, print_table};
use crate::context::RuntimeContext;

/// Execute the keys command
pub async fn execute(args: &TableArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let keys = ctx
        .introspector()
        .primary_keys(&ctx.catalog, &ctx.schema, &args.table)
        .await
        .with_context(|| format!("Failed to read primary key of {}", args.table))?;
    ctx.verbose(&format!("{} primary key columns", keys.len()));

    match ctx.output {
        OutputFormat::Json => print_json(&keys)?,
        OutputFormat::Table => {
            if keys.is_empty() {
                println!(
                    "No primary key on {}.{}.{}",
                    ctx.catalog, ctx.schema, args.table
                );
                return Ok(());
            }
            let rows: Vec<Vec<String>> = keys
                .iter()
                .enumerate()
                .map(|(i, name)| vec![(i + 1).to_string(), name.clone()])
                .collect();
            print_table(&["POSITION", "COLUMN"], &rows);
        }
    }
    Ok(())
}
