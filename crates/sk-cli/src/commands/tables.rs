//! Tables command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat};
use crate::commands::common::{print_json, print_table};
use crate::context::RuntimeContext;

/// Execute the tables command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    ctx.verbose(&format!("Listing tables in {}.{}", ctx.catalog, ctx.schema));

    let tables = ctx
        .introspector()
        .list_tables(&ctx.catalog, &ctx.schema)
        .await
        .context("Failed to list tables")?;

    match ctx.output {
        OutputFormat::Json => print_json(&tables)?,
        OutputFormat::Table => {
            if tables.is_empty() {
                println!("No tables found in {}.{}", ctx.catalog, ctx.schema);
                return Ok(());
            }
            let rows: Vec<Vec<String>> = tables
                .iter()
                .map(|t| vec![t.table_name.clone(), t.table_type.clone()])
                .collect();
            print_table(&["TABLE", "TYPE"], &rows);
            println!("\n{} tables", tables.len());
        }
    }
    Ok(())
}
