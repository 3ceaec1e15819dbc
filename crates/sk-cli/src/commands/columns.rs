//! Columns command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, TableArgs};
use crate::commands::common::{print_json, print_table, yes_no};
use crate::context::RuntimeContext;

/// Execute the columns command
pub async fn execute(args: &TableArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let columns = ctx
        .introspector()
        .table_columns(&ctx.catalog, &ctx.schema, &args.table)
        .await
        .with_context(|| format!("Failed to read columns of {}", args.table))?;

    match ctx.output {
        OutputFormat::Json => print_json(&columns)?,
        OutputFormat::Table => {
            if columns.is_empty() {
                println!(
                    "No columns found for {}.{}.{}",
                    ctx.catalog, ctx.schema, args.table
                );
                return Ok(());
            }
            let rows: Vec<Vec<String>> = columns
                .iter()
                .map(|c| {
                    vec![
                        c.ordinal_position.to_string(),
                        c.column_name.clone(),
                        c.data_type.clone(),
                        yes_no(c.is_nullable),
                    ]
                })
                .collect();
            print_table(&["POSITION", "COLUMN", "TYPE", "NULLABLE"], &rows);
        }
    }
    Ok(())
}
