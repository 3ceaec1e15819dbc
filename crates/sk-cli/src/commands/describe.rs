//! Describe command implementation

use anyhow::{Context, Result};

use crate::cli::{DescribeArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{print_json, print_table, qualify_table_ref, yes_no};
use crate::context::RuntimeContext;

/// Execute the describe command
pub async fn execute(args: &DescribeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let table_ref = qualify_table_ref(&args.table_ref, &ctx.catalog, &ctx.schema)?;
    let provider = ctx.provider();

    if args.refresh {
        ctx.verbose(&format!("Invalidating cached schema for {}", table_ref));
        provider
            .invalidate_table_schema(&table_ref)
            .context("Failed to invalidate cached schema")?;
    }

    let schema = provider
        .get_table_schema(&table_ref)
        .await
        .with_context(|| format!("Failed to describe {}", table_ref))?;

    match ctx.output {
        OutputFormat::Json => print_json(&schema)?,
        OutputFormat::Table => {
            println!(
                "{} (fetched {})\n",
                schema.table_ref(),
                schema.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            let rows: Vec<Vec<String>> = schema
                .columns
                .iter()
                .map(|c| {
                    vec![
                        c.ordinal_position.to_string(),
                        c.column_name.clone(),
                        c.data_type.clone(),
                        c.normalized_type(),
                        yes_no(c.is_nullable),
                        if c.is_primary_key { "PK" } else { "" }.to_string(),
                    ]
                })
                .collect();
            print_table(
                &["POSITION", "COLUMN", "TYPE", "FAMILY", "NULLABLE", "KEY"],
                &rows,
            );
        }
    }
    Ok(())
}
