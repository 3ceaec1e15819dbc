//! Queries command implementation

use anyhow::Result;
use serde_json::json;
use sk_core::QueryDefinition;
use std::path::Path;

use crate::cli::{GlobalArgs, OutputFormat, QueriesArgs};
use crate::commands::common::{load_config, load_queries, print_json, print_table};

/// Execute the queries command
pub async fn execute(args: &QueriesArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let loader = load_queries(&config, Path::new(&global.project_dir))?;

    let definitions: Vec<&QueryDefinition> = match &args.tag {
        Some(tag) => loader
            .list_by_tag(tag)
            .into_iter()
            .map(|key| loader.get(key))
            .collect::<Result<_, _>>()?,
        None => loader.definitions().collect(),
    };

    if global.verbose {
        eprintln!(
            "[verbose] {} of {} queries selected",
            definitions.len(),
            loader.len()
        );
    }

    match global.output {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = definitions
                .iter()
                .map(|d| {
                    let mut entry = json!({
                        "key": d.key,
                        "description": d.description,
                        "parameters": d.parameters,
                        "cache_ttl": d.cache_ttl,
                        "tags": d.tags,
                    });
                    if args.show_sql {
                        entry["sql"] = json!(d.sql);
                    }
                    entry
                })
                .collect();
            print_json(&entries)?;
        }
        OutputFormat::Table => {
            if definitions.is_empty() {
                println!("No queries found.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = definitions
                .iter()
                .map(|d| {
                    let params: Vec<String> = d
                        .parameters
                        .iter()
                        .map(|p| format!("{}:{}", p.name, p.param_type))
                        .collect();
                    vec![
                        d.key.clone(),
                        params.join(", "),
                        format!("{}s", d.cache_ttl),
                        d.tags.join(","),
                        d.description.clone(),
                    ]
                })
                .collect();
            print_table(&["KEY", "PARAMETERS", "TTL", "TAGS", "DESCRIPTION"], &rows);

            if args.show_sql {
                for d in &definitions {
                    println!("\n-- {}\n{}", d.key, d.sql);
                }
            }
        }
    }
    Ok(())
}
