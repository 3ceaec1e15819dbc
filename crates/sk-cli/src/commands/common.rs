//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use sk_core::{Config, QueryLoader, TableRef};
use std::path::Path;

use crate::cli::GlobalArgs;

/// Load config from `--config` or the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path)).context("Failed to load configuration file"),
        None => Config::load_from_dir(Path::new(&global.project_dir))
            .context("Failed to load project configuration"),
    }
}

/// Load the configured query directory, or the builtin queries.
pub(crate) fn load_queries(config: &Config, root: &Path) -> Result<QueryLoader> {
    match config.queries_dir_absolute(root) {
        Some(dir) => QueryLoader::from_dir(&dir)
            .with_context(|| format!("Failed to load queries from {}", dir.display())),
        None => QueryLoader::builtin().context("Failed to load builtin queries"),
    }
}

/// Expand `table`, `schema.table` or `catalog.schema.table` to a full
/// reference using the given defaults.
pub(crate) fn qualify_table_ref(input: &str, catalog: &str, schema: &str) -> Result<TableRef> {
    let full = match input.split('.').count() {
        1 => format!("{catalog}.{schema}.{input}"),
        2 => format!("{catalog}.{input}"),
        _ => input.to_string(),
    };
    TableRef::parse(&full).with_context(|| format!("Invalid table reference '{input}'"))
}

/// Print `value` as pretty JSON to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Calculate column widths for table output.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Prints a left-aligned header row, a separator line of dashes, and each
/// data row, with columns separated by two spaces.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

/// Render a boolean as `YES`/`NO`.
pub(crate) fn yes_no(value: bool) -> String {
    (if value { "YES" } else { "NO" }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths() {
        let widths = calculate_column_widths(
            &["NAME", "TYPE"],
            &[
                vec!["orders".into(), "VIEW".into()],
                vec!["a".into(), "BASE TABLE".into()],
            ],
        );
        assert_eq!(widths, vec![6, 10]);
    }

    #[test]
    fn test_qualify_table_ref() {
        let r = qualify_table_ref("users", "memory", "main").unwrap();
        assert_eq!(r.to_string(), "memory.main.users");
        let r = qualify_table_ref("sales.orders", "memory", "main").unwrap();
        assert_eq!(r.to_string(), "memory.sales.orders");
        let r = qualify_table_ref("w.s.t", "memory", "main").unwrap();
        assert_eq!(r.to_string(), "w.s.t");
        assert!(qualify_table_ref("a.b.c.d", "memory", "main").is_err());
        assert!(qualify_table_ref("bad name", "memory", "main").is_err());
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "YES");
        assert_eq!(yes_no(false), "NO");
    }
}
