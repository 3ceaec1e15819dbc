//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// SchemaKit - inspect database schemas through parameterized information_schema queries
#[derive(Parser, Debug)]
#[command(name = "sk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override database path (":memory:" or a DuckDB file)
    #[arg(long, global = true, env = "SK_DATABASE")]
    pub database: Option<String>,

    /// Override catalog name
    #[arg(long, global = true, env = "SK_CATALOG")]
    pub catalog: Option<String>,

    /// Override schema name
    #[arg(short, long, global = true, env = "SK_SCHEMA")]
    pub schema: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON output
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tables and views in the schema
    Tables,

    /// Show primary key columns of a table
    Keys(TableArgs),

    /// Show column definitions of a table
    Columns(TableArgs),

    /// Show the cached full schema of a table
    Describe(DescribeArgs),

    /// List queries in the manifest
    Queries(QueriesArgs),

    /// Manage the schema cache
    Cache(CacheArgs),
}

/// Arguments for commands that take a single table name
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Table name within the selected catalog and schema
    pub table: String,
}

/// Arguments for the describe command
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Table reference: table, schema.table, or catalog.schema.table
    pub table_ref: String,

    /// Drop any cached schema and fetch it again
    #[arg(long)]
    pub refresh: bool,
}

/// Arguments for the queries command
#[derive(Args, Debug)]
pub struct QueriesArgs {
    /// Only list queries carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Print each query's SQL
    #[arg(long)]
    pub show_sql: bool,
}

/// Arguments for the cache command
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove cached schemas (all, or one table)
    Clear(CacheClearArgs),
}

/// Arguments for cache clear
#[derive(Args, Debug)]
pub struct CacheClearArgs {
    /// Table reference (catalog.schema.table); clears everything when omitted
    pub table_ref: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
