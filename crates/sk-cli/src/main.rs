//! SchemaKit CLI - schema introspection through parameterized queries

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{cache, columns, describe, keys, queries, tables};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Tables => tables::execute(&cli.global).await,
        cli::Commands::Keys(args) => keys::execute(args, &cli.global).await,
        cli::Commands::Columns(args) => columns::execute(args, &cli.global).await,
        cli::Commands::Describe(args) => describe::execute(args, &cli.global).await,
        cli::Commands::Queries(args) => queries::execute(args, &cli.global).await,
        cli::Commands::Cache(args) => cache::execute(args, &cli.global).await,
    }
}
