//! Runtime context for CLI commands

use anyhow::{Context, Result};
use sk_core::{Config, QueryLoader};
use sk_db::{Database, DuckDbBackend, WarmupGate};
use sk_meta::{SchemaCache, SchemaIntrospector, SchemaProvider};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{GlobalArgs, OutputFormat};
use crate::commands::common::{load_config, load_queries};

/// Runtime context containing loaded config, queries and database connection
pub struct RuntimeContext {
    /// Loaded configuration
    pub config: Config,

    /// Project root directory
    pub root: PathBuf,

    /// Database connection
    pub db: Arc<dyn Database>,

    /// Query definitions
    pub queries: Arc<QueryLoader>,

    /// Catalog queries run against
    pub catalog: String,

    /// Schema queries run against
    pub schema: String,

    /// Output format
    pub output: OutputFormat,

    /// Verbose output enabled
    pub verbose: bool,

    warmup: Arc<WarmupGate>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub async fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);
        let config = load_config(args)?;
        let target = Config::resolve_target(args.target.as_deref());

        let db_config = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database configuration")?;
        let db_path = args.database.as_deref().unwrap_or(&db_config.path);
        let db: Arc<dyn Database> =
            Arc::new(DuckDbBackend::new(db_path).context("Failed to connect to database")?);

        let catalog = args
            .catalog
            .clone()
            .or_else(|| db_config.catalog.clone())
            .unwrap_or_else(|| db.catalog_name().to_string());
        let schema = args
            .schema
            .clone()
            .unwrap_or_else(|| config.get_schema(target.as_deref()).to_string());

        let queries = Arc::new(load_queries(&config, &root)?);
        let warmup = Arc::new(WarmupGate::new(db.clone(), &config.warmup));

        let ctx = Self {
            config,
            root,
            db,
            queries,
            catalog,
            schema,
            output: args.output,
            verbose: args.verbose,
            warmup,
        };
        ctx.verbose(&format!(
            "Connected to {} ({}), catalog={} schema={}",
            db_path,
            ctx.db.db_type(),
            ctx.catalog,
            ctx.schema
        ));
        Ok(ctx)
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Introspector over this context's database and queries
    pub fn introspector(&self) -> SchemaIntrospector {
        SchemaIntrospector::new(self.db.clone(), self.queries.clone())
            .with_warmup(self.warmup.clone())
    }

    /// Cached schema provider rooted at the configured cache directory
    pub fn provider(&self) -> SchemaProvider {
        let cache = SchemaCache::new(
            self.config.cache_dir_absolute(&self.root),
            self.config.cache.ttl_seconds,
        );
        SchemaProvider::new(self.introspector(), cache)
    }
}
