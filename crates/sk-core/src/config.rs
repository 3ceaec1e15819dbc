//! Configuration types and parsing for schemakit.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names searched by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["schemakit.yml", "schemakit.yaml"];

/// Main configuration from schemakit.yml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Default schema used when a command does not name one
    #[serde(default)]
    pub schema: Option<String>,

    /// Schema cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Directory holding an external `manifest.json` and its SQL files.
    ///
    /// When unset, the built-in introspection queries are used.
    #[serde(default)]
    pub queries_dir: Option<String>,

    /// Warmup gate settings
    #[serde(default)]
    pub warmup: WarmupConfig,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Schema override
    #[serde(default)]
    pub schema: Option<String>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Catalog name to introspect. When unset, the connected database's
    /// `current_database()` is used.
    #[serde(default)]
    pub catalog: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            catalog: None,
        }
    }
}

/// Schema cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Directory for JSON cache files, relative to the project directory
    #[serde(default = "default_cache_dir")]
    pub dir: String,

    /// Seconds before a cached schema is considered stale
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_seconds: default_cache_ttl(),
        }
    }
}

/// Warmup gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarmupConfig {
    /// Run the warmup statement before the first real operation
    #[serde(default = "default_warmup_enabled")]
    pub enabled: bool,

    /// Seconds a successful warmup stays valid
    #[serde(default = "default_warmup_ttl")]
    pub ttl_seconds: u64,

    /// Seconds to wait after a failed warmup before trying again
    #[serde(default = "default_warmup_backoff")]
    pub failure_backoff_seconds: u64,

    /// Statement executed to warm the connection
    #[serde(default = "default_warmup_sql")]
    pub sql: String,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_warmup_ttl(),
            failure_backoff_seconds: default_warmup_backoff(),
            sql: default_warmup_sql(),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";


/// Schema used when neither the CLI nor the config names one.
pub const DEFAULT_SCHEMA: &str = "main";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_cache_dir() -> String {
    ".schemakit/cache".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_warmup_enabled() -> bool {
    true
}

fn default_warmup_ttl() -> u64 {
    600
}

fn default_warmup_backoff() -> u64 {
    30
}

fn default_warmup_sql() -> String {
    "SELECT 1".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory.
    ///
    /// Looks for schemakit.yml or schemakit.yaml and falls back to the
    /// defaults when neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.cache.dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "cache.dir cannot be empty".to_string(),
            });
        }
        if self.warmup.enabled && self.warmup.sql.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "warmup.sql cannot be empty when warmup is enabled".to_string(),
            });
        }
        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                if db.path.trim().is_empty() {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("targets.{name}.database.path cannot be empty"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Get schema, optionally applying target overrides
    pub fn get_schema(&self, target: Option<&str>) -> &str {
        target
            .and_then(|name| self.targets.get(name))
            .and_then(|tc| tc.schema.as_deref())
            .or(self.schema.as_deref())
            .unwrap_or(DEFAULT_SCHEMA)
    }

    /// Get the sorted list of available target names
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get absolute cache directory relative to a project root
    pub fn cache_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.cache.dir)
    }

    /// Get absolute queries directory relative to a project root, if configured
    pub fn queries_dir_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.queries_dir.as_ref().map(|dir| root.join(dir))
    }

    /// Resolve target from CLI flag or SK_TARGET environment variable
    ///
    /// Priority: CLI flag > SK_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var("SK_TARGET").ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
