//! sk-core - Core library for SchemaKit
//!
//! This crate provides configuration parsing, typed table references, the
//! query manifest and loader, named-parameter binding, and the read-only SQL
//! guards shared by every SchemaKit component.

pub mod config;
pub mod error;
pub mod names;
pub mod query;
pub mod sql_guard;
pub mod table_ref;
pub mod value;

pub use config::{CacheConfig, Config, DatabaseConfig, DbType, TargetConfig, WarmupConfig};
pub use error::{CoreError, CoreResult};
pub use names::{CatalogName, SchemaName, TableName};
pub use query::{
    NamedSql, ParamType, Params, PreparedQuery, QueryDefinition, QueryLoader, QueryParameter,
};
pub use table_ref::TableRef;
pub use value::SqlValue;
