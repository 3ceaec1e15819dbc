//! sk-meta - Schema metadata for SchemaKit
//!
//! Runs the information-schema introspection queries, models their results,
//! and serves full table schemas through a hybrid memory/file cache.

pub mod cache;
pub mod error;
pub mod introspect;
pub mod models;
pub mod provider;

pub use cache::SchemaCache;
pub use error::{MetaError, MetaResult};
pub use introspect::SchemaIntrospector;
pub use models::{ColumnDescriptor, ColumnSchema, TableDescriptor, TableSchema};
pub use provider::{is_wildcard, ResolvedSchema, SchemaProvider};
