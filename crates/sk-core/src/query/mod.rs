//! Externalized, parameterized SQL.

pub mod definition;
pub mod loader;
pub mod manifest;
pub mod named;

pub use definition::{ParamType, Params, PreparedQuery, QueryDefinition, QueryParameter};
pub use loader::QueryLoader;
pub use manifest::{Manifest, ManifestEntry};
pub use named::NamedSql;

/// Tables and views of one schema.
pub const LIST_TABLES: &str = "schema.list_tables";

/// Primary key columns of one table.
pub const PRIMARY_KEYS: &str = "schema.primary_keys";

/// Column definitions of one table.
pub const TABLE_COLUMNS: &str = "schema.table_columns";
