//! Error types for schema metadata access.

use sk_core::CoreError;
use sk_db::DbError;
use thiserror::Error;

/// Schema metadata errors.
#[derive(Error, Debug)]
pub enum MetaError {
    /// A metadata query failed in the driver (M001).
    #[error("[M001] Metadata query '{query}' failed for {target}: {source}")]
    QueryFailed {
        query: String,
        target: String,
        #[source]
        source: DbError,
    },

    /// A result row did not have the expected shape (M002).
    #[error("[M002] Unexpected result from '{query}': {message}")]
    Decode { query: String, message: String },

    /// The table has no columns in the information schema (M003).
    #[error("[M003] Table not found: {table_ref}")]
    TableNotFound { table_ref: String },

    /// Reading or removing a cache file failed (M004).
    #[error("[M004] Schema cache I/O failed for '{path}': {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Query, parameter or table reference error from sk-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for [`MetaError`].
pub type MetaResult<T> = Result<T, MetaError>;
