//! Database trait definition

use crate::error::DbResult;
use crate::result::ResultSet;
use async_trait::async_trait;
use sk_core::SqlValue;

/// Database abstraction trait for SchemaKit
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a read query with positional (`?`) parameters bound to `params`
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<ResultSet>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Catalog that unqualified names resolve against
    fn catalog_name(&self) -> &str;
}
