//! sk-db - Database abstraction layer for SchemaKit
//!
//! This crate provides the `Database` trait, the DuckDB implementation,
//! the `ResultSet` returned by parameterized queries, and the warmup gate.

pub mod duckdb;
pub mod error;
pub mod result;
pub mod traits;
pub mod warmup;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use result::{ResultSet, Row};
pub use traits::Database;
pub use warmup::{WarmupGate, WarmupStatus};
