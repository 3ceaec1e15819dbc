//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::result::ResultSet;
use crate::traits::Database;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta};
use duckdb::types::Value;
use duckdb::Connection;
use sk_core::SqlValue;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    catalog: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Self::with_connection(conn)
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn with_connection(conn: Connection) -> DbResult<Self> {
        let catalog: String = conn
            .query_row("SELECT current_database()", [], |row| row.get(0))
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        log::debug!("Opened DuckDB catalog '{}'", catalog);
        Ok(Self {
            conn: Mutex::new(conn),
            catalog,
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Run a parameterized query synchronously and collect every row.
    ///
    /// DuckDB 1.4 panics on `stmt.column_count()` before execution, so rows
    /// are collected via `query_map` first and column names read afterwards.
    fn query_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<ResultSet> {
        let values = params
            .iter()
            .enumerate()
            .map(|(i, v)| to_duckdb_value(i, v))
            .collect::<DbResult<Vec<_>>>()?;

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;

        let rows: Vec<Vec<SqlValue>> = stmt
            .query_map(duckdb::params_from_iter(values), |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get::<_, Value>(i).map(from_duckdb_value))
                    .collect::<duckdb::Result<Vec<SqlValue>>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let column_count = stmt.column_count();
        let columns: Vec<String> = (0..column_count)
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(ResultSet::new(columns, rows))
    }
}

fn to_duckdb_value(index: usize, value: &SqlValue) -> DbResult<Value> {
    Ok(match value {
        SqlValue::Null => Value::Null,
        SqlValue::Bool(b) => Value::Boolean(*b),
        SqlValue::Int(n) => Value::BigInt(*n),
        SqlValue::Float(x) => Value::Double(*x),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::List(_) => {
            return Err(DbError::ParameterError(format!(
                "parameter {} is a list; lists cannot be bound to a placeholder",
                index + 1
            )))
        }
    })
}

fn from_duckdb_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(b),
        Value::TinyInt(n) => SqlValue::Int(n.into()),
        Value::SmallInt(n) => SqlValue::Int(n.into()),
        Value::Int(n) => SqlValue::Int(n.into()),
        Value::BigInt(n) => SqlValue::Int(n),
        Value::UTinyInt(n) => SqlValue::Int(n.into()),
        Value::USmallInt(n) => SqlValue::Int(n.into()),
        Value::UInt(n) => SqlValue::Int(n.into()),
        Value::UBigInt(n) => {
            i64::try_from(n).map_or_else(|_| SqlValue::Text(n.to_string()), SqlValue::Int)
        }
        Value::HugeInt(n) => {
            i64::try_from(n).map_or_else(|_| SqlValue::Text(n.to_string()), SqlValue::Int)
        }
        Value::Float(x) => SqlValue::Float(x.into()),
        Value::Double(x) => SqlValue::Float(x),
        Value::Text(s) | Value::Enum(s) => SqlValue::Text(s),
        Value::Decimal(d) => SqlValue::Text(d.to_string()),
        Value::Date32(days) => render_date(days),
        Value::Timestamp(unit, n) => render_timestamp(unit.to_micros(n)),
        Value::Time64(unit, n) => render_time(unit.to_micros(n)),
        Value::Blob(bytes) => SqlValue::Text(render_blob(&bytes)),
        Value::List(items) | Value::Array(items) => {
            SqlValue::List(items.into_iter().map(from_duckdb_value).collect())
        }
        other => SqlValue::Text(format!("{other:?}")),
    }
}

/// Days since 1970-01-01 as `YYYY-MM-DD`.
fn render_date(days: i32) -> SqlValue {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(TimeDelta::days(days.into())))
        .map_or(SqlValue::Int(days.into()), |date| {
            SqlValue::Text(date.format("%Y-%m-%d").to_string())
        })
}

/// Microseconds since the epoch as `YYYY-MM-DD HH:MM:SS[.ffffff]`.
fn render_timestamp(micros: i64) -> SqlValue {
    DateTime::from_timestamp_micros(micros).map_or(SqlValue::Int(micros), |ts| {
        SqlValue::Text(ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string())
    })
}

/// Microseconds since midnight as `HH:MM:SS[.ffffff]`.
fn render_time(micros: i64) -> SqlValue {
    let secs = micros.div_euclid(1_000_000);
    let nanos = micros.rem_euclid(1_000_000) * 1_000;
    u32::try_from(secs)
        .ok()
        .zip(u32::try_from(nanos).ok())
        .and_then(|(s, n)| NaiveTime::from_num_seconds_from_midnight_opt(s, n))
        .map_or(SqlValue::Int(micros), |t| {
            SqlValue::Text(t.format("%H:%M:%S%.f").to_string())
        })
}

/// Blob bytes in DuckDB's `\xNN` escape form.
fn render_blob(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("\\x{b:02X}")).collect()
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<ResultSet> {
        self.query_sync(sql, params)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    fn catalog_name(&self) -> &str {
        &self.catalog
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
