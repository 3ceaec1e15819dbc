//! Runs the three information-schema statements and decodes their rows.

use crate::error::{MetaError, MetaResult};
use crate::models::{ColumnDescriptor, TableDescriptor};
use sk_core::query::{LIST_TABLES, PRIMARY_KEYS, TABLE_COLUMNS};
use sk_core::{Params, QueryLoader, SqlValue};
use sk_db::{Database, ResultSet, Row, WarmupGate};
use std::sync::Arc;

/// Schema introspection over a [`Database`].
///
/// Catalog, schema and table names are opaque strings: they are always bound
/// as parameters, so any value (including one containing quotes) is safe and
/// simply matches nothing if no such object exists.
#[derive(Clone)]
pub struct SchemaIntrospector {
    db: Arc<dyn Database>,
    queries: Arc<QueryLoader>,
    warmup: Option<Arc<WarmupGate>>,
}

impl SchemaIntrospector {
    pub fn new(db: Arc<dyn Database>, queries: Arc<QueryLoader>) -> Self {
        Self {
            db,
            queries,
            warmup: None,
        }
    }

    /// Warm the connection through `gate` before each statement.
    pub fn with_warmup(mut self, gate: Arc<WarmupGate>) -> Self {
        self.warmup = Some(gate);
        self
    }

    /// Tables and views of `schema`, ordered by name.
    pub async fn list_tables(&self, catalog: &str, schema: &str) -> MetaResult<Vec<TableDescriptor>> {
        let params = params(&[("catalog", catalog), ("schema_name", schema)]);
        let rs = self
            .run(LIST_TABLES, &params, format!("{catalog}.{schema}"))
            .await?;

        rs.rows()
            .map(|row| {
                Ok(TableDescriptor {
                    table_name: text(&row, LIST_TABLES, "table_name")?,
                    table_type: text(&row, LIST_TABLES, "table_type")?,
                })
            })
            .collect()
    }

    /// Primary key column names of `table`, in key order. Empty if the table
    /// has no primary key or does not exist.
    pub async fn primary_keys(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> MetaResult<Vec<String>> {
        let params = table_params(catalog, schema, table);
        let rs = self
            .run(PRIMARY_KEYS, &params, format!("{catalog}.{schema}.{table}"))
            .await?;

        rs.rows()
            .map(|row| text(&row, PRIMARY_KEYS, "column_name"))
            .collect()
    }

    /// Column definitions of `table`, ordered by position.
    pub async fn table_columns(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> MetaResult<Vec<ColumnDescriptor>> {
        let params = table_params(catalog, schema, table);
        let rs = self
            .run(TABLE_COLUMNS, &params, format!("{catalog}.{schema}.{table}"))
            .await?;

        rs.rows()
            .map(|row| {
                let is_nullable = row.bool("is_nullable").ok_or_else(|| MetaError::Decode {
                    query: TABLE_COLUMNS.to_string(),
                    message: "is_nullable is not a boolean".to_string(),
                })?;
                let ordinal_position =
                    row.int("ordinal_position").ok_or_else(|| MetaError::Decode {
                        query: TABLE_COLUMNS.to_string(),
                        message: "ordinal_position is not an integer".to_string(),
                    })?;
                Ok(ColumnDescriptor {
                    column_name: text(&row, TABLE_COLUMNS, "column_name")?,
                    data_type: text(&row, TABLE_COLUMNS, "data_type")?,
                    is_nullable,
                    ordinal_position,
                })
            })
            .collect()
    }

    async fn run(&self, key: &str, params: &Params, target: String) -> MetaResult<ResultSet> {
        if let Some(gate) = &self.warmup {
            gate.ensure_warm().await;
        }

        let prepared = self.queries.get(key)?.prepare(params)?;
        log::debug!("Running {} for {}", key, target);

        self.db
            .query(&prepared.sql, &prepared.values)
            .await
            .map_err(|source| MetaError::QueryFailed {
                query: key.to_string(),
                target,
                source,
            })
    }
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), SqlValue::from(*value)))
        .collect()
}

fn table_params(catalog: &str, schema: &str, table: &str) -> Params {
    params(&[
        ("catalog", catalog),
        ("schema_name", schema),
        ("table_name", table),
    ])
}

fn text(row: &Row<'_>, query: &str, column: &str) -> MetaResult<String> {
    row.text(column)
        .map(str::to_string)
        .ok_or_else(|| MetaError::Decode {
            query: query.to_string(),
            message: format!("column '{column}' is missing or not text"),
        })
}
