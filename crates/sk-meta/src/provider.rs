//! Cached access to table schemas.

use crate::cache::SchemaCache;
use crate::error::{MetaError, MetaResult};
use crate::introspect::SchemaIntrospector;
use crate::models::{ColumnSchema, TableSchema};
use chrono::Utc;
use sk_core::TableRef;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Columns selected for a table, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    pub table_ref: String,
    pub columns: Vec<ColumnSchema>,
}

impl ResolvedSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }
}

/// Whether `requested` asks for every column: absent, or exactly `["*"]`.
pub fn is_wildcard<S: AsRef<str>>(requested: Option<&[S]>) -> bool {
    match requested {
        None => true,
        Some([only]) => only.as_ref() == "*",
        Some(_) => false,
    }
}

/// Fetches table schemas once and serves them from a [`SchemaCache`].
pub struct SchemaProvider {
    introspector: SchemaIntrospector,
    cache: SchemaCache,
    inflight: Mutex<HashMap<TableRef, Arc<tokio::sync::Mutex<()>>>>,
}

impl SchemaProvider {
    pub fn new(introspector: SchemaIntrospector, cache: SchemaCache) -> Self {
        log::info!(
            "SchemaProvider initialized with cache_dir={}",
            cache.dir().display()
        );
        Self {
            introspector,
            cache,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Schema of `table_ref`, from cache or freshly fetched.
    ///
    /// Concurrent callers for the same table share a single fetch.
    pub async fn get_table_schema(&self, table_ref: &TableRef) -> MetaResult<TableSchema> {
        if let Some(schema) = self.cache.get(table_ref) {
            return Ok(schema);
        }

        let lock = self.inflight_lock(table_ref);
        let result = {
            let _guard = lock.lock().await;
            match self.cache.get(table_ref) {
                Some(schema) => Ok(schema),
                None => self.fetch_schema(table_ref).await,
            }
        };
        self.release_inflight(table_ref, lock);
        result
    }

    /// Keep the columns of `columns` that exist in the table.
    ///
    /// Matching is case-insensitive; the table's spelling is returned.
    /// Unknown names are dropped.
    pub async fn validate_columns<S: AsRef<str>>(
        &self,
        table_ref: &TableRef,
        columns: &[S],
    ) -> MetaResult<Vec<String>> {
        let schema = self.get_table_schema(table_ref).await?;
        let mut valid = Vec::with_capacity(columns.len());
        for requested in columns {
            let requested = requested.as_ref();
            match schema.column(requested) {
                Some(col) => valid.push(col.column_name.clone()),
                None => log::debug!("Dropping unknown column {:?} for {}", requested, table_ref),
            }
        }
        Ok(valid)
    }

    /// Resolve a column request against the table schema.
    ///
    /// A wildcard yields every column. Otherwise the request is validated
    /// like [`validate_columns`](Self::validate_columns) and the surviving
    /// columns are returned in table order.
    pub async fn resolve_columns<S: AsRef<str>>(
        &self,
        table_ref: &TableRef,
        requested: Option<&[S]>,
    ) -> MetaResult<ResolvedSchema> {
        let schema = self.get_table_schema(table_ref).await?;

        let columns = match requested {
            Some(list) if !is_wildcard(Some(list)) => {
                let wanted: HashSet<String> = self
                    .validate_columns(table_ref, list)
                    .await?
                    .into_iter()
                    .collect();
                schema
                    .columns
                    .iter()
                    .filter(|c| wanted.contains(&c.column_name))
                    .cloned()
                    .collect()
            }
            _ => schema.columns.clone(),
        };

        log::debug!(
            "Schema resolved: table={} columns={}",
            table_ref,
            columns.len()
        );
        Ok(ResolvedSchema {
            table_ref: schema.table_ref(),
            columns,
        })
    }

    /// Drop the cached schema for `table_ref` (memory and file).
    pub fn invalidate_table_schema(&self, table_ref: &TableRef) -> MetaResult<()> {
        self.cache.invalidate(table_ref)?;
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(table_ref);
        Ok(())
    }

    fn inflight_lock(&self, table_ref: &TableRef) -> Arc<tokio::sync::Mutex<()>> {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(table_ref.clone())
            .or_default()
            .clone()
    }

    /// Forget the in-flight lock once no other caller holds it.
    ///
    /// Every handle is dropped while the map is locked, so the last caller
    /// out always sees only the map's copy besides its own.
    fn release_inflight(&self, table_ref: &TableRef, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = inflight
            .get(table_ref)
            .is_some_and(|entry| Arc::ptr_eq(entry, &lock) && Arc::strong_count(&lock) == 2);
        drop(lock);
        if idle {
            inflight.remove(table_ref);
        }
    }

    async fn fetch_schema(&self, table_ref: &TableRef) -> MetaResult<TableSchema> {
        match self.load_schema(table_ref).await {
            Ok(table_schema) => {
                self.cache.set(table_ref, &table_schema);
                Ok(table_schema)
            }
            Err(e) => {
                log::error!("Failed to fetch schema for {}: {}", table_ref, e);
                Err(e)
            }
        }
    }

    async fn load_schema(&self, table_ref: &TableRef) -> MetaResult<TableSchema> {
        let (catalog, schema, table) = (
            table_ref.catalog.as_str(),
            table_ref.schema.as_str(),
            table_ref.table.as_str(),
        );

        let columns = self
            .introspector
            .table_columns(catalog, schema, table)
            .await?;
        if columns.is_empty() {
            return Err(MetaError::TableNotFound {
                table_ref: table_ref.to_string(),
            });
        }
        let keys: HashSet<String> = self
            .introspector
            .primary_keys(catalog, schema, table)
            .await?
            .into_iter()
            .collect();

        Ok(TableSchema {
            catalog: catalog.to_string(),
            schema: schema.to_string(),
            table: table.to_string(),
            fetched_at: Utc::now(),
            columns: columns
                .into_iter()
                .map(|c| {
                    let is_pk = keys.contains(&c.column_name);
                    ColumnSchema::from_descriptor(c, is_pk)
                })
                .collect(),
        })
    }
}
