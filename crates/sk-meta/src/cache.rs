//! Hybrid memory + JSON file cache for table schemas.
//!
//! Files live at `<dir>/<catalog>/<schema>.<table>.json` and survive
//! restarts. Memory entries sit in front of them. Both honour the same TTL,
//! measured from the time the schema was cached.

use crate::error::{MetaError, MetaResult};
use crate::models::TableSchema;
use chrono::{DateTime, Utc};
use sk_core::TableRef;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default schema TTL in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

#[derive(Debug, Clone)]
struct CacheEntry {
    schema: TableSchema,
    cached_at: DateTime<Utc>,
}

/// Schema cache keyed by [`TableRef`].
#[derive(Debug)]
pub struct SchemaCache {
    dir: PathBuf,
    ttl_seconds: u64,
    memory: Mutex<HashMap<TableRef, CacheEntry>>,
}

impl SchemaCache {
    pub fn new(dir: impl Into<PathBuf>, ttl_seconds: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl_seconds,
            memory: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<catalog>/<schema>.<table>.json`
    pub fn file_path(&self, table_ref: &TableRef) -> PathBuf {
        self.dir
            .join(table_ref.catalog.as_str())
            .join(format!("{}.{}.json", table_ref.schema, table_ref.table))
    }

    /// Fresh schema from memory, else from file; `None` on miss or expiry.
    pub fn get(&self, table_ref: &TableRef) -> Option<TableSchema> {
        let now = Utc::now();
        if let Some(entry) = self.lock().get(table_ref) {
            if self.is_fresh(entry.cached_at, now) {
                log::debug!("Schema cache hit (memory): {}", table_ref);
                return Some(entry.schema.clone());
            }
        }

        if let Some(schema) = self.load_from_file(table_ref) {
            if self.is_fresh(schema.fetched_at, now) {
                self.lock().insert(
                    table_ref.clone(),
                    CacheEntry {
                        cached_at: schema.fetched_at,
                        schema: schema.clone(),
                    },
                );
                log::debug!("Schema cache hit (file): {}", table_ref);
                return Some(schema);
            }
            log::debug!("Schema cache expired: {}", table_ref);
        }

        log::debug!("Schema cache miss: {}", table_ref);
        None
    }

    /// Store `schema` in memory and on disk. Disk failures are logged only.
    pub fn set(&self, table_ref: &TableRef, schema: &TableSchema) {
        self.lock().insert(
            table_ref.clone(),
            CacheEntry {
                schema: schema.clone(),
                cached_at: Utc::now(),
            },
        );
        let path = self.file_path(table_ref);
        if let Err(e) = write_atomic(&path, schema) {
            log::warn!("Failed to save schema to file {}: {}", path.display(), e);
        }
        log::debug!("Schema cached: {}", table_ref);
    }

    /// Drop one schema from memory and disk.
    pub fn invalidate(&self, table_ref: &TableRef) -> MetaResult<()> {
        self.lock().remove(table_ref);
        remove_file_if_exists(&self.file_path(table_ref))?;
        log::debug!("Schema cache invalidated: {}", table_ref);
        Ok(())
    }

    /// Drop every schema. Returns the number of files removed.
    pub fn invalidate_all(&self) -> MetaResult<usize> {
        self.lock().clear();
        let mut files = Vec::new();
        collect_json_files(&self.dir, &mut files)?;
        for path in &files {
            remove_file_if_exists(path)?;
        }
        log::debug!("Schema cache cleared: {} files", files.len());
        Ok(files.len())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TableRef, CacheEntry>> {
        self.memory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        (now - since).num_seconds() <= ttl
    }

    fn load_from_file(&self, table_ref: &TableRef) -> Option<TableSchema> {
        let path = self.file_path(table_ref);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to load schema from file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(schema) => Some(schema),
            Err(e) => {
                log::warn!("Failed to load schema from file {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn write_atomic(path: &Path, schema: &TableSchema) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(schema)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

fn remove_file_if_exists(path: &Path) -> MetaResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MetaError::CacheIo {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> MetaResult<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(MetaError::CacheIo {
                path: dir.display().to_string(),
                source: e,
            })
        }
    };
    for entry in entries {
        let path = entry
            .map_err(|e| MetaError::CacheIo {
                path: dir.display().to_string(),
                source: e,
            })?
            .path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
