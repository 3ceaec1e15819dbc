//! Loads query definitions from a manifest and SQL files.

use crate::error::{CoreError, CoreResult};
use crate::query::definition::QueryDefinition;
use crate::query::manifest::{Manifest, ManifestEntry, MANIFEST_FILE};
use crate::query::named::NamedSql;
use crate::sql_guard::{ensure_single_statement, validate_readonly_prefix, validate_sql};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const BUILTIN_MANIFEST: &str = include_str!("../../queries/manifest.json");

const BUILTIN_FILES: [(&str, &str); 3] = [
    (
        "schema/list_tables.sql",
        include_str!("../../queries/schema/list_tables.sql"),
    ),
    (
        "schema/primary_keys.sql",
        include_str!("../../queries/schema/primary_keys.sql"),
    ),
    (
        "schema/table_columns.sql",
        include_str!("../../queries/schema/table_columns.sql"),
    ),
];

#[derive(Debug, Clone)]
enum Source {
    Builtin,
    Dir(PathBuf),
}

/// Registry of validated query definitions.
///
/// Every entry is read, guarded and compiled when the loader is built, so a
/// broken manifest fails fast instead of on first use.
#[derive(Debug, Clone)]
pub struct QueryLoader {
    source: Source,
    definitions: BTreeMap<String, QueryDefinition>,
}

impl QueryLoader {
    /// Loader over the queries embedded in the binary.
    pub fn builtin() -> CoreResult<Self> {
        Self::load(Source::Builtin)
    }

    /// Loader over `<dir>/manifest.json` and the SQL files it names.
    pub fn from_dir(dir: &Path) -> CoreResult<Self> {
        Self::load(Source::Dir(dir.to_path_buf()))
    }

    fn load(source: Source) -> CoreResult<Self> {
        let definitions = read_definitions(&source)?;
        log::info!(
            "Loaded {} manifest entries from {}",
            definitions.len(),
            source_label(&source)
        );
        Ok(Self {
            source,
            definitions,
        })
    }

    /// Look up a query by key.
    pub fn get(&self, key: &str) -> CoreResult<&QueryDefinition> {
        self.definitions
            .get(key)
            .ok_or_else(|| CoreError::UnknownQuery {
                key: key.to_string(),
            })
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// All definitions, sorted by key.
    pub fn definitions(&self) -> impl Iterator<Item = &QueryDefinition> {
        self.definitions.values()
    }

    /// Keys of queries carrying `tag`, sorted.
    pub fn list_by_tag(&self, tag: &str) -> Vec<&str> {
        self.definitions
            .values()
            .filter(|d| d.tags.iter().any(|t| t == tag))
            .map(|d| d.key.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Re-read the manifest and SQL files.
    ///
    /// On failure the previously loaded definitions are kept.
    pub fn reload(&mut self) -> CoreResult<()> {
        let definitions = read_definitions(&self.source)?;
        log::info!(
            "Reloaded {} manifest entries from {}",
            definitions.len(),
            source_label(&self.source)
        );
        self.definitions = definitions;
        Ok(())
    }
}

fn source_label(source: &Source) -> String {
    match source {
        Source::Builtin => "builtin queries".to_string(),
        Source::Dir(dir) => dir.display().to_string(),
    }
}

fn read_definitions(source: &Source) -> CoreResult<BTreeMap<String, QueryDefinition>> {
    let manifest_text = match source {
        Source::Builtin => BUILTIN_MANIFEST.to_string(),
        Source::Dir(dir) => {
            let path = dir.join(MANIFEST_FILE);
            if !path.exists() {
                return Err(CoreError::ManifestInvalid {
                    message: format!("manifest not found: {}", path.display()),
                });
            }
            std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?
        }
    };

    let manifest = Manifest::parse(&manifest_text)?;
    let mut definitions = BTreeMap::new();
    for (key, entry) in manifest.queries {
        let sql = read_sql(source, &key, &entry.file)?;
        let definition = build_definition(key.clone(), sql, entry)?;
        log::debug!(
            "Loaded query '{}' ({} placeholders)",
            key,
            definition.named.slot_count()
        );
        definitions.insert(key, definition);
    }
    Ok(definitions)
}

fn read_sql(source: &Source, key: &str, file: &str) -> CoreResult<String> {
    let not_found = |path: String| CoreError::QueryFileNotFound {
        key: key.to_string(),
        path,
    };

    match source {
        Source::Builtin => BUILTIN_FILES
            .iter()
            .find(|(name, _)| *name == file)
            .map(|(_, sql)| sql.trim().to_string())
            .ok_or_else(|| not_found(file.to_string())),
        Source::Dir(dir) => {
            let path = dir.join(file);
            if !path.is_file() {
                return Err(not_found(path.display().to_string()));
            }
            let sql = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
            Ok(sql.trim().to_string())
        }
    }
}

fn build_definition(key: String, sql: String, entry: ManifestEntry) -> CoreResult<QueryDefinition> {
    validate_sql(&sql)?;
    validate_readonly_prefix(&sql)?;
    let named = NamedSql::parse(&sql)?;
    ensure_single_statement(named.sql())?;

    let parameters = entry.parameters.unwrap_or_default();
    for name in named.placeholder_names() {
        if !parameters.is_empty() && !parameters.iter().any(|p| p.name == name) {
            return Err(CoreError::ManifestInvalid {
                message: format!("query '{key}' uses undeclared placeholder ':{name}'"),
            });
        }
    }

    Ok(QueryDefinition {
        key,
        sql,
        named,
        description: entry.description,
        parameters,
        cache_ttl: entry.cache_ttl.unwrap_or(0),
        tags: entry.tags.unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
