//! Schema models returned by introspection and stored in the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of `schema.list_tables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub table_name: String,
    /// `BASE TABLE`, `VIEW`, `LOCAL TEMPORARY`, ...
    pub table_type: String,
}

impl TableDescriptor {
    pub fn is_view(&self) -> bool {
        self.table_type.eq_ignore_ascii_case("VIEW")
    }
}

/// A row of `schema.table_columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub column_name: String,
    /// Full type description, e.g. `DECIMAL(10,2)`
    pub data_type: String,
    pub is_nullable: bool,
    /// 1-based
    pub ordinal_position: i64,
}

/// Column of a cached [`TableSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column_name: String,
    pub data_type: String,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub ordinal_position: i64,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSchema {
    pub fn from_descriptor(column: ColumnDescriptor, is_primary_key: bool) -> Self {
        Self {
            column_name: column.column_name,
            data_type: column.data_type,
            is_nullable: column.is_nullable,
            is_primary_key,
            ordinal_position: column.ordinal_position,
        }
    }

    /// Type family name with parameters dropped.
    ///
    /// `DECIMAL(10,2)` becomes `DECIMAL`, any `VARCHAR`/`CHAR` becomes
    /// `STRING`, and nested `ARRAY`/`MAP`/`STRUCT` types collapse to their
    /// constructor. Everything else is uppercased as-is.
    pub fn normalized_type(&self) -> String {
        let upper = self.data_type.trim().to_uppercase();
        if upper.starts_with("DECIMAL") {
            return "DECIMAL".to_string();
        }
        if upper.starts_with("VARCHAR") || upper.starts_with("CHAR") {
            return "STRING".to_string();
        }
        for family in ["ARRAY", "MAP", "STRUCT"] {
            if upper.starts_with(family) {
                return family.to_string();
            }
        }
        upper
    }
}

/// Full schema of one table as fetched from the information schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// `catalog.schema.table`
    pub fn table_ref(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.schema, self.table)
    }

    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.column_name.as_str())
            .collect()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }

    /// Look up a column case-insensitively.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|c| c.column_name.eq_ignore_ascii_case(name))
    }
}
