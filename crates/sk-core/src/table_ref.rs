//! Three-level `catalog.schema.table` references.

use crate::error::{CoreError, CoreResult};
use crate::names::{CatalogName, SchemaName, TableName};
use crate::sql_guard::validate_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fully qualified table reference.
///
/// Unlike the opaque strings accepted by the introspection queries, every
/// segment here is a safe identifier, so a `TableRef` can key caches and
/// name files on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableRef {
    pub catalog: CatalogName,
    pub schema: SchemaName,
    pub table: TableName,
}

impl TableRef {
    /// Parse `catalog.schema.table`.
    pub fn parse(reference: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidTableRef {
            reference: reference.to_string(),
        };

        let parts: Vec<&str> = reference.split('.').collect();
        let [catalog, schema, table] = parts.as_slice() else {
            return Err(invalid());
        };
        for part in [catalog, schema, table] {
            validate_identifier(part).map_err(|_| invalid())?;
        }

        Ok(Self {
            catalog: CatalogName::try_new(*catalog).ok_or_else(invalid)?,
            schema: SchemaName::try_new(*schema).ok_or_else(invalid)?,
            table: TableName::try_new(*table).ok_or_else(invalid)?,
        })
    }

    /// Build a reference from separate parts, validating each one.
    pub fn from_parts(catalog: &str, schema: &str, table: &str) -> CoreResult<Self> {
        Self::parse(&format!("{catalog}.{schema}.{table}"))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

impl FromStr for TableRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_levels() {
        let r = TableRef::parse("mydb.public.users").unwrap();
        assert_eq!(r.catalog, "mydb");
        assert_eq!(r.schema, "public");
        assert_eq!(r.table, "users");
        assert_eq!(r.to_string(), "mydb.public.users");
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        for bad in ["users", "public.users", "a.b.c.d", "", "a..c"] {
            let err = TableRef::parse(bad).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidTableRef { .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_unsafe_segments() {
        assert!(TableRef::parse("mydb.public.us'ers").is_err());
        assert!(TableRef::parse("mydb.public.../etc").is_err());
        assert!(TableRef::parse("mydb.pub lic.users").is_err());
    }

    #[test]
    fn test_from_parts_and_from_str() {
        let a = TableRef::from_parts("c", "s", "t").unwrap();
        let b: TableRef = "c.s.t".parse().unwrap();
        assert_eq!(a, b);
    }
}
