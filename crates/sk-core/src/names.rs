//! Strongly-typed names for the three levels of a table reference.
//!
//! Each wrapper only guarantees the name is non-empty. Whether a name is a
//! *safe identifier* is checked where it matters (see
//! [`TableRef::parse`](crate::table_ref::TableRef::parse)); the introspection
//! queries themselves accept any string because values are always bound.

/// Define a non-empty string newtype for one level of a table reference.
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).ok_or_else(|| {
                    serde::de::Error::custom(concat!(stringify!($Name), " must not be empty"))
                })
            }
        }

        impl $Name {
            /// Wrap `name`, returning `None` if it is empty.
            pub fn try_new(name: impl Into<String>) -> Option<Self> {
                let s = name.into();
                if s.is_empty() { None } else { Some(Self(s)) }
            }

            /// Return the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

define_name! {
    /// Top-level namespace grouping schemas (a DuckDB database name).
    pub struct CatalogName;
}

define_name! {
    /// Schema within a catalog.
    pub struct SchemaName;
}

define_name! {
    /// Table or view within a schema.
    pub struct TableName;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(CatalogName::try_new("").is_none());
        assert_eq!(CatalogName::try_new("main").unwrap(), "main");
    }

    #[test]
    fn test_deref_and_display() {
        let schema = SchemaName::try_new("public").unwrap();
        assert!(schema.starts_with("pub"));
        assert_eq!(schema.to_string(), "public");
    }

    #[test]
    fn test_serde_is_transparent() {
        let table = TableName::try_new("users").unwrap();
        assert_eq!(serde_json::to_string(&table).unwrap(), r#""users""#);
        let back: TableName = serde_json::from_str(r#""users""#).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<TableName, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TableName::try_new("orders").unwrap(), 3);
        assert_eq!(map.get("orders"), Some(&3));
    }
}
