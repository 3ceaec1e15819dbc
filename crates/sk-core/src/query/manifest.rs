//! `manifest.json` format.

use crate::error::{CoreError, CoreResult};
use crate::query::definition::QueryParameter;
use crate::sql_guard::validate_identifier;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// File name of the manifest inside a queries directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Parsed manifest: query key to entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub queries: BTreeMap<String, ManifestEntry>,
}

/// One query as declared in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// SQL file path, relative to the manifest.
    pub file: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parameters: Option<Vec<QueryParameter>>,

    #[serde(default)]
    pub cache_ttl: Option<u64>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Manifest {
    /// Parse and validate manifest JSON.
    pub fn parse(json: &str) -> CoreResult<Self> {
        let manifest: Manifest =
            serde_json::from_str(json).map_err(|e| CoreError::ManifestInvalid {
                message: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> CoreResult<()> {
        for (key, entry) in &self.queries {
            validate_key(key)?;
            validate_file(key, &entry.file)?;

            let mut seen: Vec<&str> = Vec::new();
            for param in entry.parameters.iter().flatten() {
                let name = param.name.as_str();
                if validate_identifier(name).is_err() {
                    return Err(invalid(format!(
                        "query '{key}' has an invalid parameter name '{name}'"
                    )));
                }
                if seen.contains(&name) {
                    return Err(invalid(format!(
                        "query '{key}' declares parameter '{name}' twice"
                    )));
                }
                seen.push(name);
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> CoreError {
    CoreError::ManifestInvalid { message }
}

/// Keys are dot-separated identifiers, e.g. `schema.list_tables`.
fn validate_key(key: &str) -> CoreResult<()> {
    if key.split('.').all(|seg| validate_identifier(seg).is_ok()) {
        Ok(())
    } else {
        Err(invalid(format!("invalid query key '{key}'")))
    }
}

/// SQL files must stay inside the queries directory.
fn validate_file(key: &str, file: &str) -> CoreResult<()> {
    let path = Path::new(file);
    let escapes = file.trim().is_empty()
        || path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(invalid(format!(
            "query '{key}' has an invalid file path '{file}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_entry() {
        let m = Manifest::parse(r#"{"queries": {"a.b": {"file": "a/b.sql"}}}"#).unwrap();
        let entry = &m.queries["a.b"];
        assert_eq!(entry.file, "a/b.sql");
        assert!(entry.parameters.is_none());
        assert!(entry.cache_ttl.is_none());
    }

    #[test]
    fn test_missing_queries_object() {
        let err = Manifest::parse(r#"{"items": {}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ManifestInvalid { .. }));
    }

    #[test]
    fn test_rejects_bad_keys() {
        for key in ["a..b", "1abc", "a.b-c", ""] {
            let json = format!(r#"{{"queries": {{"{key}": {{"file": "x.sql"}}}}}}"#);
            assert!(Manifest::parse(&json).is_err(), "{key}");
        }
    }

    #[test]
    fn test_rejects_escaping_file_paths() {
        for file in ["../x.sql", "/etc/passwd", "a/../../x.sql", " "] {
            let json = format!(r#"{{"queries": {{"k": {{"file": "{file}"}}}}}}"#);
            assert!(Manifest::parse(&json).is_err(), "{file}");
        }
    }

    #[test]
    fn test_rejects_duplicate_and_invalid_parameter_names() {
        let dup = r#"{"queries": {"k": {"file": "k.sql", "parameters": [{"name": "a"}, {"name": "a"}]}}}"#;
        assert!(Manifest::parse(dup).is_err());
        let bad = r#"{"queries": {"k": {"file": "k.sql", "parameters": [{"name": "a b"}]}}}"#;
        assert!(Manifest::parse(bad).is_err());
    }

    #[test]
    fn test_rejects_negative_ttl_and_unknown_type() {
        let ttl = r#"{"queries": {"k": {"file": "k.sql", "cache_ttl": -1}}}"#;
        assert!(Manifest::parse(ttl).is_err());
        let ty = r#"{"queries": {"k": {"file": "k.sql", "parameters": [{"name": "a", "param_type": "blob"}]}}}"#;
        assert!(Manifest::parse(ty).is_err());
    }
}
