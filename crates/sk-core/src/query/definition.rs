//! Query definitions: SQL plus declared, typed parameters.

use crate::error::{CoreError, CoreResult};
use crate::query::named::NamedSql;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter values keyed by name.
pub type Params = BTreeMap<String, SqlValue>;

/// Declared type of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Date,
    Bool,
    List,
    TableRef,
}

impl ParamType {
    /// Whether `value` has the right shape for this type.
    ///
    /// Integers are accepted where floats are expected. Dates and table
    /// references travel as strings.
    pub fn accepts(&self, value: &SqlValue) -> bool {
        match (self, value) {
            (ParamType::String | ParamType::Date | ParamType::TableRef, SqlValue::Text(_)) => true,
            (ParamType::Integer, SqlValue::Int(_)) => true,
            (ParamType::Float, SqlValue::Float(_) | SqlValue::Int(_)) => true,
            (ParamType::Bool, SqlValue::Bool(_)) => true,
            (ParamType::List, SqlValue::List(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Date => "date",
            ParamType::Bool => "bool",
            ParamType::List => "list",
            ParamType::TableRef => "table_ref",
        };
        f.write_str(name)
    }
}

/// A parameter declared in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryParameter {
    pub name: String,

    #[serde(default = "default_param_type")]
    pub param_type: ParamType,

    #[serde(default = "default_required")]
    pub required: bool,

    #[serde(default)]
    pub default: Option<SqlValue>,

    #[serde(default)]
    pub description: String,
}

fn default_param_type() -> ParamType {
    ParamType::String
}

fn default_required() -> bool {
    true
}

impl QueryParameter {
    /// Null is valid only for optional parameters.
    pub fn validate(&self, value: &SqlValue) -> bool {
        if value.is_null() {
            return !self.required;
        }
        self.param_type.accepts(value)
    }
}

/// A loaded, validated query.
#[derive(Debug, Clone)]
pub struct QueryDefinition {
    pub key: String,
    /// SQL as written in the query file.
    pub sql: String,
    pub named: NamedSql,
    pub description: String,
    pub parameters: Vec<QueryParameter>,
    /// Seconds a caller may cache results for; `0` means do not cache.
    pub cache_ttl: u64,
    pub tags: Vec<String>,
}

/// A query ready to execute: positional SQL and its values.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    pub key: String,
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl QueryDefinition {
    /// Fill in declared defaults for parameters the caller omitted.
    pub fn apply_defaults(&self, provided: &Params) -> Params {
        let mut merged = provided.clone();
        for param in &self.parameters {
            if let Some(default) = &param.default {
                merged
                    .entry(param.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        merged
    }

    /// Check `provided` against the declared parameters.
    ///
    /// Returns one message per problem; empty means valid. A query that
    /// declares no parameters accepts anything.
    pub fn validate_params(&self, provided: &Params) -> Vec<String> {
        if self.parameters.is_empty() {
            return Vec::new();
        }

        let mut errors = Vec::new();
        for param in &self.parameters {
            match provided.get(&param.name) {
                None if param.required && param.default.is_none() => {
                    errors.push(format!("Missing required parameter: {}", param.name));
                }
                None => {}
                Some(value) if !param.validate(value) => {
                    errors.push(format!(
                        "Invalid type for '{}': expected {}",
                        param.name, param.param_type
                    ));
                }
                Some(_) => {}
            }
        }

        for name in provided.keys() {
            if !self.parameters.iter().any(|p| &p.name == name) {
                errors.push(format!("Unknown parameter: {name}"));
            }
        }
        errors
    }

    /// Names of parameters declared as `table_ref`.
    pub fn table_ref_params(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.param_type == ParamType::TableRef)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Apply defaults, validate, and bind `provided` for execution.
    pub fn prepare(&self, provided: &Params) -> CoreResult<PreparedQuery> {
        let params = self.apply_defaults(provided);
        let errors = self.validate_params(&params);
        if !errors.is_empty() {
            return Err(CoreError::InvalidParameters {
                key: self.key.clone(),
                errors,
            });
        }

        Ok(PreparedQuery {
            key: self.key.clone(),
            sql: self.named.sql().to_string(),
            values: self.named.bind(&params)?,
        })
    }
}

#[cfg(test)]
#[path = "definition_test.rs"]
mod tests;
