//! Error types for sk-core

use thiserror::Error;

/// Core error type for SchemaKit
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: IO error with file path context
    #[error("[E003] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E004: YAML parse error
    #[error("[E004] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Q001: Query key not present in the manifest
    #[error("[Q001] Unknown query: {key}")]
    UnknownQuery { key: String },

    /// Q002: Manifest is structurally invalid
    #[error("[Q002] Invalid query manifest: {message}")]
    ManifestInvalid { message: String },

    /// Q003: Manifest references a SQL file that does not exist
    #[error("[Q003] SQL file for query '{key}' not found: {path}")]
    QueryFileNotFound { key: String, path: String },

    /// Q004: A placeholder has no bound value
    #[error("[Q004] Missing value for parameter '{name}'")]
    MissingParameter { name: String },

    /// Q005: Supplied parameters failed validation against the definition
    #[error("[Q005] Invalid parameters for query '{key}': {}", .errors.join("; "))]
    InvalidParameters { key: String, errors: Vec<String> },

    /// Q006: A value cannot be bound to a single placeholder
    #[error("[Q006] Parameter '{name}' cannot be bound: {reason}")]
    UnbindableParameter { name: String, reason: String },

    /// Q007: Query text uses positional `?` placeholders
    #[error("[Q007] Positional placeholder '?' at byte {offset}; use :name placeholders")]
    PositionalPlaceholder { offset: usize },

    /// S001: SQL matched a dangerous pattern
    #[error("[S001] Unsafe SQL rejected: {reason}")]
    UnsafeSql { reason: String },

    /// S002: SQL is not a read-only statement
    #[error("[S002] Non-read-only SQL in read-only context: {preview}")]
    NotReadOnly { preview: String },

    /// S003: Identifier does not match the safe identifier pattern
    #[error("[S003] Invalid identifier: '{name}'")]
    InvalidIdentifier { name: String },

    /// S004: Table reference is not catalog.schema.table
    #[error("[S004] Invalid table reference '{reference}': must be catalog.schema.table")]
    InvalidTableRef { reference: String },

    /// S005: SQL could not be parsed
    #[error("[S005] SQL parse error: {message}")]
    SqlParse { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
