use super::*;
use std::io::Write;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.database.path, ":memory:");
    assert!(config.database.catalog.is_none());
    assert_eq!(config.get_schema(None), "main");
    assert_eq!(config.cache.dir, ".schemakit/cache");
    assert_eq!(config.cache.ttl_seconds, 3600);
    assert!(config.warmup.enabled);
    assert_eq!(config.warmup.ttl_seconds, 600);
    assert_eq!(config.warmup.failure_backoff_seconds, 30);
    assert_eq!(config.warmup.sql, "SELECT 1");
    assert!(config.queries_dir.is_none());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database:
  type: duckdb
  path: "./warehouse.duckdb"
schema: analytics
cache:
  dir: tmp/cache
  ttl_seconds: 60
queries_dir: sql
warmup:
  enabled: false
targets:
  prod:
    database:
      path: "/data/prod.duckdb"
      catalog: prod_catalog
    schema: reporting
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert!(config.database.catalog.is_none());
    assert_eq!(config.get_schema(None), "analytics");
    assert_eq!(config.get_schema(Some("prod")), "reporting");
    assert_eq!(config.cache.ttl_seconds, 60);
    assert!(!config.warmup.enabled);

    let root = Path::new("/tmp/project");
    assert_eq!(
        config.cache_dir_absolute(root),
        PathBuf::from("/tmp/project/tmp/cache")
    );
    assert_eq!(
        config.queries_dir_absolute(root),
        Some(PathBuf::from("/tmp/project/sql"))
    );

    let prod = config.get_database_config(Some("prod")).unwrap();
    assert_eq!(prod.path, "/data/prod.duckdb");
    assert_eq!(prod.catalog.as_deref(), Some("prod_catalog"));
}

#[test]
fn test_unknown_target_lists_available() {
    let yaml = r#"
targets:
  dev: {}
  prod: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.get_database_config(Some("staging")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("[E002]"));
    assert!(msg.contains("dev, prod"));
}

#[test]
fn test_target_without_database_falls_back_to_base() {
    let yaml = r#"
database:
  path: base.duckdb
targets:
  dev:
    schema: scratch
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let db = config.get_database_config(Some("dev")).unwrap();
    assert_eq!(db.path, "base.duckdb");
    assert_eq!(config.get_schema(Some("dev")), "scratch");
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("databse:\n  path: x.duckdb\n");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir_without_file_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_load_from_dir_reads_yaml_variant() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("schemakit.yaml")).unwrap();
    writeln!(file, "schema: staging").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.get_schema(None), "staging");
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_rejects_empty_warmup_sql() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemakit.yml");
    std::fs::write(&path, "warmup:\n  sql: \"  \"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}
