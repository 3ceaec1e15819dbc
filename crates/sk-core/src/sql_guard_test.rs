use super::*;

#[test]
fn test_strip_line_and_block_comments() {
    let sql = "SELECT 1 -- trailing\n/* block\n spanning */ FROM t";
    let stripped = strip_sql_comments(sql);
    assert!(!stripped.contains("trailing"));
    assert!(!stripped.contains("spanning"));
    assert!(stripped.contains("SELECT 1"));
    assert!(stripped.contains("FROM t"));
}

#[test]
fn test_validate_sql_accepts_plain_select() {
    assert!(validate_sql("SELECT table_name FROM information_schema.tables").is_ok());
    assert!(validate_sql("").is_ok());
}

#[test]
fn test_validate_sql_rejects_stacked_drop() {
    let err = validate_sql("SELECT 1;   drop TABLE users").unwrap_err();
    assert!(matches!(err, CoreError::UnsafeSql { .. }));
}

#[test]
fn test_validate_sql_rejects_stacked_statement_across_newlines() {
    assert!(validate_sql("SELECT 1;\n\n  DELETE FROM users").is_err());
}

#[test]
fn test_validate_sql_rejects_exec_call() {
    assert!(validate_sql("SELECT * FROM t WHERE EXEC ('x')").is_err());
}

#[test]
fn test_validate_sql_ignores_keywords_in_comments() {
    assert!(validate_sql("SELECT 1 -- ; DROP TABLE x").is_ok());
}

#[test]
fn test_validate_sql_allows_columns_containing_xp() {
    assert!(validate_sql("SELECT exp_date FROM t").is_ok());
}

#[test]
fn test_readonly_prefix_accepts_known_keywords() {
    for sql in [
        "SELECT 1",
        "  with x AS (SELECT 1) SELECT * FROM x",
        "DESCRIBE t",
        "show tables",
        "-- comment first\nSELECT 1",
    ] {
        assert!(validate_readonly_prefix(sql).is_ok(), "{sql}");
    }
}

#[test]
fn test_readonly_prefix_rejects_mutation() {
    let err = validate_readonly_prefix("INSERT INTO t VALUES (1)").unwrap_err();
    assert!(matches!(err, CoreError::NotReadOnly { .. }));
}

#[test]
fn test_readonly_preview_is_truncated() {
    let long = format!("UPDATE t SET {}", "a = 1, ".repeat(20));
    let err = validate_readonly_prefix(&long).unwrap_err();
    match err {
        CoreError::NotReadOnly { preview } => {
            assert!(preview.ends_with("..."));
            assert_eq!(preview.chars().count(), 53);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_ensure_single_statement_accepts_parameterized_select() {
    let sql = "SELECT table_name FROM information_schema.tables WHERE table_schema = ? ORDER BY table_name";
    assert!(ensure_single_statement(sql).is_ok());
}

#[test]
fn test_ensure_single_statement_rejects_two_statements() {
    let err = ensure_single_statement("SELECT 1; SELECT 2").unwrap_err();
    assert!(matches!(err, CoreError::UnsafeSql { .. }));
}

#[test]
fn test_ensure_single_statement_rejects_non_query() {
    let err = ensure_single_statement("DELETE FROM t WHERE id = ?").unwrap_err();
    assert!(matches!(err, CoreError::NotReadOnly { .. }));
}

#[test]
fn test_ensure_single_statement_reports_parse_error() {
    let err = ensure_single_statement("SELECT * FROM (").unwrap_err();
    assert!(matches!(err, CoreError::SqlParse { .. }));
}

#[test]
fn test_validate_identifier() {
    assert!(validate_identifier("users").is_ok());
    assert!(validate_identifier("_private2").is_ok());
    assert!(validate_identifier("").is_err());
    assert!(validate_identifier("2fast").is_err());
    assert!(validate_identifier("bad-name").is_err());
    assert!(validate_identifier("o'brien").is_err());
}
