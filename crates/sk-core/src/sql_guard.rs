//! Read-only guards for externalized SQL.
//!
//! Every statement that enters the query loader passes through these checks:
//! a pattern scan for obvious injection payloads, a read-only prefix check,
//! and a full parse that must yield exactly one statement.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;
use std::sync::OnceLock;

/// Statement prefixes accepted in a read-only context.
pub const READONLY_PREFIXES: [&str; 4] = ["SELECT", "WITH", "DESCRIBE", "SHOW"];

/// Patterns rejected outright, matched case-insensitively after comment
/// stripping and whitespace normalization.
const DANGEROUS_PATTERNS: [&str; 3] = [
    r";\s*(DROP|DELETE|TRUNCATE|INSERT|UPDATE|MERGE|ALTER|CREATE)\b",
    r"\bxp_",
    r"EXEC\s*\(",
];

const PREVIEW_CHARS: usize = 50;

static BLOCK_COMMENT_RE: OnceLock<Regex> = OnceLock::new();
static LINE_COMMENT_RE: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static DANGEROUS_RE: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();

fn block_comment_regex() -> &'static Regex {
    BLOCK_COMMENT_RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

fn line_comment_regex() -> &'static Regex {
    LINE_COMMENT_RE.get_or_init(|| Regex::new(r"--[^\n\r]*").expect("valid regex"))
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn dangerous_regexes() -> &'static [(&'static str, Regex)] {
    DANGEROUS_RE.get_or_init(|| {
        DANGEROUS_PATTERNS
            .iter()
            .map(|p| (*p, Regex::new(&format!("(?i){p}")).expect("valid regex")))
            .collect()
    })
}

/// Remove `--` line comments and `/* */` block comments.
///
/// Best-effort: intended for static, externalized SQL, not arbitrary input.
pub fn strip_sql_comments(sql: &str) -> String {
    let without_block = block_comment_regex().replace_all(sql, "");
    line_comment_regex()
        .replace_all(&without_block, "")
        .into_owned()
}

/// Reject SQL containing known injection payloads.
pub fn validate_sql(sql: &str) -> CoreResult<()> {
    if sql.is_empty() {
        return Ok(());
    }

    let stripped = strip_sql_comments(sql);
    let normalized = whitespace_regex().replace_all(&stripped, " ");

    for (pattern, re) in dangerous_regexes() {
        if re.is_match(&normalized) {
            return Err(CoreError::UnsafeSql {
                reason: format!("matched pattern {pattern}"),
            });
        }
    }
    Ok(())
}

/// Require the statement to start with a read-only keyword.
pub fn validate_readonly_prefix(sql: &str) -> CoreResult<()> {
    let upper = strip_sql_comments(sql).trim().to_uppercase();
    if READONLY_PREFIXES.iter().any(|p| upper.starts_with(p)) {
        return Ok(());
    }
    Err(CoreError::NotReadOnly {
        preview: preview(sql),
    })
}

/// Parse `sql` and require exactly one read-only statement.
///
/// `sql` must use positional (`?`) placeholders; named placeholders are
/// rewritten by [`NamedSql`](crate::query::NamedSql) before this runs.
pub fn ensure_single_statement(sql: &str) -> CoreResult<()> {
    let statements =
        Parser::parse_sql(&DuckDbDialect {}, sql).map_err(|e| CoreError::SqlParse {
            message: e.to_string(),
        })?;

    match statements.as_slice() {
        [Statement::Query(_)] => Ok(()),
        [_] => {
            // DESCRIBE / SHOW parse into several statement kinds.
            validate_readonly_prefix(sql)?;
            let upper = strip_sql_comments(sql).trim().to_uppercase();
            if upper.starts_with("DESCRIBE") || upper.starts_with("SHOW") {
                Ok(())
            } else {
                Err(CoreError::NotReadOnly {
                    preview: preview(sql),
                })
            }
        }
        other => Err(CoreError::UnsafeSql {
            reason: format!("expected exactly one statement, found {}", other.len()),
        }),
    }
}

/// Check that `name` is a safe identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> CoreResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

fn preview(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.chars().count() > PREVIEW_CHARS {
        let head: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "sql_guard_test.rs"]
mod tests;
