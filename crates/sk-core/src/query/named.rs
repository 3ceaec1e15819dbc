//! Named-placeholder SQL.
//!
//! Query files are written with `:name` placeholders. They are compiled once,
//! at load time, into positional `?` SQL plus the ordered list of names, so
//! every execution is a plain prepared statement with bound values.

use crate::error::{CoreError, CoreResult};
use crate::value::SqlValue;
use std::collections::BTreeMap;

/// SQL with `:name` placeholders rewritten to `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSql {
    positional: String,
    order: Vec<String>,
}

impl NamedSql {
    /// Compile `sql`.
    ///
    /// Placeholders inside string literals (including `$tag$...$tag$`
    /// dollar quotes), quoted identifiers and comments are left alone, as are
    /// `::` casts. A bare `?` outside those contexts is
    /// rejected.
    pub fn parse(sql: &str) -> CoreResult<Self> {
        let bytes = sql.as_bytes();
        let mut positional = String::with_capacity(sql.len());
        let mut order = Vec::new();
        let mut i = 0;
        // Start of the pending verbatim run.
        let mut run = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\'' | b'"' => {
                    i = skip_quoted(bytes, i);
                }
                b'$' if i == 0 || !is_ident_continue(bytes[i - 1]) => {
                    i = match dollar_tag_len(bytes, i) {
                        Some(len) => skip_until(bytes, i + len, &bytes[i..i + len]),
                        None => i + 1,
                    };
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    i = skip_until(bytes, i + 2, b"\n");
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = skip_until(bytes, i + 2, b"*/");
                }
                b':' if bytes.get(i + 1) == Some(&b':') => {
                    i += 2;
                }
                b':' if bytes.get(i + 1).is_some_and(|b| is_ident_start(*b)) => {
                    let start = i + 1;
                    let mut end = start + 1;
                    while end < bytes.len() && is_ident_continue(bytes[end]) {
                        end += 1;
                    }
                    positional.push_str(&sql[run..i]);
                    positional.push('?');
                    order.push(sql[start..end].to_string());
                    i = end;
                    run = end;
                }
                b'?' => return Err(CoreError::PositionalPlaceholder { offset: i }),
                _ => i += 1,
            }
        }
        positional.push_str(&sql[run..]);

        Ok(Self { positional, order })
    }

    /// The rewritten SQL with `?` placeholders.
    pub fn sql(&self) -> &str {
        &self.positional
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholder_names(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for name in &self.order {
            if !seen.contains(&name.as_str()) {
                seen.push(name.as_str());
            }
        }
        seen
    }

    /// Number of positional slots (repeated names count once per use).
    pub fn slot_count(&self) -> usize {
        self.order.len()
    }

    /// Produce positional values for `params`, one per slot.
    pub fn bind(&self, params: &BTreeMap<String, SqlValue>) -> CoreResult<Vec<SqlValue>> {
        self.order
            .iter()
            .map(|name| {
                let value = params
                    .get(name)
                    .ok_or_else(|| CoreError::MissingParameter { name: name.clone() })?;
                if let SqlValue::List(_) = value {
                    return Err(CoreError::UnbindableParameter {
                        name: name.clone(),
                        reason: "list values cannot be bound to a single placeholder".into(),
                    });
                }
                Ok(value.clone())
            })
            .collect()
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Skip a quoted run starting at `start`, honouring doubled-quote escapes.
/// Returns the index just past the closing quote, or the end of input.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Length of the `$tag$` opener at `start`, if there is one. The tag may be
/// empty; `$1` style parameters do not qualify.
fn dollar_tag_len(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if bytes.get(i).is_some_and(|b| is_ident_start(*b)) {
        i += 1;
        while i < bytes.len() && is_ident_continue(bytes[i]) {
            i += 1;
        }
    }
    (bytes.get(i) == Some(&b'$')).then_some(i + 1 - start)
}

/// Return the index just past the first `terminator` at or after `from`.
fn skip_until(bytes: &[u8], from: usize, terminator: &[u8]) -> usize {
    bytes[from.min(bytes.len())..]
        .windows(terminator.len())
        .position(|w| w == terminator)
        .map_or(bytes.len(), |pos| from + pos + terminator.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, SqlValue)]) -> BTreeMap<String, SqlValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_rewrites_named_placeholders() {
        let named =
            NamedSql::parse("SELECT * FROM t WHERE a = :catalog AND b = :schema_name").unwrap();
        assert_eq!(named.sql(), "SELECT * FROM t WHERE a = ? AND b = ?");
        assert_eq!(named.placeholder_names(), vec!["catalog", "schema_name"]);
    }

    #[test]
    fn test_leaves_literals_comments_and_casts() {
        let sql = "-- :not_a_param\nSELECT ':x', \"a:b\", c::VARCHAR /* :y */ FROM t WHERE d = :d";
        let named = NamedSql::parse(sql).unwrap();
        assert_eq!(
            named.sql(),
            "-- :not_a_param\nSELECT ':x', \"a:b\", c::VARCHAR /* :y */ FROM t WHERE d = ?"
        );
        assert_eq!(named.placeholder_names(), vec!["d"]);
    }

    #[test]
    fn test_escaped_quote_inside_literal() {
        let named = NamedSql::parse("SELECT 'it''s :x' WHERE a = :a").unwrap();
        assert_eq!(named.sql(), "SELECT 'it''s :x' WHERE a = ?");
    }

    #[test]
    fn test_repeated_name_binds_each_slot() {
        let named = NamedSql::parse("SELECT :a, :b, :a").unwrap();
        assert_eq!(named.slot_count(), 3);
        assert_eq!(named.placeholder_names(), vec!["a", "b"]);
        let values = named
            .bind(&params(&[("a", SqlValue::Int(1)), ("b", "x".into())]))
            .unwrap();
        assert_eq!(
            values,
            vec![SqlValue::Int(1), SqlValue::from("x"), SqlValue::Int(1)]
        );
    }

    #[test]
    fn test_bind_missing_parameter() {
        let named = NamedSql::parse("SELECT :a").unwrap();
        let err = named.bind(&BTreeMap::new()).unwrap_err();
        assert!(matches!(err, CoreError::MissingParameter { name } if name == "a"));
    }

    #[test]
    fn test_bind_rejects_list() {
        let named = NamedSql::parse("SELECT :ids").unwrap();
        let err = named
            .bind(&params(&[("ids", SqlValue::List(vec![SqlValue::Int(1)]))]))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnbindableParameter { .. }));
    }

    #[test]
    fn test_rejects_positional_placeholder() {
        let err = NamedSql::parse("SELECT * FROM t WHERE a = ?").unwrap_err();
        assert!(matches!(err, CoreError::PositionalPlaceholder { offset: 26 }));
        assert!(NamedSql::parse("SELECT '?'").is_ok());
    }

    #[test]
    fn test_leaves_dollar_quoted_strings() {
        let named = NamedSql::parse("SELECT $$:x$$ AS lit WHERE a = :a").unwrap();
        assert_eq!(named.sql(), "SELECT $$:x$$ AS lit WHERE a = ?");
        assert_eq!(named.placeholder_names(), vec!["a"]);

        let named = NamedSql::parse("SELECT $body$ it's :y $$ ? $body$, :b").unwrap();
        assert_eq!(named.sql(), "SELECT $body$ it's :y $$ ? $body$, ?");
        assert_eq!(named.placeholder_names(), vec!["b"]);
    }

    #[test]
    fn test_unterminated_comment_is_copied() {
        let named = NamedSql::parse("SELECT 1 /* :x").unwrap();
        assert_eq!(named.sql(), "SELECT 1 /* :x");
        assert!(named.placeholder_names().is_empty());
    }
}
