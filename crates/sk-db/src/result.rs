//! Materialized query results.

use sk_core::SqlValue;

/// Column names plus every row of a query, decoded to [`SqlValue`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name`, compared case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row { set: self, values })
    }
}

/// Borrowed view of one row with name-based accessors.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    set: &'a ResultSet,
    values: &'a [SqlValue],
}

impl<'a> Row<'a> {
    pub fn values(&self) -> &'a [SqlValue] {
        self.values
    }

    pub fn get(&self, column: &str) -> Option<&'a SqlValue> {
        self.set
            .column_index(column)
            .and_then(|i| self.values.get(i))
    }

    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(SqlValue::as_str)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(SqlValue::as_i64)
    }

    pub fn bool(&self, column: &str) -> Option<bool> {
        self.get(column).and_then(SqlValue::as_bool)
    }
}
