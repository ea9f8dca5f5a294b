//! The immutable table and its exact-match filter.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::{DatasetError, Result};

/// One scalar cell of the loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text value.
    Text(String),
    /// Floating-point value (also Excel date-time serials).
    Float(f64),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Empty or unreadable cell.
    Null,
}

impl Cell {
    /// Exact-match comparison against a query string.
    ///
    /// Query values arrive as strings and are compared without coercion:
    /// only a [`Cell::Text`] that is byte-for-byte equal matches. Numbers,
    /// booleans, and nulls never match, even when their decimal rendering
    /// would — `"5"` does not match a stored numeric `5`.
    pub fn matches(&self, query: &str) -> bool {
        match self {
            Cell::Text(s) => s == query,
            _ => false,
        }
    }

    /// Whether the cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Float(f) => serializer.serialize_f64(*f),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Null => serializer.serialize_none(),
        }
    }
}

/// The dataset: an ordered column set over ordered rows.
///
/// Built once at startup by [`crate::load_table`] and shared immutably
/// (`Arc<Table>`) with every request handler. Column names are already
/// normalized (trimmed, lowercased, unique, non-empty) by the loader.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Assemble a table from normalized columns and row data.
    ///
    /// Validates uniqueness of column names and that every row is exactly
    /// as wide as the header. Callers are expected to have normalized the
    /// column names already; this constructor does not rewrite them.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(DatasetError::EmptyHeader(i));
            }
            if columns[..i].contains(name) {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::RowWidth {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Column names, in spreadsheet order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `name` is a queryable column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Every row as a JSON object, in load order.
    pub fn all_rows(&self) -> Vec<Value> {
        self.rows.iter().map(|row| self.row_object(row)).collect()
    }

    /// The ordered subsequence of rows whose `column` cell exactly equals
    /// `value` (see [`Cell::matches`] for the comparison rules).
    ///
    /// Fails with [`DatasetError::ColumnNotFound`] when `column` is not part
    /// of the table; the error lists the available columns for the client.
    pub fn filter(&self, column: &str, value: &str) -> Result<Vec<Value>> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| DatasetError::ColumnNotFound {
                column: column.to_string(),
                available: self.columns.clone(),
            })?;

        Ok(self
            .rows
            .iter()
            .filter(|row| row[idx].matches(value))
            .map(|row| self.row_object(row))
            .collect())
    }

    /// Project one row into a JSON object keyed by column name.
    fn row_object(&self, row: &[Cell]) -> Value {
        let mut object = Map::with_capacity(self.columns.len());
        for (name, cell) in self.columns.iter().zip(row) {
            let _ = object.insert(name.clone(), cell_to_value(cell));
        }
        Value::Object(object)
    }
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Cell::Int(i) => Value::Number((*i).into()),
        Cell::Bool(b) => Value::Bool(*b),
        Cell::Null => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec!["name".into(), "tier".into(), "score".into()],
            vec![
                vec![
                    Cell::Text("ada".into()),
                    Cell::Text("gold".into()),
                    Cell::Int(5),
                ],
                vec![
                    Cell::Text("brin".into()),
                    Cell::Text("silver".into()),
                    Cell::Float(7.5),
                ],
                vec![Cell::Text("cody".into()), Cell::Text("gold".into()), Cell::Null],
            ],
        )
        .unwrap()
    }

    // ── Cell::matches ──

    #[test]
    fn text_cell_matches_exact_string() {
        assert!(Cell::Text("gold".into()).matches("gold"));
    }

    #[test]
    fn text_match_is_case_sensitive() {
        assert!(!Cell::Text("Gold".into()).matches("gold"));
        assert!(!Cell::Text("gold".into()).matches("Gold"));
    }

    #[test]
    fn numeric_cell_never_matches_its_rendering() {
        assert!(!Cell::Int(5).matches("5"));
        assert!(!Cell::Float(7.5).matches("7.5"));
    }

    #[test]
    fn bool_and_null_never_match() {
        assert!(!Cell::Bool(true).matches("true"));
        assert!(!Cell::Null.matches(""));
        assert!(!Cell::Null.matches("null"));
    }

    // ── Table construction ──

    #[test]
    fn new_rejects_duplicate_columns() {
        let result = Table::new(
            vec!["a".into(), "a".into()],
            vec![vec![Cell::Null, Cell::Null]],
        );
        assert!(matches!(result, Err(DatasetError::DuplicateColumn(c)) if c == "a"));
    }

    #[test]
    fn new_rejects_empty_header() {
        let result = Table::new(vec!["a".into(), String::new()], vec![]);
        assert!(matches!(result, Err(DatasetError::EmptyHeader(1))));
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let result = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Null, Cell::Null], vec![Cell::Null]],
        );
        assert!(matches!(
            result,
            Err(DatasetError::RowWidth {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn empty_table_is_valid() {
        let table = Table::new(vec!["only".into()], vec![]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.all_rows().is_empty());
    }

    // ── all_rows ──

    #[test]
    fn all_rows_preserves_order_and_content() {
        let rows = sample_table().all_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], "ada");
        assert_eq!(rows[1]["name"], "brin");
        assert_eq!(rows[2]["name"], "cody");
    }

    #[test]
    fn rows_serialize_scalars_faithfully() {
        let rows = sample_table().all_rows();
        assert_eq!(rows[0]["score"], 5);
        assert_eq!(rows[1]["score"], 7.5);
        assert_eq!(rows[2]["score"], Value::Null);
    }

    // ── filter ──

    #[test]
    fn filter_returns_matching_subsequence_in_order() {
        let table = sample_table();
        let rows = table.filter("tier", "gold").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "ada");
        assert_eq!(rows[1]["name"], "cody");
    }

    #[test]
    fn filter_no_matches_is_empty_array() {
        let table = sample_table();
        let rows = table.filter("tier", "bronze").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn filter_is_type_strict() {
        // "5" is stored as an integer in the score column, so a string
        // query can never select it.
        let table = sample_table();
        let rows = table.filter("score", "5").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn filter_unknown_column_lists_available() {
        let table = sample_table();
        let err = table.filter("rank", "x").unwrap_err();
        match err {
            DatasetError::ColumnNotFound { column, available } => {
                assert_eq!(column, "rank");
                assert_eq!(available, vec!["name", "tier", "score"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn has_column_checks_membership() {
        let table = sample_table();
        assert!(table.has_column("tier"));
        assert!(!table.has_column("Tier"));
        assert!(!table.has_column("rank"));
    }

    #[test]
    fn cell_serializes_to_expected_json() {
        assert_eq!(serde_json::to_value(Cell::Text("x".into())).unwrap(), "x");
        assert_eq!(serde_json::to_value(Cell::Int(-3)).unwrap(), -3);
        assert_eq!(serde_json::to_value(Cell::Bool(false)).unwrap(), false);
        assert_eq!(serde_json::to_value(Cell::Null).unwrap(), Value::Null);
    }
}
