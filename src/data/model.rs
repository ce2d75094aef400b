use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SheetError};

// ---------------------------------------------------------------------------
// Row – one record of the sheet
// ---------------------------------------------------------------------------

/// A single agreement record: an ordered mapping column name → cell text.
///
/// Rows share the column list of the [`Dataset`] they belong to and always
/// hold exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Arc<[String]>,
    cells: Vec<String>,
}

impl Row {
    /// Cell text for `column`, or `None` if the column is not in the schema.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.cells[i].as_str())
    }

    /// Cell text at a column position (as returned by [`Dataset::column_index`]).
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Column names in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(String::as_str))
    }

    /// Number of cells (always the dataset's column count).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells (only in a zero-column dataset).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key:?}: {value:?}")?;
        }
        write!(f, "}}")
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full, immutable table loaded for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            columns: Arc::from(Vec::new()),
            rows: Vec::new(),
        }
    }
}

impl Dataset {
    /// Build a dataset from raw rows: row 0 is the header, the rest is data.
    ///
    /// Header cells are trimmed here and nowhere else. Short rows are padded
    /// with empty strings; cells beyond the header width are dropped.
    pub fn build(raw_rows: Vec<Vec<String>>) -> Result<Self> {
        let mut raw = raw_rows.into_iter();
        let Some(header) = raw.next() else {
            return Ok(Self::default());
        };

        let mut seen = HashSet::with_capacity(header.len());
        let mut names = Vec::with_capacity(header.len());
        for cell in header {
            let name = cell.trim().to_string();
            if !seen.insert(name.clone()) {
                return Err(SheetError::DuplicateColumn(name));
            }
            names.push(name);
        }
        let columns: Arc<[String]> = names.into();
        let width = columns.len();

        let rows = raw
            .map(|mut cells| {
                cells.resize(width, String::new());
                Row {
                    columns: Arc::clone(&columns),
                    cells,
                }
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column names in header order (already trimmed).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SheetError::UnknownColumn(name.to_string()))
    }

    /// Distinct values of a column in first-occurrence order.
    ///
    /// Used to populate filter option lists.
    pub fn column_values(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.column_index(name)?;
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .map(|row| row.cells[idx].as_str())
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_input_gives_empty_dataset() {
        let ds = Dataset::build(Vec::new()).unwrap();
        assert!(ds.columns().is_empty());
        assert!(ds.is_empty());
    }

    #[test]
    fn header_is_trimmed() {
        let ds = Dataset::build(raw(&[&["  Entidad ", "Tipo de entidad\t"], &["A", "Privada"]]))
            .unwrap();
        assert_eq!(ds.columns(), ["Entidad", "Tipo de entidad"]);
        assert_eq!(ds.rows()[0].get("Tipo de entidad"), Some("Privada"));
    }

    #[test]
    fn duplicate_after_trim_is_rejected() {
        let err = Dataset::build(raw(&[&["Estado", " Estado"]])).unwrap_err();
        assert_eq!(err, SheetError::DuplicateColumn("Estado".into()));
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_cut() {
        let ds = Dataset::build(raw(&[&["Entity", "Type"], &["A"], &["B", "Public", "extra"]]))
            .unwrap();
        assert_eq!(ds.rows()[0].iter().collect::<Vec<_>>(), [("Entity", "A"), ("Type", "")]);
        assert_eq!(ds.rows()[1].len(), 2);
        assert_eq!(ds.rows()[1].get("Type"), Some("Public"));
    }

    #[test]
    fn cell_values_are_not_trimmed() {
        let ds = Dataset::build(raw(&[&["Entity"], &[" A "]])).unwrap();
        assert_eq!(ds.rows()[0].get("Entity"), Some(" A "));
    }

    #[test]
    fn column_values_keep_first_occurrence_order() {
        let ds = Dataset::build(raw(&[
            &["Entity", "Type"],
            &["A", "Public"],
            &["B", "Private"],
            &["C", "Public"],
            &["D", ""],
        ]))
        .unwrap();
        assert_eq!(ds.column_values("Type").unwrap(), ["Public", "Private", ""]);
        assert_eq!(
            ds.column_values("Status").unwrap_err(),
            SheetError::UnknownColumn("Status".into())
        );
    }

    #[test]
    fn header_only_sheet_has_columns_but_no_rows() {
        let ds = Dataset::build(raw(&[&["Entity", "Type"]])).unwrap();
        assert_eq!(ds.columns().len(), 2);
        assert!(ds.is_empty());
        assert!(ds.column_values("Type").unwrap().is_empty());
    }

    #[test]
    fn row_display_lists_pairs_in_order() {
        let ds = Dataset::build(raw(&[&["Entity", "Type"], &["B", "Private"]])).unwrap();
        assert_eq!(ds.rows()[0].to_string(), r#"{"Entity": "B", "Type": "Private"}"#);
    }
}
