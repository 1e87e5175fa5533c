//! In-memory model for a tab-delimited TXT table
//!
//! A [`Table`] owns an ordered list of columns and an ordered list of
//! rows. The column set is fixed at construction: adding, removing, or
//! renaming columns afterwards is deliberately unsupported, so the
//! original column layout can always be written back byte-exact.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name exactly as authored in the source file (may be
    /// empty, may repeat across the table)
    pub name: String,
    /// Deduplicated internal name, unique within the table; equal to
    /// `name` unless the name was a duplicate
    pub key: String,
    /// Column index (0-based, stable)
    pub index: usize,
}

/// A row of raw cell strings, always as wide as the column list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// All cell values in column order
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// Diagnostic issued when a duplicate column name had to be renamed.
///
/// This is a warning, not an error: conversion proceeds using the
/// renamed key, and the original name is still what gets written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateColumn {
    /// The duplicated name as authored
    pub name: String,
    /// Index of the later duplicate
    pub index: usize,
    /// The unique internal name assigned to it
    pub renamed: String,
}

/// A parsed TXT table
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    key_to_index: HashMap<String, usize>,
    rows: Vec<Row>,
    warnings: Vec<DuplicateColumn>,
}

impl Table {
    /// Create an empty table with the given column names.
    ///
    /// Duplicate names are renamed deterministically (see
    /// [`Table::warnings`]); the original names are kept on the
    /// [`Column`]s for output.
    pub fn new(column_names: Vec<String>) -> Self {
        let mut columns = Vec::with_capacity(column_names.len());
        let mut key_to_index = HashMap::with_capacity(column_names.len());
        let mut warnings = Vec::new();

        for (index, name) in column_names.into_iter().enumerate() {
            let mut key = name.clone();
            while key_to_index.contains_key(&key) {
                key.push_str(&format!("({})", column_symbol(index as isize)));
            }
            if key != name {
                tracing::warn!(column = index, "column name {name:?} renamed to {key:?}");
                warnings.push(DuplicateColumn {
                    name: name.clone(),
                    index,
                    renamed: key.clone(),
                });
            }
            key_to_index.insert(key.clone(), index);
            columns.push(Column { name, key, index });
        }

        Self {
            columns,
            key_to_index,
            rows: Vec::new(),
            warnings,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All column definitions, in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Duplicate-column diagnostics collected at construction
    pub fn warnings(&self) -> &[DuplicateColumn] {
        &self.warnings
    }

    /// Index of the column with the given internal key
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.key_to_index.get(key).copied()
    }

    /// All rows, in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row by index, bounds-checked
    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows.get(index).ok_or(Error::RowOutOfRange {
            index,
            count: self.rows.len(),
        })
    }

    /// Append a row. Short rows are padded with empty cells, long rows
    /// truncated, so every row is exactly as wide as the column list.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(self.fit(cells));
    }

    /// Insert a row at the given index (clamped to the row count)
    pub fn insert_row(&mut self, index: usize, cells: Vec<String>) {
        let index = index.min(self.rows.len());
        let row = self.fit(cells);
        self.rows.insert(index, row);
    }

    /// Remove a row by index, bounds-checked
    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(Error::RowOutOfRange {
                index,
                count: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Get a cell by row index and column key
    pub fn cell(&self, row: usize, key: &str) -> Result<&str> {
        let col = self.resolve(key)?;
        Ok(&self.row(row)?.cells[col])
    }

    /// Get a cell by row and column index
    pub fn cell_at(&self, row: usize, column: usize) -> Result<&str> {
        self.row(row)?
            .get(column)
            .ok_or_else(|| Error::UnknownColumn(format!("#{column}")))
    }

    /// Overwrite a cell by row index and column key
    pub fn set_cell(&mut self, row: usize, key: &str, value: impl Into<String>) -> Result<()> {
        let col = self.resolve(key)?;
        self.set_cell_at(row, col, value)
    }

    /// Overwrite a cell by row and column index
    pub fn set_cell_at(&mut self, row: usize, column: usize, value: impl Into<String>) -> Result<()> {
        let count = self.rows.len();
        let row = self
            .rows
            .get_mut(row)
            .ok_or(Error::RowOutOfRange { index: row, count })?;
        match row.cells.get_mut(column) {
            Some(cell) => {
                *cell = value.into();
                Ok(())
            }
            None => Err(Error::UnknownColumn(format!("#{column}"))),
        }
    }

    fn resolve(&self, key: &str) -> Result<usize> {
        self.column_index(key)
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))
    }

    fn fit(&self, mut cells: Vec<String>) -> Row {
        cells.resize(self.columns.len(), String::new());
        Row { cells }
    }
}

/// Convert a 0-based column index to an Excel-style column symbol
/// (A, B, ..., Z, AA, AB, ...), used to disambiguate duplicate names
fn column_symbol(mut index: isize) -> String {
    let mut symbol = String::new();
    while index >= 0 {
        let modulo = (index % 26) as u8;
        symbol.insert(0, (b'A' + modulo) as char);
        index = (index - modulo as isize) / 26 - 1;
    }
    symbol
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_symbol() {
        assert_eq!(column_symbol(0), "A");
        assert_eq!(column_symbol(1), "B");
        assert_eq!(column_symbol(25), "Z");
        assert_eq!(column_symbol(26), "AA");
        assert_eq!(column_symbol(27), "AB");
        assert_eq!(column_symbol(26 * 27), "AAA");
    }

    #[test]
    fn test_unique_names_unchanged() {
        let table = Table::new(names(&["column 1", "column 2", "column 3"]));
        assert_eq!(table.column_count(), 3);
        assert!(table.warnings().is_empty());
        for col in table.columns() {
            assert_eq!(col.name, col.key);
        }
    }

    #[test]
    fn test_duplicate_names_renamed() {
        let table = Table::new(names(&["Elem", "Count", "Elem"]));
        assert_eq!(table.columns()[2].name, "Elem");
        assert_eq!(table.columns()[2].key, "Elem(C)");
        assert_eq!(table.column_index("Elem"), Some(0));
        assert_eq!(table.column_index("Elem(C)"), Some(2));

        assert_eq!(table.warnings().len(), 1);
        assert_eq!(table.warnings()[0].name, "Elem");
        assert_eq!(table.warnings()[0].index, 2);
        assert_eq!(table.warnings()[0].renamed, "Elem(C)");
    }

    #[test]
    fn test_duplicate_rename_collision_extends() {
        // the authored name "Elem(C)" already occupies the first rename
        let table = Table::new(names(&["Elem", "Elem(C)", "Elem"]));
        assert_eq!(table.columns()[2].key, "Elem(C)(C)");
    }

    #[test]
    fn test_blank_names() {
        let table = Table::new(names(&["", "Name", ""]));
        assert_eq!(table.columns()[0].key, "");
        assert_eq!(table.columns()[2].key, "(C)");
        assert_eq!(table.warnings().len(), 1);
    }

    #[test]
    fn test_cell_access_by_name_and_index() {
        let mut table = Table::new(names(&["column 1", "column 2"]));
        table.push_row(vec!["foo".to_string(), "bar".to_string()]);

        assert_eq!(table.cell(0, "column 1").unwrap(), "foo");
        assert_eq!(table.cell_at(0, 1).unwrap(), "bar");

        table.set_cell(0, "column 1", "alpha").unwrap();
        table.set_cell_at(0, 1, "beta").unwrap();
        assert_eq!(table.cell(0, "column 1").unwrap(), "alpha");
        assert_eq!(table.cell(0, "column 2").unwrap(), "beta");
    }

    #[test]
    fn test_unknown_column() {
        let mut table = Table::new(names(&["a"]));
        table.push_row(vec!["x".to_string()]);
        assert!(matches!(
            table.cell(0, "missing"),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_row_out_of_range() {
        let table = Table::new(names(&["a"]));
        assert!(matches!(
            table.row(0),
            Err(Error::RowOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_rows_padded_and_truncated() {
        let mut table = Table::new(names(&["a", "b", "c"]));
        table.push_row(vec!["1".to_string()]);
        table.push_row(vec!["1".into(), "2".into(), "3".into(), "4".into()]);

        assert_eq!(table.rows()[0].cells(), &["1", "", ""]);
        assert_eq!(table.rows()[1].cells(), &["1", "2", "3"]);
    }

    #[test]
    fn test_insert_and_remove_rows() {
        let mut table = Table::new(names(&["a"]));
        table.push_row(vec!["first".to_string()]);
        table.push_row(vec!["third".to_string()]);
        table.insert_row(1, vec!["second".to_string()]);

        assert_eq!(table.cell(1, "a").unwrap(), "second");

        let removed = table.remove_row(0).unwrap();
        assert_eq!(removed.cells(), &["first"]);
        assert_eq!(table.row_count(), 2);
        assert!(table.remove_row(5).is_err());
    }
}
