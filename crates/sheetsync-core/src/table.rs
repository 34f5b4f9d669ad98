//! Tabular data model shared by snapshots and working copies.

use crate::error::{Result, SheetSyncError};
use sheetsync_remote::CellValue;
use std::collections::HashMap;
use std::fmt;

/// Stable row identifier. Positional at load time (0-based position among
/// data rows); rows created later receive fresh trailing identifiers and
/// identifiers are never reused within a table's lifetime.
pub type RowId = usize;

/// An ordered, labeled grid of scalar cells.
///
/// Columns are ordered unique labels; rows are ordered unique [`RowId`]s.
/// Every (row, column) pair inside the shape reads as a value, with unset
/// cells yielding [`CellValue::Blank`]. Reads outside the shape also yield
/// `Blank`, which is what the diff engine relies on to treat removed rows
/// and columns as explicit blank overwrites.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<RowId>,
    cells: HashMap<RowId, HashMap<String, CellValue>>,
    next_row_id: RowId,
}

impl Table {
    /// Create an empty table with the given column labels.
    pub fn new(columns: Vec<String>) -> Result<Table> {
        check_unique(&columns)?;
        Ok(Table {
            columns,
            rows: Vec::new(),
            cells: HashMap::new(),
            next_row_id: 0,
        })
    }

    /// Build a table from a header and data rows, assigning positional row
    /// identifiers. Rows shorter than the header are padded with blanks;
    /// trailing cells beyond the header are dropped.
    pub(crate) fn from_grid(columns: Vec<String>, data: Vec<Vec<CellValue>>) -> Result<Table> {
        let mut table = Table::new(columns)?;
        for values in data {
            table.push_row(values);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_row(&self, row: RowId) -> bool {
        self.rows.contains(&row)
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    /// Value at (row, column); `Blank` for unset cells and for positions
    /// outside the table's shape.
    pub fn get(&self, row: RowId, column: &str) -> CellValue {
        self.cells
            .get(&row)
            .and_then(|r| r.get(column))
            .cloned()
            .unwrap_or(CellValue::Blank)
    }

    /// Set a cell. A new column label is appended after the existing
    /// columns; a new row identifier is appended after the existing rows.
    pub fn set(&mut self, row: RowId, column: &str, value: impl Into<CellValue>) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        if !self.has_row(row) {
            self.rows.push(row);
            self.next_row_id = self.next_row_id.max(row + 1);
        }
        let value = value.into();
        let row_cells = self.cells.entry(row).or_default();
        if value.is_blank() {
            row_cells.remove(column);
        } else {
            row_cells.insert(column.to_string(), value);
        }
    }

    /// Append a row of values aligned with the current columns and return
    /// its fresh identifier. Missing trailing values read as blank; values
    /// beyond the column count are dropped.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> RowId {
        let row = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(row);
        for (column, value) in self.columns.iter().zip(values) {
            if !value.is_blank() {
                self.cells
                    .entry(row)
                    .or_default()
                    .insert(column.clone(), value);
            }
        }
        row
    }

    /// Append an empty column.
    pub fn add_column(&mut self, label: &str) -> Result<()> {
        if self.has_column(label) {
            return Err(SheetSyncError::DuplicateColumn(label.to_string()));
        }
        self.columns.push(label.to_string());
        Ok(())
    }

    /// Remove a column and all of its cells. Returns false if absent.
    pub fn remove_column(&mut self, label: &str) -> bool {
        let Some(pos) = self.columns.iter().position(|c| c == label) else {
            return false;
        };
        self.columns.remove(pos);
        for row_cells in self.cells.values_mut() {
            row_cells.remove(label);
        }
        true
    }

    /// Remove a row and all of its cells. Returns false if absent. The
    /// identifier is retired, not recycled.
    pub fn remove_row(&mut self, row: RowId) -> bool {
        let Some(pos) = self.rows.iter().position(|r| *r == row) else {
            return false;
        };
        self.rows.remove(pos);
        self.cells.remove(&row);
        true
    }

    /// Remove every row, keeping the column layout.
    pub fn clear_rows(&mut self) {
        self.rows.clear();
        self.cells.clear();
    }

    /// Bulk update from another table: every (row, column, value) of
    /// `update` is assigned into this table, blanks included. Rows are
    /// matched by identifier, columns by label; unknown identifiers and
    /// labels are appended.
    pub fn apply(&mut self, update: &Table) {
        let columns = update.columns().to_vec();
        for &row in update.row_ids() {
            for column in &columns {
                self.set(row, column, update.get(row, column));
            }
        }
    }

    /// The first `n` rows as an owned table, for diagnostics.
    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<RowId> = self.rows.iter().take(n).copied().collect();
        self.reshaped(&rows, &self.columns)
    }

    /// An owned table with the given shape, pulling values from this table
    /// (blank where this table has none).
    pub(crate) fn reshaped(&self, rows: &[RowId], columns: &[String]) -> Table {
        let mut cells: HashMap<RowId, HashMap<String, CellValue>> = HashMap::new();
        for &row in rows {
            if let Some(row_cells) = self.cells.get(&row) {
                let kept: HashMap<String, CellValue> = columns
                    .iter()
                    .filter_map(|c| row_cells.get(c).map(|v| (c.clone(), v.clone())))
                    .collect();
                if !kept.is_empty() {
                    cells.insert(row, kept);
                }
            }
        }
        let max_id = rows.iter().copied().max().map_or(0, |m| m + 1);
        Table {
            columns: columns.to_vec(),
            rows: rows.to_vec(),
            cells,
            next_row_id: self.next_row_id.max(max_id),
        }
    }
}

impl PartialEq for Table {
    /// Shape and cell-value equality; the internal id counter is not part
    /// of a table's observable state.
    fn eq(&self, other: &Table) -> bool {
        if self.columns != other.columns || self.rows != other.rows {
            return false;
        }
        self.rows.iter().all(|&row| {
            self.columns
                .iter()
                .all(|column| self.get(row, column) == other.get(row, column))
        })
    }
}

impl fmt::Display for Table {
    /// Markdown-style rendering with row identifiers in the first column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|    |")?;
        for column in &self.columns {
            write!(f, " {} |", escape_cell(column))?;
        }
        writeln!(f)?;
        write!(f, "|---|")?;
        for _ in &self.columns {
            write!(f, "---|")?;
        }
        writeln!(f)?;
        for &row in &self.rows {
            write!(f, "| {} |", row)?;
            for column in &self.columns {
                write!(f, " {} |", escape_cell(&self.get(row, column).to_string()))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

fn check_unique(columns: &[String]) -> Result<()> {
    for (i, label) in columns.iter().enumerate() {
        if columns[..i].contains(label) {
            return Err(SheetSyncError::DuplicateColumn(label.clone()));
        }
    }
    Ok(())
}
