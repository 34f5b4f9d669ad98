//! Minimal cell-level diff between two tables.

use crate::table::{RowId, Table};
use serde::Serialize;
use sheetsync_remote::CellValue;

/// A single changed cell: the working copy's value for (row, column).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffEntry {
    pub row: RowId,
    pub column: String,
    pub value: CellValue,
}

/// Output of [`diff_tables`]: the changed cells plus the union shape both
/// tables resolve to.
#[derive(Clone, Debug, Default)]
pub struct Diff {
    pub entries: Vec<DiffEntry>,
    /// Union row order: the original's rows, then working-copy-only rows in
    /// the working copy's own order.
    pub rows: Vec<RowId>,
    /// Union column order, same append-at-end policy as rows.
    pub columns: Vec<String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Compute the minimal set of changed cells from `original` to `working`.
///
/// Every (row, column) pair of the identifier union is compared with
/// normalized equality; pairs absent from one side read as blank, so a
/// removed row or column diffs as explicit blank overwrites and a new
/// identifier contributes one entry per non-blank cell. Identical tables
/// produce an empty diff.
pub fn diff_tables(original: &Table, working: &Table) -> Diff {
    let columns = union_columns(original, working);
    let rows = union_rows(original, working);

    let mut entries = Vec::new();
    for &row in &rows {
        for column in &columns {
            let old = original.get(row, column);
            let new = working.get(row, column);
            if old.loose_eq(&new) {
                continue;
            }
            entries.push(DiffEntry {
                row,
                column: column.clone(),
                value: new,
            });
        }
    }

    Diff {
        entries,
        rows,
        columns,
    }
}

/// Stable append-at-end union: new identifiers are never inserted in the
/// middle, since remote range addressing is contiguous and position-based.
fn union_columns(original: &Table, working: &Table) -> Vec<String> {
    let mut columns = original.columns().to_vec();
    for label in working.columns() {
        if !original.has_column(label) {
            columns.push(label.clone());
        }
    }
    columns
}

fn union_rows(original: &Table, working: &Table) -> Vec<RowId> {
    let mut rows = original.row_ids().to_vec();
    for &row in working.row_ids() {
        if !original.has_row(row) {
            rows.push(row);
        }
    }
    rows
}
