//! Translate a diff into one remote batch and merge on success.

use super::diff::Diff;
use super::snapshot::Snapshot;
use crate::error::Result;
use crate::table::Table;
use sheetsync_remote::{CellCoord, CellValue, CellWrite, RemoteTable};
use std::collections::HashMap;

/// Apply `diff` to the remote store in a single batch, then merge the
/// working copy (extended to the union shape) into the snapshot.
///
/// Fail-clean: if the batch call fails, the snapshot's table is left
/// completely untouched and the error propagates. An empty batch is never
/// issued.
pub(crate) fn reconcile<R: RemoteTable>(
    snapshot: &Snapshot<R>,
    working: &Table,
    diff: &Diff,
) -> Result<()> {
    let writes = {
        let original = snapshot.table.borrow();
        build_writes(&original, diff)
    };

    if !writes.is_empty() {
        snapshot.remote.write_cells(&snapshot.location, &writes)?;
    }

    // The only point at which the long-lived snapshot mutates.
    let merged = working.reshaped(&diff.rows, &diff.columns);
    *snapshot.table.borrow_mut() = merged;
    Ok(())
}

/// Resolve diff entries to sheet coordinates.
///
/// Original columns keep their load-time positions; new columns take the
/// positions immediately after them, and their header cells join the same
/// batch (also when the new column carries no values yet, so the remote
/// layout matches the merged local shape).
fn build_writes(original: &Table, diff: &Diff) -> Vec<CellWrite> {
    let mut writes = Vec::new();

    let mut col_pos: HashMap<&str, usize> = HashMap::new();
    for (i, label) in original.columns().iter().enumerate() {
        col_pos.insert(label.as_str(), i);
    }
    for label in &diff.columns {
        if !col_pos.contains_key(label.as_str()) {
            let pos = col_pos.len();
            col_pos.insert(label.as_str(), pos);
            writes.push(CellWrite::new(
                CellCoord::new(0, pos),
                CellValue::text(label.clone()),
            ));
        }
    }

    for entry in &diff.entries {
        let col = col_pos[entry.column.as_str()];
        writes.push(CellWrite::new(
            CellCoord::from_data(entry.row, col),
            entry.value.clone(),
        ));
    }

    writes
}

#[cfg(test)]
mod tests {
    use super::build_writes;
    use crate::sheet::diff::diff_tables;
    use crate::table::Table;
    use sheetsync_remote::CellValue;

    // Mirrors a sheet with columns A..D and data rows 2..4.
    fn original() -> Table {
        let mut table = Table::new(
            ["id", "col_b", "col_c", "col_d"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        table.push_row(vec![
            CellValue::Number(1.0),
            CellValue::text("B2_val"),
            CellValue::Number(10.0),
            CellValue::Blank,
        ]);
        table.push_row(vec![
            CellValue::Number(2.0),
            CellValue::text("B3_val"),
            CellValue::Number(20.0),
            CellValue::Blank,
        ]);
        table.push_row(vec![
            CellValue::Number(3.0),
            CellValue::text("B4_val"),
            CellValue::Number(30.0),
            CellValue::text("D4_val"),
        ]);
        table
    }

    fn ranges(original: &Table, working: &Table) -> Vec<String> {
        let diff = diff_tables(original, working);
        build_writes(original, &diff)
            .iter()
            .map(|w| w.range())
            .collect()
    }

    #[test]
    fn test_single_cell_change_addresses_b3() {
        let table = original();
        let mut working = table.clone();
        working.set(1, "col_b", "Updated B3");
        assert_eq!(ranges(&table, &working), vec!["B3"]);
    }

    #[test]
    fn test_multiple_cell_changes() {
        let table = original();
        let mut working = table.clone();
        working.set(0, "col_c", 99.0);
        working.set(2, "col_d", "New D4 val");
        let mut addressed = ranges(&table, &working);
        addressed.sort();
        assert_eq!(addressed, vec!["C2", "D4"]);
    }

    #[test]
    fn test_new_column_writes_header_then_values() {
        let table = original();
        let mut working = table.clone();
        working.set(0, "new_col_e", "E2_val");
        let diff = diff_tables(&table, &working);
        let writes = build_writes(&table, &diff);
        let addressed: Vec<String> = writes.iter().map(|w| w.range()).collect();
        assert_eq!(addressed, vec!["E1", "E2"]);
        assert_eq!(writes[0].value, CellValue::text("new_col_e"));
        assert_eq!(writes[1].value, CellValue::text("E2_val"));
    }

    #[test]
    fn test_blank_new_column_still_writes_header() {
        let table = original();
        let mut working = table.clone();
        working.add_column("notes").unwrap();
        let diff = diff_tables(&table, &working);
        let writes = build_writes(&table, &diff);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].range(), "E1");
    }

    #[test]
    fn test_new_row_addresses_trailing_sheet_row() {
        let table = original();
        let mut working = table.clone();
        working.push_row(vec![
            CellValue::Number(4.0),
            CellValue::text("B5_val"),
            CellValue::Blank,
            CellValue::Blank,
        ]);
        let mut addressed = ranges(&table, &working);
        addressed.sort();
        assert_eq!(addressed, vec!["A5", "B5"]);
    }

    #[test]
    fn test_no_changes_no_writes() {
        let table = original();
        let working = table.clone();
        assert!(ranges(&table, &working).is_empty());
    }
}
