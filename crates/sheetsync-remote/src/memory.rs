//! In-memory remote table used by tests and demos.

use crate::accessor::{CellWrite, RemoteError, RemoteTable, SheetLocation};
use crate::value::CellValue;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// An in-process [`RemoteTable`] backed by plain grids.
///
/// The handle is a cheap clone over shared state, so a test can keep one
/// copy for inspection while the snapshot under test owns another.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRemote {
    inner: Rc<RefCell<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    sheets: HashMap<SheetLocation, Vec<Vec<CellValue>>>,
    write_calls: usize,
    fail_next_write: Option<String>,
    unavailable: bool,
}

impl InMemoryRemote {
    pub fn new() -> InMemoryRemote {
        InMemoryRemote::default()
    }

    /// Seed a worksheet from raw string rows, header row first, the way the
    /// remote transport would deliver them.
    pub fn seed(&self, location: &SheetLocation, rows: &[&[&str]]) {
        let grid = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Blank
                        } else {
                            CellValue::Text(field.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        self.inner
            .borrow_mut()
            .sheets
            .insert(location.clone(), grid);
    }

    /// Current contents of a worksheet, for assertions.
    pub fn grid(&self, location: &SheetLocation) -> Vec<Vec<CellValue>> {
        self.inner
            .borrow()
            .sheets
            .get(location)
            .cloned()
            .unwrap_or_default()
    }

    /// Single cell in sheet coordinates; `Blank` outside the grid.
    pub fn cell(&self, location: &SheetLocation, row: usize, col: usize) -> CellValue {
        self.grid(location)
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or(CellValue::Blank)
    }

    /// Number of `write_cells` batches applied so far.
    pub fn write_calls(&self) -> usize {
        self.inner.borrow().write_calls
    }

    /// Make the next `write_cells` call fail with the given reason.
    pub fn fail_next_write(&self, reason: impl Into<String>) {
        self.inner.borrow_mut().fail_next_write = Some(reason.into());
    }

    /// Simulate a transport outage for all subsequent calls.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }
}

impl RemoteTable for InMemoryRemote {
    fn read_all(&self, location: &SheetLocation) -> Result<Vec<Vec<CellValue>>, RemoteError> {
        let store = self.inner.borrow();
        if store.unavailable {
            return Err(RemoteError::Unavailable("simulated outage".to_string()));
        }
        store
            .sheets
            .get(location)
            .cloned()
            .ok_or_else(|| RemoteError::RangeNotFound {
                location: location.clone(),
            })
    }

    fn write_cells(
        &self,
        location: &SheetLocation,
        writes: &[CellWrite],
    ) -> Result<(), RemoteError> {
        let mut store = self.inner.borrow_mut();
        if store.unavailable {
            return Err(RemoteError::Unavailable("simulated outage".to_string()));
        }
        if let Some(reason) = store.fail_next_write.take() {
            return Err(RemoteError::WriteFailed {
                reason,
                failed: writes.iter().map(|w| w.coord).collect(),
            });
        }
        let grid = store
            .sheets
            .get_mut(location)
            .ok_or_else(|| RemoteError::RangeNotFound {
                location: location.clone(),
            })?;

        for write in writes {
            // Grow the grid to cover the addressed cell, like the real
            // service does for appended rows and columns.
            if grid.len() <= write.coord.row {
                grid.resize(write.coord.row + 1, Vec::new());
            }
            let row = &mut grid[write.coord.row];
            if row.len() <= write.coord.col {
                row.resize(write.coord.col + 1, CellValue::Blank);
            }
            row[write.coord.col] = write.value.clone();
        }
        store.write_calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::CellCoord;

    fn location() -> SheetLocation {
        SheetLocation::new("sheet-id", "ws")
    }

    #[test]
    fn test_seed_and_read_all() {
        let remote = InMemoryRemote::new();
        remote.seed(&location(), &[&["id", "name"], &["1", "ada"]]);
        let grid = remote.read_all(&location()).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][1], CellValue::Text("ada".to_string()));
    }

    #[test]
    fn test_read_missing_sheet_is_range_not_found() {
        let remote = InMemoryRemote::new();
        let err = remote.read_all(&location()).unwrap_err();
        assert!(matches!(err, RemoteError::RangeNotFound { .. }));
    }

    #[test]
    fn test_write_grows_grid() {
        let remote = InMemoryRemote::new();
        remote.seed(&location(), &[&["id"]]);
        let writes = [CellWrite::new(
            CellCoord::new(3, 2),
            CellValue::Number(7.0),
        )];
        remote.write_cells(&location(), &writes).unwrap();
        assert_eq!(remote.cell(&location(), 3, 2), CellValue::Number(7.0));
        assert_eq!(remote.cell(&location(), 3, 1), CellValue::Blank);
        assert_eq!(remote.write_calls(), 1);
    }

    #[test]
    fn test_fail_next_write_reports_all_coords() {
        let remote = InMemoryRemote::new();
        remote.seed(&location(), &[&["id"]]);
        remote.fail_next_write("quota exceeded");
        let writes = [
            CellWrite::new(CellCoord::new(1, 0), CellValue::Number(1.0)),
            CellWrite::new(CellCoord::new(2, 0), CellValue::Number(2.0)),
        ];
        let err = remote.write_cells(&location(), &writes).unwrap_err();
        match err {
            RemoteError::WriteFailed { failed, .. } => assert_eq!(failed.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        // The failure is one-shot; the next batch goes through.
        remote.write_cells(&location(), &writes).unwrap();
        assert_eq!(remote.write_calls(), 1);
    }
}
