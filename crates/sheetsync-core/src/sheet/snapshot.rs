//! In-memory snapshot of a remote worksheet.

use crate::error::{Result, SheetSyncError};
use crate::table::Table;
use sheetsync_remote::{CellValue, RemoteTable, SheetLocation};
use std::cell::{Cell, Ref, RefCell};

/// An in-memory copy of a rectangular remote range at a point in time,
/// together with the accessor and location it was loaded from.
///
/// The snapshot's table only ever mutates on two paths: a successful
/// session commit, and an explicit [`reload`](Snapshot::reload).
#[derive(Debug)]
pub struct Snapshot<R: RemoteTable> {
    pub(crate) table: RefCell<Table>,
    pub(crate) remote: R,
    pub(crate) location: SheetLocation,
    /// Advisory single-session guard; not a mutex (see `start_update`).
    pub(crate) session_open: Cell<bool>,
}

impl<R: RemoteTable> Snapshot<R> {
    /// Fetch the full range and interpret the first row as column labels.
    /// Data rows get 0-based positional identifiers.
    pub fn load(
        remote: R,
        spreadsheet: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Result<Snapshot<R>> {
        let location = SheetLocation::new(spreadsheet, worksheet);
        let table = fetch(&remote, &location)?;
        Ok(Snapshot {
            table: RefCell::new(table),
            remote,
            location,
            session_open: Cell::new(false),
        })
    }

    /// Refetch the range, replacing the in-memory table. Refused while a
    /// session is open: it would pull the original out from under the diff.
    pub fn reload(&mut self) -> Result<()> {
        if self.session_open.get() {
            return Err(SheetSyncError::SessionAlreadyOpen);
        }
        let table = fetch(&self.remote, &self.location)?;
        *self.table.borrow_mut() = table;
        Ok(())
    }

    pub fn location(&self) -> &SheetLocation {
        &self.location
    }

    /// Read-only borrow of the snapshot's table. Release it before
    /// committing a session, which needs to write the table back.
    pub fn table(&self) -> Ref<'_, Table> {
        self.table.borrow()
    }

    /// Owned copy of the tabular data; mutating it never touches the
    /// snapshot.
    pub fn to_table(&self) -> Table {
        self.table.borrow().clone()
    }

    /// First `n` rows, for diagnostics.
    pub fn head(&self, n: usize) -> Table {
        self.table.borrow().head(n)
    }
}

impl<R: RemoteTable + Clone> Clone for Snapshot<R> {
    /// Deep copy of the tabular data; the remote accessor handle is cloned
    /// and the copy starts with no session open.
    fn clone(&self) -> Self {
        Snapshot {
            table: RefCell::new(self.table.borrow().clone()),
            remote: self.remote.clone(),
            location: self.location.clone(),
            session_open: Cell::new(false),
        }
    }
}

fn fetch<R: RemoteTable>(remote: &R, location: &SheetLocation) -> Result<Table> {
    let grid = remote.read_all(location)?;
    let mut rows = grid.into_iter();
    let Some(header) = rows.next() else {
        return Err(SheetSyncError::EmptySheet);
    };

    let columns: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.into_iter().map(coerce).collect())
        .collect();
    Table::from_grid(columns, data)
}

/// Typed values pass through; strings get the transport coercion (numbers,
/// TRUE/FALSE booleans, blanks).
fn coerce(value: CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => CellValue::from_remote(&s),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::error::SheetSyncError;
    use sheetsync_remote::{CellValue, InMemoryRemote, RemoteError, SheetLocation};

    fn seeded_remote() -> InMemoryRemote {
        let remote = InMemoryRemote::new();
        remote.seed(
            &SheetLocation::new("book", "ws"),
            &[
                &["id", "name", "active"],
                &["1", "ada", "TRUE"],
                &["2", "grace", "false"],
            ],
        );
        remote
    }

    #[test]
    fn test_load_assigns_positional_row_ids() {
        let snapshot = Snapshot::load(seeded_remote(), "book", "ws").unwrap();
        let table = snapshot.table();
        assert_eq!(table.row_ids(), &[0, 1]);
        assert_eq!(table.columns(), &["id", "name", "active"]);
    }

    #[test]
    fn test_load_coerces_typed_values() {
        let snapshot = Snapshot::load(seeded_remote(), "book", "ws").unwrap();
        let table = snapshot.table();
        assert_eq!(table.get(0, "id"), CellValue::Number(1.0));
        assert_eq!(table.get(0, "active"), CellValue::Bool(true));
        assert_eq!(table.get(1, "active"), CellValue::Bool(false));
        assert_eq!(table.get(1, "name"), CellValue::text("grace"));
    }

    #[test]
    fn test_load_missing_worksheet_is_range_not_found() {
        let err = Snapshot::load(seeded_remote(), "book", "other").unwrap_err();
        assert!(matches!(
            err,
            SheetSyncError::Remote(RemoteError::RangeNotFound { .. })
        ));
    }

    #[test]
    fn test_load_unavailable_remote_surfaces_unchanged() {
        let remote = seeded_remote();
        remote.set_unavailable(true);
        let err = Snapshot::load(remote, "book", "ws").unwrap_err();
        assert!(matches!(
            err,
            SheetSyncError::Remote(RemoteError::Unavailable(_))
        ));
    }

    #[test]
    fn test_load_empty_range_fails() {
        let remote = InMemoryRemote::new();
        remote.seed(&SheetLocation::new("book", "ws"), &[]);
        let err = Snapshot::load(remote, "book", "ws").unwrap_err();
        assert!(matches!(err, SheetSyncError::EmptySheet));
    }

    #[test]
    fn test_load_duplicate_headers_fail() {
        let remote = InMemoryRemote::new();
        remote.seed(&SheetLocation::new("book", "ws"), &[&["a", "a"]]);
        let err = Snapshot::load(remote, "book", "ws").unwrap_err();
        assert!(matches!(err, SheetSyncError::DuplicateColumn(_)));
    }

    #[test]
    fn test_to_table_is_detached() {
        let snapshot = Snapshot::load(seeded_remote(), "book", "ws").unwrap();
        let mut copy = snapshot.to_table();
        copy.set(0, "name", "changed");
        assert_eq!(snapshot.table().get(0, "name"), CellValue::text("ada"));
    }

    #[test]
    fn test_reload_picks_up_remote_changes() {
        let remote = seeded_remote();
        let mut snapshot = Snapshot::load(remote.clone(), "book", "ws").unwrap();
        remote.seed(
            &SheetLocation::new("book", "ws"),
            &[&["id", "name"], &["9", "new"]],
        );
        snapshot.reload().unwrap();
        assert_eq!(snapshot.table().get(0, "name"), CellValue::text("new"));
        assert_eq!(snapshot.table().row_ids(), &[0]);
    }
}
