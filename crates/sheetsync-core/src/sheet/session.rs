//! Scoped edit sessions with commit-on-success semantics.

use super::diff::diff_tables;
use super::reconcile::reconcile;
use super::snapshot::Snapshot;
use crate::error::{Result, SheetSyncError};
use crate::table::Table;
use sheetsync_remote::RemoteTable;

/// An exclusive editing lease on a [`Snapshot`] holding a mutable working
/// copy of its table.
///
/// [`commit`](ChangeSession::commit) diffs the working copy against the
/// original and pushes only the changed cells. Dropping the session without
/// committing aborts it: the guard is released, the edits are discarded,
/// and no remote traffic happens.
#[derive(Debug)]
pub struct ChangeSession<'a, R: RemoteTable> {
    snapshot: &'a Snapshot<R>,
    working: Table,
}

impl<R: RemoteTable> Snapshot<R> {
    /// Open an edit session, cloning the current table into a working copy.
    ///
    /// Only one session may be open per snapshot; a second attempt fails
    /// with [`SheetSyncError::SessionAlreadyOpen`] before any mutation
    /// occurs. The guard is advisory in-process state, not a lock on the
    /// remote store.
    pub fn start_update(&self) -> Result<ChangeSession<'_, R>> {
        if self.session_open.replace(true) {
            return Err(SheetSyncError::SessionAlreadyOpen);
        }
        let working = self.table.borrow().clone();
        Ok(ChangeSession {
            snapshot: self,
            working,
        })
    }

    /// Scoped edit: run `f` on a working copy, commit when it returns `Ok`,
    /// abort (guard released, nothing written) when it returns `Err`.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Table) -> Result<()>,
    {
        let mut session = self.start_update()?;
        f(session.table_mut())?;
        session.commit()
    }
}

impl<R: RemoteTable> ChangeSession<'_, R> {
    pub fn table(&self) -> &Table {
        &self.working
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.working
    }

    /// Diff the working copy against the original, push the changed cells
    /// to the remote store in one batch, and merge the working copy into
    /// the snapshot. An empty diff issues no remote call at all. On any
    /// remote failure the snapshot is left untouched and the error
    /// propagates.
    pub fn commit(self) -> Result<()> {
        let diff = {
            let original = self.snapshot.table.borrow();
            diff_tables(&original, &self.working)
        };
        reconcile(self.snapshot, &self.working, &diff)
        // The Drop impl releases the guard on success and failure alike.
    }
}

impl<R: RemoteTable> Drop for ChangeSession<'_, R> {
    fn drop(&mut self) {
        self.snapshot.session_open.set(false);
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SheetSyncError;
    use crate::sheet::Snapshot;
    use sheetsync_remote::{CellValue, InMemoryRemote, SheetLocation};

    fn snapshot() -> Snapshot<InMemoryRemote> {
        let remote = InMemoryRemote::new();
        remote.seed(
            &SheetLocation::new("book", "ws"),
            &[&["a", "b"], &["1", "x"], &["2", "y"]],
        );
        Snapshot::load(remote, "book", "ws").unwrap()
    }

    #[test]
    fn test_second_session_fails_while_first_open() {
        let snapshot = snapshot();
        let first = snapshot.start_update().unwrap();
        let err = snapshot.start_update().unwrap_err();
        assert!(matches!(err, SheetSyncError::SessionAlreadyOpen));
        drop(first);
        // Guard released, a new session opens.
        assert!(snapshot.start_update().is_ok());
    }

    #[test]
    fn test_dropped_session_discards_edits() {
        let snapshot = snapshot();
        {
            let mut session = snapshot.start_update().unwrap();
            session.table_mut().set(0, "b", "edited");
        }
        assert_eq!(snapshot.table().get(0, "b"), CellValue::text("x"));
    }

    #[test]
    fn test_update_closure_error_aborts_and_releases_guard() {
        let snapshot = snapshot();
        let result = snapshot.update(|table| {
            table.set(0, "b", "edited");
            Err(SheetSyncError::EmptySheet)
        });
        assert!(matches!(result, Err(SheetSyncError::EmptySheet)));
        assert_eq!(snapshot.table().get(0, "b"), CellValue::text("x"));
        assert!(snapshot.start_update().is_ok());
    }

    #[test]
    fn test_commit_merges_working_copy() {
        let snapshot = snapshot();
        let mut session = snapshot.start_update().unwrap();
        session.table_mut().set(1, "b", "z");
        session.commit().unwrap();
        assert_eq!(snapshot.table().get(1, "b"), CellValue::text("z"));
    }
}
