//! sheetsync-core - change-tracking layer over a remote spreadsheet.
//!
//! Load a worksheet into a [`Snapshot`], open a [`ChangeSession`] to get a
//! mutable working copy, and commit: only the cells that actually changed
//! are pushed back to the remote store in a single batch, and the snapshot
//! absorbs the working copy only after the batch is confirmed.

pub mod error;
pub mod sheet;
pub mod table;

pub use error::{Result, SheetSyncError};
pub use sheet::{ChangeSession, Diff, DiffEntry, Snapshot, diff_tables};
pub use table::{RowId, Table};

pub use sheetsync_remote::{
    CellCoord, CellValue, CellWrite, InMemoryRemote, RemoteError, RemoteTable, SheetLocation,
};
