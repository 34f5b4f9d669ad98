//! Error types for sheetsync core.

use sheetsync_remote::RemoteError;
use thiserror::Error;

/// Errors that can occur while loading, editing, or reconciling a sheet.
#[derive(Error, Debug)]
pub enum SheetSyncError {
    #[error("remote error: {0}")]
    Remote(
        #[from]
        #[source]
        RemoteError,
    ),

    #[error("an update session is already open for this snapshot")]
    SessionAlreadyOpen,

    #[error("sheet is empty: no header row to interpret")]
    EmptySheet,

    #[error("duplicate column label: {0}")]
    DuplicateColumn(String),
}

pub type Result<T> = std::result::Result<T, SheetSyncError>;
