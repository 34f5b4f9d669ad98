//! The remote table capability: read a range, batch-write cells.

use crate::addr::CellCoord;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one worksheet of one spreadsheet on the remote service.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SheetLocation {
    /// Opaque spreadsheet identifier.
    pub spreadsheet: String,
    /// Worksheet name within the spreadsheet.
    pub worksheet: String,
}

impl SheetLocation {
    pub fn new(spreadsheet: impl Into<String>, worksheet: impl Into<String>) -> SheetLocation {
        SheetLocation {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.into(),
        }
    }
}

impl std::fmt::Display for SheetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.spreadsheet, self.worksheet)
    }
}

/// One cell destined for the remote store, in sheet coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellWrite {
    pub coord: CellCoord,
    pub value: CellValue,
}

impl CellWrite {
    pub fn new(coord: CellCoord, value: CellValue) -> CellWrite {
        CellWrite { coord, value }
    }

    /// A1 range string for this single-cell write.
    pub fn range(&self) -> String {
        self.coord.to_string()
    }
}

/// Errors surfaced by the remote accessor.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote service unavailable: {0}")]
    Unavailable(String),

    #[error("range not found: {location}")]
    RangeNotFound { location: SheetLocation },

    #[error("batch write failed: {reason} ({} cells unconfirmed)", failed.len())]
    WriteFailed {
        reason: String,
        /// Coordinates the remote could not confirm, when it reports them;
        /// the whole batch otherwise.
        failed: Vec<CellCoord>,
    },
}

/// Read-range / batch-write-range capability of the remote spreadsheet
/// service. Implementations own transport, auth, and retry concerns;
/// callers see normalized grids and single-round-trip batches.
pub trait RemoteTable {
    /// Fetch every cell of the addressed range as a rectangular grid
    /// (header row included).
    fn read_all(&self, location: &SheetLocation) -> Result<Vec<Vec<CellValue>>, RemoteError>;

    /// Apply all writes in one network round trip. Never called with an
    /// empty batch.
    fn write_cells(
        &self,
        location: &SheetLocation,
        writes: &[CellWrite],
    ) -> Result<(), RemoteError>;
}
