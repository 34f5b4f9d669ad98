//! sheetsync-remote - accessor seam for the remote spreadsheet service.
//!
//! This crate owns everything that touches the remote coordinate system:
//!
//! - [`CellValue`] - scalar cell content and transport coercion
//! - [`CellCoord`] - A1 notation <-> zero-based (row, col) conversion
//! - [`RemoteTable`] - the read-range / batch-write-range capability
//! - [`InMemoryRemote`] - in-memory accessor for tests and demos

pub mod accessor;
pub mod addr;
pub mod memory;
pub mod value;

pub use accessor::{CellWrite, RemoteError, RemoteTable, SheetLocation};
pub use addr::{CellCoord, HEADER_ROWS};
pub use memory::InMemoryRemote;
pub use value::CellValue;
