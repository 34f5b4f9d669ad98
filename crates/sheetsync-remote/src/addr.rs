//! Sheet cell addressing.
//!
//! Zero-indexed (row, col) coordinates that render as spreadsheet-style
//! cell references (e.g., "A1", "B2", "AA100"), plus the translation
//! between the normalized data space (row 0 = first data row) and the
//! sheet space (row 0 = header row).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of header rows preceding the data rows on the remote sheet.
pub const HEADER_ROWS: usize = 1;

/// A cell position in sheet space, 0-indexed (row 0 is the header row).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> CellCoord {
        CellCoord { row, col }
    }

    /// Translate a normalized data-space position (row 0 = first data row)
    /// into sheet space by applying the header-row offset.
    pub fn from_data(data_row: usize, col: usize) -> CellCoord {
        CellCoord {
            row: data_row + HEADER_ROWS,
            col,
        }
    }

    /// The data-space row this coordinate addresses, or `None` for a
    /// header-row coordinate.
    pub fn data_row(&self) -> Option<usize> {
        self.row.checked_sub(HEADER_ROWS)
    }

    /// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z,
    /// 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellCoord::col_to_letters(self.col), self.row + 1)
    }
}
