//! Scalar cell values and remote-transport coercion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell's content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Empty-cell sentinel. Reads of unset cells yield `Blank`.
    #[default]
    Blank,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Interpret a raw string coming off the remote transport.
    ///
    /// Some transport configurations return every cell as a string, so
    /// typed values are recovered here:
    /// - empty string -> `Blank`
    /// - `TRUE` / `FALSE` (any case) -> `Bool`
    /// - numeric strings -> `Number` (unless they have leading zeros like
    ///   "007", which stay `Text` so identifier-like data round-trips)
    /// - anything else -> `Text`
    pub fn from_remote(field: &str) -> CellValue {
        if field.is_empty() {
            return CellValue::Blank;
        }
        if field.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if field.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }

        // Keep explicit surrounding whitespace exactly as text.
        let trimmed = field.trim();
        if field != trimmed {
            return CellValue::Text(field.to_string());
        }

        // Preserve strings that look like numbers but have leading zeros
        // (e.g., "007") unless they're just "0" or start with "0."
        if trimmed.starts_with('0')
            && trimmed.len() > 1
            && !trimmed.starts_with("0.")
            && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            return CellValue::Text(trimmed.to_string());
        }

        // parse::<f64> accepts "NaN", "inf" and "infinity"; those stay
        // text so a `Number` is always finite after coercion.
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }

        CellValue::Text(field.to_string())
    }

    /// Re-run transport coercion on text values so that a value which went
    /// through the remote store compares equal to the typed value it came
    /// from ("123" vs 123).
    fn normalized(&self) -> CellValue {
        match self {
            CellValue::Text(s) => CellValue::from_remote(s),
            other => other.clone(),
        }
    }

    /// Equality under transport normalization. `Blank` equals `Blank` and
    /// the empty string, nothing else. Two NaN numbers compare equal so a
    /// cell holding NaN is not reported as changed on every comparison.
    pub fn loose_eq(&self, other: &CellValue) -> bool {
        if let (CellValue::Number(a), CellValue::Number(b)) = (self, other) {
            return a == b || (a.is_nan() && b.is_nan());
        }
        if self == other {
            return true;
        }
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for CellValue {
    /// Renders the value the way it is written to the remote store.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
            CellValue::Blank => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> CellValue {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> CellValue {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> CellValue {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> CellValue {
        CellValue::Bool(b)
    }
}
