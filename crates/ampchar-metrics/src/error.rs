//! Error types for trace parsing and metric computation.

use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing traces or computing metrics.
#[derive(Debug, Error)]
pub enum Error {
    /// The table's column count matches none of the supported layouts.
    #[error("unexpected column count {found}, expected {expected}")]
    Layout {
        /// Columns found in the table.
        found: usize,
        /// Human-readable description of the supported layouts.
        expected: &'static str,
    },

    /// The table has too few rows for the metric's windowing.
    #[error("trace has {rows} rows, but at least {needed} are required")]
    TooFewRows {
        /// Rows found in the table.
        rows: usize,
        /// Minimum rows required.
        needed: usize,
    },

    /// The table contains no data rows after the header.
    #[error("trace contains no data rows")]
    EmptyTable,

    /// A data row could not be parsed as numbers.
    #[error("malformed value in data row {row}: {detail}")]
    Parse {
        /// 1-based data row index.
        row: usize,
        /// What went wrong.
        detail: String,
    },

    /// A data row has a different width than the first row.
    #[error("ragged table: data row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// 1-based data row index.
        row: usize,
        /// Columns found on this row.
        found: usize,
        /// Columns on the first data row.
        expected: usize,
    },

    /// The gain magnitude never falls to 0 dB, or the first qualifying
    /// sample has no predecessor to bracket the crossing.
    #[error("no unity-gain crossing found in frequency sweep")]
    NoUnityCrossing,

    /// IO error while reading a trace file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
