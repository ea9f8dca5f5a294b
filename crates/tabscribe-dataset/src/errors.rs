//! Dataset error types.

use thiserror::Error;

/// Errors raised while loading or querying the tabular dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A query named a column that is not part of the loaded table.
    ///
    /// The display string is the exact body text of the HTTP 400 response,
    /// so it names the requested column and enumerates what is available.
    #[error("Column '{column}' not found. Available: [{}]", .available.join(", "))]
    ColumnNotFound {
        /// The (already normalized) column the client asked for.
        column: String,
        /// All queryable column names, in table order.
        available: Vec<String>,
    },

    /// Two headers collapsed to the same name after trim + lowercase.
    #[error("duplicate column '{0}' after normalization")]
    DuplicateColumn(String),

    /// A header cell was empty (or whitespace-only) after trimming.
    #[error("empty header at column index {0}")]
    EmptyHeader(usize),

    /// The selected sheet has no rows at all (not even headers).
    #[error("sheet contains no rows")]
    EmptySheet,

    /// The workbook has no sheets to load.
    #[error("workbook contains no sheets")]
    NoSheets,

    /// A data row's width disagrees with the header row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        /// Zero-based data row index.
        row: usize,
        /// Header count.
        expected: usize,
        /// Cells found in the row.
        found: usize,
    },

    /// The underlying workbook could not be opened or parsed.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
