//! Error types for sheetops-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving addresses or operating on ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed cell reference
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Malformed "start:end" range string
    #[error("Invalid range format: {0}")]
    InvalidRangeFormat(String),

    /// Read range reaches past the sheet's current extent
    #[error("Range {range} out of bounds (sheet extent: {max_row} rows, {max_col} columns)")]
    RangeOutOfBounds {
        range: String,
        max_row: u32,
        max_col: u32,
    },

    /// Row index past the spreadsheet limit
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u64, u32),

    /// Column index past the spreadsheet limit
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u64, u32),

    /// Sheet not found by name
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// Duplicate sheet name
    #[error("Sheet '{0}' already exists")]
    DuplicateSheetName(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Sheet index out of bounds
    #[error("Invalid index {0}. Must be between 0 and {1}")]
    SheetOutOfBounds(usize, usize),

    /// Removing the only sheet of a workbook
    #[error("Cannot delete the only sheet in workbook")]
    LastSheet,

    /// Merge intersects an existing merged region
    #[error("Range {range} overlaps merged range {existing}")]
    OverlappingMerge { range: String, existing: String },

    /// Unmerge of a range that is not exactly a merged region
    #[error("Range '{0}' is not merged")]
    RangeNotMerged(String),

    /// Delete shift that is neither "up" nor "left"
    #[error("Invalid shift direction: {0}. Must be 'up' or 'left'")]
    InvalidShiftDirection(String),

    /// Filter references a header that does not exist
    #[error("Column '{0}' not found in header row")]
    ColumnNotFound(String),

    /// Filter columns and values do not pair up
    #[error("Expected one value per column (got {columns} columns and {values} values)")]
    PredicateMismatch { columns: usize, values: usize },
}
