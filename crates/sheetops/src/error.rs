//! Error types for workbook storage and the tool layer

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, mutating or saving a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// Addressing, range or sheet error from the engine
    #[error(transparent)]
    Core(#[from] sheetops_core::Error),

    /// CSV read/write error
    #[error(transparent)]
    Csv(#[from] sheetops_csv::CsvError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook container (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Renaming the temporary file over the target failed
    #[error("Failed to save {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    /// `create` was asked for a file that already exists
    #[error("Workbook already exists: {}", .0.display())]
    WorkbookExists(PathBuf),

    /// The workbook file does not exist
    #[error("Workbook not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Filename escapes the workbook folder or is otherwise unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Extension is not a supported workbook format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Write payload without any values
    #[error("No data provided to write")]
    NoData,
}
