//! # sheetops
//!
//! Workbook storage and tool-level operations for the sheetops engine.
//!
//! - [`WorkbookStore`] - loads and atomically saves workbooks in a folder
//!   (`.json` for whole workbooks, `.csv` for a single sheet) and serializes
//!   load-mutate-save cycles per file
//! - [`SheetService`] - one method per [`Tool`], each returning a uniform
//!   [`Response`]
//! - [`audit`] - structured events for completed mutations
//!
//! ## Example
//!
//! ```rust
//! use sheetops::{SheetService, StoreConfig};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let service = SheetService::from_config(StoreConfig::new(dir.path()));
//!
//! assert!(service.create_workbook("sales.json", None).success);
//! let rows = vec![
//!     vec![json!("Name"), json!("Revenue")],
//!     vec![json!("A"), json!(5)],
//!     vec![json!("B"), json!(15)],
//! ];
//! assert!(service.write_data("sales.json", "Sheet1", &rows, None).success);
//!
//! let found = service.filter_rows(
//!     "sales.json",
//!     "Sheet1",
//!     &["Revenue".to_string()],
//!     &["15".to_string()],
//!     sheetops::FilterMode::All,
//! );
//! assert_eq!(found.data.unwrap()["rows"], json!([["B", 15]]));
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod prelude;
pub mod service;
pub mod store;

pub use config::{StoreConfig, DEFAULT_FOLDER, DEFAULT_TOOL_PREFIX};
pub use error::{Error, Result};
pub use service::{Response, SheetService, Tool};
pub use store::{Format, WorkbookStore};

// Re-export engine types
pub use sheetops_core::{
    filter_rows, CellAddress, CellRange, CellValue, Extent, FilterMode, FilteredRows, RangeInfo,
    ShiftDirection, Workbook, Worksheet, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use sheetops_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
