//! # sheetops-core
//!
//! Cell addressing, range resolution and structural range operations.
//!
//! This crate provides:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and normalized ranges
//! - [`CellValue`] - Typed cell values (text, number, date, boolean, empty)
//! - [`Worksheet`], [`Workbook`] - The in-memory document the engine mutates
//! - [`resolve`] - Turning address strings into validated ranges
//! - [`ops`] - Merge, unmerge, copy, move, clear and delete-with-shift
//! - [`filter`] - Header-driven row selection
//!
//! ## Example
//!
//! ```rust
//! use sheetops_core::{resolve, ShiftDirection, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Name").unwrap();
//! sheet.set_cell_value("A2", "Ada").unwrap();
//! sheet.set_cell_value("A3", "Grace").unwrap();
//!
//! let range = resolve::resolve("A2", None).unwrap();
//! sheet.delete_range(&range, ShiftDirection::Up).unwrap();
//!
//! assert_eq!(sheet.get_value("A2").unwrap().as_string(), Some("Grace"));
//! ```

pub mod cell;
pub mod error;
pub mod filter;
pub mod ops;
pub mod resolve;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellValue, Extent};
pub use error::{Error, Result};
pub use filter::{filter_rows, FilterMode, FilteredRows};
pub use ops::ShiftDirection;
pub use resolve::RangeInfo;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
