//! Prelude module - common imports for sheetops users
//!
//! ```rust
//! use sheetops::prelude::*;
//! ```

pub use crate::{
    CellAddress, CellRange, CellValue, FilterMode, Response, ShiftDirection, SheetService,
    StoreConfig, Workbook, WorkbookStore, Worksheet,
};
