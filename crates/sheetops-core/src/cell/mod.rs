//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`CellStorage`] - Sparse grid plus extent and merged regions

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange, RANGE_SEPARATOR};
pub use storage::{CellStorage, Extent};
pub use value::CellValue;
