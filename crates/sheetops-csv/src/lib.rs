//! # sheetops-csv
//!
//! CSV reader and writer for a single sheetops worksheet.
//!
//! Cells are written from `A1` to the sheet's extent so that a file read
//! back lands every value on the address it was saved from.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
