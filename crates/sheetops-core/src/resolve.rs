//! Range resolution
//!
//! Turns caller-supplied address strings into normalized [`CellRange`]s and
//! checks them against a worksheet. Reads must stay inside the sheet's
//! current extent; writes may extend it up to the spreadsheet limits.

use crate::cell::{CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::{MAX_COLS, MAX_ROWS};

/// Summary of a validated range
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeInfo {
    /// Top-left cell, e.g. "A1"
    pub start_cell: String,
    /// Bottom-right cell, e.g. "B10"
    pub end_cell: String,
    /// Number of rows
    pub num_rows: u32,
    /// Number of columns
    pub num_cols: u32,
}

impl From<&CellRange> for RangeInfo {
    fn from(range: &CellRange) -> Self {
        Self {
            start_cell: range.start.to_a1_string(),
            end_cell: range.end.to_a1_string(),
            num_rows: range.row_count(),
            num_cols: range.col_count(),
        }
    }
}

/// Resolve a start cell and an optional end cell into a range
///
/// Without an end cell the range is the single start cell. The corners may
/// come in any order.
pub fn resolve(start: &str, end: Option<&str>) -> Result<CellRange> {
    let start = CellAddress::parse(start)?;
    let range = match end {
        Some(end) => CellRange::new(start, CellAddress::parse(end)?),
        None => CellRange::single(start),
    };
    tracing::trace!(%range, "resolved range");
    Ok(range)
}

/// Resolve a `start:end` range string
pub fn resolve_range_string(range_str: &str) -> Result<CellRange> {
    let range = CellRange::parse(range_str)?;
    tracing::trace!(input = range_str, %range, "resolved range string");
    Ok(range)
}

/// Check that a range only reads cells inside the sheet's current extent
pub fn validate_read(sheet: &Worksheet, range: &CellRange) -> Result<()> {
    let extent = sheet.extent();
    if range.end.row > extent.rows || range.end.col > extent.cols {
        return Err(Error::RangeOutOfBounds {
            range: range.to_a1_string(),
            max_row: extent.rows,
            max_col: extent.cols,
        });
    }
    Ok(())
}

/// Check that a range can be written (it may grow the sheet up to the limits)
pub fn validate_write(range: &CellRange) -> Result<()> {
    if range.end.row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(range.end.row as u64, MAX_ROWS));
    }
    if range.end.col > MAX_COLS {
        return Err(Error::ColumnOutOfBounds(range.end.col as u64, MAX_COLS));
    }
    Ok(())
}

/// Check that writing `target` leaves merged regions intact
///
/// Only the top-left cell of a merged region holds a value, so a write may
/// touch that cell but none of the cells the region covers.
pub fn validate_merged_write(sheet: &Worksheet, target: &CellRange) -> Result<()> {
    let covered = sheet.merged_regions().iter().find(|merged| {
        target
            .intersect(merged)
            .map_or(false, |hit| hit != CellRange::single(merged.start))
    });

    match covered {
        Some(merged) => Err(Error::OverlappingMerge {
            range: target.to_a1_string(),
            existing: merged.to_a1_string(),
        }),
        None => Ok(()),
    }
}

/// Resolve and validate a range string without touching the sheet
pub fn validate_range(sheet: &Worksheet, range_str: &str) -> Result<RangeInfo> {
    let range = resolve_range_string(range_str)?;
    validate_read(sheet, &range)?;
    Ok(RangeInfo::from(&range))
}
