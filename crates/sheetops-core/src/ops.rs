//! Structural range operations
//!
//! Merge, unmerge, copy, move, clear and delete-with-shift on a single
//! worksheet. Every operation validates completely before its first write,
//! so a failed call leaves the sheet untouched. Block transformations read
//! the whole source block into a buffer before writing anything, which
//! keeps them correct when source and destination overlap.

use std::fmt;
use std::str::FromStr;

use crate::cell::{CellAddress, CellRange, Extent};
use crate::error::{Error, Result};
use crate::resolve;
use crate::worksheet::Worksheet;
use crate::{MAX_COLS, MAX_ROWS};

/// Direction remaining cells move after a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ShiftDirection {
    /// Cells below the deleted range move up
    #[default]
    Up,
    /// Cells right of the deleted range move left
    Left,
}

impl FromStr for ShiftDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(ShiftDirection::Up),
            "left" => Ok(ShiftDirection::Left),
            other => Err(Error::InvalidShiftDirection(other.to_string())),
        }
    }
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftDirection::Up => write!(f, "up"),
            ShiftDirection::Left => write!(f, "left"),
        }
    }
}

impl Worksheet {
    /// Merge a range of cells
    ///
    /// The top-left value is kept as the merged cell's value; every other
    /// cell in the range is cleared. Clearing is not undone by
    /// [`unmerge_range`](Self::unmerge_range).
    pub fn merge_range(&mut self, range: &CellRange) -> Result<()> {
        resolve::validate_write(range)?;
        if let Some(existing) = self.merged_regions().iter().find(|m| m.overlaps(range)) {
            return Err(Error::OverlappingMerge {
                range: range.to_a1_string(),
                existing: existing.to_a1_string(),
            });
        }

        let cells = self.cells_mut();
        for addr in cells.addresses_in(range) {
            if addr != range.start {
                cells.remove(addr.row, addr.col);
            }
        }
        cells.add_merged_region(*range);

        tracing::info!(sheet = %self.name(), %range, "merged range");
        Ok(())
    }

    /// Unmerge a merged region
    ///
    /// `range` must be exactly one of the sheet's merged regions.
    pub fn unmerge_range(&mut self, range: &CellRange) -> Result<()> {
        let index = self
            .merged_regions()
            .iter()
            .position(|m| m == range)
            .ok_or_else(|| Error::RangeNotMerged(range.to_a1_string()))?;

        self.cells_mut().remove_merged_region(index);

        tracing::info!(sheet = %self.name(), %range, "unmerged range");
        Ok(())
    }

    /// Copy the values of `source` so its top-left lands on `target_top_left`
    ///
    /// The source must lie within the sheet's extent; the target may extend
    /// it, but must not cover the non-top-left cells of a merged region.
    /// Merge state is not copied. Returns the target range.
    pub fn copy_range(
        &mut self,
        source: &CellRange,
        target_top_left: CellAddress,
    ) -> Result<CellRange> {
        resolve::validate_read(self, source)?;
        let target = source.with_top_left(target_top_left)?;
        resolve::validate_write(&target)?;
        resolve::validate_merged_write(self, &target)?;

        let block = self.cells().snapshot(source);
        self.cells_mut().write_block(target.start, block);

        tracing::info!(sheet = %self.name(), %source, %target, "copied range");
        Ok(target)
    }

    /// Move the values of `source` so its top-left lands on `target_top_left`
    ///
    /// Source cells that the target does not cover are cleared. The target
    /// follows the same rules as [`copy_range`](Self::copy_range). Returns
    /// the target range.
    pub fn move_range(
        &mut self,
        source: &CellRange,
        target_top_left: CellAddress,
    ) -> Result<CellRange> {
        resolve::validate_read(self, source)?;
        let target = source.with_top_left(target_top_left)?;
        resolve::validate_write(&target)?;
        resolve::validate_merged_write(self, &target)?;

        let block = self.cells().snapshot(source);
        let cells = self.cells_mut();
        for addr in cells.addresses_in(source) {
            if !target.contains(&addr) {
                cells.remove(addr.row, addr.col);
            }
        }
        cells.write_block(target.start, block);

        tracing::info!(sheet = %self.name(), %source, %target, "moved range");
        Ok(target)
    }

    /// Clear every cell of a range without shifting anything
    pub fn clear_range(&mut self, range: &CellRange) {
        self.cells_mut().clear_range(range);
        tracing::debug!(sheet = %self.name(), %range, "cleared range");
    }

    /// Delete a range and shift the neighbouring cells into its place
    ///
    /// With [`ShiftDirection::Up`] the cells below the range, within its
    /// column span, move up by `row_count` rows and the row extent shrinks
    /// by the same amount. [`ShiftDirection::Left`] is the column analogue.
    /// Values outside the shifted band stay where they are and keep the
    /// extent from shrinking past them.
    ///
    /// Merged regions overlapping the deleted range are dropped. Those lying
    /// wholly inside the shifted band move with it, including regions past
    /// the extent, and those straddling the band's edge are dropped.
    pub fn delete_range(&mut self, range: &CellRange, shift: ShiftDirection) -> Result<()> {
        resolve::validate_read(self, range)?;
        let extent = self.extent();

        // `affected` is the deleted range plus the band that shifts into it;
        // `zone` is the same strip running on to the sheet limits
        let (band, affected, zone, shrunk) = match shift {
            ShiftDirection::Up => {
                let band = (range.end.row < extent.rows).then(|| {
                    CellRange::from_indices(
                        range.end.row + 1,
                        range.start.col,
                        extent.rows,
                        range.end.col,
                    )
                });
                let affected = CellRange::from_indices(
                    range.start.row,
                    range.start.col,
                    extent.rows,
                    range.end.col,
                );
                let zone = CellRange::from_indices(
                    range.start.row,
                    range.start.col,
                    MAX_ROWS,
                    range.end.col,
                );
                let shrunk = Extent {
                    rows: extent.rows - range.row_count(),
                    cols: extent.cols,
                };
                (band, affected, zone, shrunk)
            }
            ShiftDirection::Left => {
                let band = (range.end.col < extent.cols).then(|| {
                    CellRange::from_indices(
                        range.start.row,
                        range.end.col + 1,
                        range.end.row,
                        extent.cols,
                    )
                });
                let affected = CellRange::from_indices(
                    range.start.row,
                    range.start.col,
                    range.end.row,
                    extent.cols,
                );
                let zone = CellRange::from_indices(
                    range.start.row,
                    range.start.col,
                    range.end.row,
                    MAX_COLS,
                );
                let shrunk = Extent {
                    rows: extent.rows,
                    cols: extent.cols - range.col_count(),
                };
                (band, affected, zone, shrunk)
            }
        };

        let block = band.map(|band| self.cells().snapshot(&band));
        let cells = self.cells_mut();
        cells.clear_range(&affected);
        if let Some(block) = block {
            cells.write_block(range.start, block);
        }

        let new_extent = match cells.used_bounds() {
            Some((_, _, max_row, max_col)) => Extent {
                rows: shrunk.rows.max(max_row),
                cols: shrunk.cols.max(max_col),
            },
            None => shrunk,
        };
        cells.set_extent(new_extent);

        let regions = self
            .merged_regions()
            .iter()
            .filter_map(|m| shift_merged_region(m, range, &zone, shift))
            .collect();
        self.cells_mut().set_merged_regions(regions);

        tracing::info!(sheet = %self.name(), %range, %shift, "deleted range");
        Ok(())
    }
}

/// Where a merged region ends up after `deleted` is removed, if it survives
fn shift_merged_region(
    region: &CellRange,
    deleted: &CellRange,
    zone: &CellRange,
    shift: ShiftDirection,
) -> Option<CellRange> {
    if region.overlaps(deleted) {
        return None;
    }
    if !region.overlaps(zone) {
        return Some(*region);
    }
    if !zone.covers(region) {
        return None;
    }

    let shifted = match shift {
        ShiftDirection::Up => {
            let n = deleted.row_count();
            CellRange::from_indices(
                region.start.row - n,
                region.start.col,
                region.end.row - n,
                region.end.col,
            )
        }
        ShiftDirection::Left => {
            let n = deleted.col_count();
            CellRange::from_indices(
                region.start.row,
                region.start.col - n,
                region.end.row,
                region.end.col - n,
            )
        }
    };
    Some(shifted)
}

/// Resolve, validate and describe a range string (no mutation)
pub fn validate_range(sheet: &Worksheet, range_str: &str) -> Result<resolve::RangeInfo> {
    resolve::validate_range(sheet, range_str)
}
