//! Cell storage implementation
//!
//! Sparse storage for worksheet cells. Only non-empty cells are stored,
//! using a row-based BTreeMap structure. The sheet extent (highest row and
//! column ever written) is tracked alongside so bounds checks never have to
//! scan the keys.

use std::collections::BTreeMap;

use super::{CellAddress, CellRange, CellValue};

/// Addressable size of a worksheet
///
/// `rows` and `cols` are the highest row and column that have been written.
/// Writes grow the extent; clearing cells does not shrink it, only a
/// delete-with-shift does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    /// Highest written row (0 when the sheet was never written)
    pub rows: u32,
    /// Highest written column (0 when the sheet was never written)
    pub cols: u32,
}

impl Extent {
    /// Check whether nothing was ever written
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// The range `A1` to the extent's bottom-right corner
    pub fn as_range(&self) -> Option<CellRange> {
        if self.is_empty() {
            None
        } else {
            Some(CellRange::from_indices(1, 1, self.rows, self.cols))
        }
    }

    fn include(&mut self, row: u32, col: u32) {
        self.rows = self.rows.max(row);
        self.cols = self.cols.max(col);
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row, BTreeMap<col, CellValue>>`, 1-based keys.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellStorage {
    /// Row number → column map
    rows: BTreeMap<u32, BTreeMap<u32, CellValue>>,

    /// Highest written row/column
    extent: Extent,

    /// Merged cell regions
    merged_regions: Vec<CellRange>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell value
    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Set a cell value, growing the extent
    ///
    /// Empty values are not stored; writing one removes the cell.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        self.extent.include(row, col);

        if value.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, value);
        }
    }

    /// Remove a cell (the extent is left unchanged)
    pub fn remove(&mut self, row: u32, col: u32) -> Option<CellValue> {
        let row_map = self.rows.get_mut(&row)?;
        let result = row_map.remove(&col);

        // Clean up empty rows
        if row_map.is_empty() {
            self.rows.remove(&row);
        }

        result
    }

    /// Addresses of stored (non-empty) cells inside a range
    pub fn addresses_in(&self, range: &CellRange) -> Vec<CellAddress> {
        self.rows
            .range(range.start.row..=range.end.row)
            .flat_map(|(&row, cols)| {
                cols.range(range.start.col..=range.end.col)
                    .map(move |(&col, _)| CellAddress::new(row, col))
            })
            .collect()
    }

    /// Remove every stored cell inside a range
    pub fn clear_range(&mut self, range: &CellRange) {
        for addr in self.addresses_in(range) {
            self.remove(addr.row, addr.col);
        }
    }

    /// Read every value of a range into a row-major buffer
    pub fn snapshot(&self, range: &CellRange) -> Vec<Vec<CellValue>> {
        (range.start.row..=range.end.row)
            .map(|row| {
                (range.start.col..=range.end.col)
                    .map(|col| self.get(row, col).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Write a row-major buffer with its top-left value at `top_left`
    pub fn write_block(&mut self, top_left: CellAddress, block: Vec<Vec<CellValue>>) {
        for (dr, row_values) in block.into_iter().enumerate() {
            for (dc, value) in row_values.into_iter().enumerate() {
                self.set(top_left.row + dr as u32, top_left.col + dc as u32, value);
            }
        }
    }

    /// Get the current extent
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Replace the extent (used after shifting cells out of the sheet)
    pub(crate) fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage holds no values
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of stored (non-empty) cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u32::MAX;
        let mut max_col = 0u32;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    /// Add a merged region
    pub fn add_merged_region(&mut self, range: CellRange) {
        self.merged_regions.push(range);
    }

    /// Remove a merged region by index
    pub fn remove_merged_region(&mut self, index: usize) -> Option<CellRange> {
        if index < self.merged_regions.len() {
            Some(self.merged_regions.remove(index))
        } else {
            None
        }
    }

    /// Replace all merged regions
    pub(crate) fn set_merged_regions(&mut self, regions: Vec<CellRange>) {
        self.merged_regions = regions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_grows_extent() {
        let mut storage = CellStorage::new();
        assert!(storage.extent().is_empty());

        storage.set(3, 2, CellValue::Number(1.0));
        storage.set(1, 5, CellValue::string("x"));
        assert_eq!(storage.extent(), Extent { rows: 3, cols: 5 });

        // Removing does not shrink it
        storage.remove(3, 2);
        assert_eq!(storage.extent(), Extent { rows: 3, cols: 5 });
        assert_eq!(storage.cell_count(), 1);
    }

    #[test]
    fn test_empty_values_are_not_stored() {
        let mut storage = CellStorage::new();
        storage.set(1, 1, CellValue::Number(1.0));
        storage.set(1, 1, CellValue::Empty);
        assert!(storage.is_empty());
        assert_eq!(storage.extent(), Extent { rows: 1, cols: 1 });
    }

    #[test]
    fn test_snapshot_and_write_block() {
        let mut storage = CellStorage::new();
        storage.set(1, 1, CellValue::Number(1.0));
        storage.set(2, 2, CellValue::Number(4.0));

        let range = CellRange::from_indices(1, 1, 2, 2);
        let block = storage.snapshot(&range);
        assert_eq!(
            block,
            vec![
                vec![CellValue::Number(1.0), CellValue::Empty],
                vec![CellValue::Empty, CellValue::Number(4.0)],
            ]
        );

        storage.write_block(CellAddress::new(5, 3), block);
        assert_eq!(storage.get(5, 3), Some(&CellValue::Number(1.0)));
        assert_eq!(storage.get(6, 4), Some(&CellValue::Number(4.0)));
        assert_eq!(storage.extent(), Extent { rows: 6, cols: 4 });
    }

    #[test]
    fn test_used_bounds_and_addresses() {
        let mut storage = CellStorage::new();
        storage.set(2, 1, CellValue::Number(1.0));
        storage.set(7, 3, CellValue::Number(2.0));
        storage.set(4, 6, CellValue::Number(3.0));

        assert_eq!(storage.used_bounds(), Some((2, 1, 7, 6)));
        assert_eq!(
            storage.addresses_in(&CellRange::from_indices(1, 1, 5, 6)),
            vec![CellAddress::new(2, 1), CellAddress::new(4, 6)]
        );

        storage.clear_range(&CellRange::from_indices(1, 1, 5, 6));
        assert_eq!(storage.used_bounds(), Some((7, 3, 7, 3)));
        assert_eq!(storage.extent(), Extent { rows: 7, cols: 6 });
    }
}
