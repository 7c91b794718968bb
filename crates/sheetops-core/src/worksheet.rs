//! Worksheet type

use crate::cell::{CellAddress, CellRange, CellStorage, CellValue, Extent};
use crate::error::{Error, Result};
use crate::resolve;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    ///
    /// Name validation happens at the workbook level.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get cell value by address string (e.g. "A1"); missing cells are empty
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by 1-based row and column
    pub fn get_value_at(&self, row: u32, col: u32) -> CellValue {
        self.cells.get(row, col).cloned().unwrap_or_default()
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by 1-based row and column
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u32,
        value: V,
    ) -> Result<()> {
        self.validate_cell_position(row, col)?;
        resolve::validate_merged_write(self, &CellRange::from_indices(row, col, row, col))?;
        self.cells.set(row, col, value.into());
        Ok(())
    }

    /// Clear a cell
    pub fn clear_cell(&mut self, address: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.cells.remove(addr.row, addr.col);
        Ok(())
    }

    // === Range Access ===

    /// Current extent (highest written row and column)
    pub fn extent(&self) -> Extent {
        self.cells.extent()
    }

    /// Get the used range (bounds of all non-empty cells)
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                CellRange::from_indices(min_row, min_col, max_row, max_col)
            })
    }

    /// Read the values of a range as rows of cells
    ///
    /// The range must lie within the current extent.
    pub fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<CellValue>>> {
        resolve::validate_read(self, range)?;
        Ok(self.cells.snapshot(range))
    }

    /// Write rows of values with the first value at `start`
    ///
    /// Rows may have different lengths; missing trailing values are left
    /// untouched. Cells covered by a merged region, other than its top-left
    /// one, cannot be written. Returns the range covered by the widest row,
    /// or `None` when there was nothing to write.
    pub fn write_rows(
        &mut self,
        start: CellAddress,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Option<CellRange>> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Ok(None);
        }

        let end = start.offset(rows.len() as u32 - 1, width as u32 - 1)?;
        let target = CellRange::new(start, end);
        resolve::validate_merged_write(self, &target)?;
        self.cells.write_block(start, rows);

        tracing::debug!(sheet = %self.name, range = %target, "wrote rows");
        Ok(Some(target))
    }

    /// First row after the extent, where appended data starts
    pub fn next_append_row(&self) -> u32 {
        self.extent().rows + 1
    }

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        self.cells.merged_regions()
    }

    // === Internal ===

    /// Get cell storage (internal use)
    pub(crate) fn cells(&self) -> &CellStorage {
        &self.cells
    }

    /// Get mutable cell storage (internal use)
    pub(crate) fn cells_mut(&mut self) -> &mut CellStorage {
        &mut self.cells
    }

    /// Validate cell position against the spreadsheet limits
    fn validate_cell_position(&self, row: u32, col: u32) -> Result<()> {
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row as u64, MAX_ROWS));
        }
        if col == 0 || col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col as u64, MAX_COLS));
        }
        Ok(())
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet holds no values
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
