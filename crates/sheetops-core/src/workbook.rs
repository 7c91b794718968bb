//! Workbook type - the ordered collection of worksheets

use crate::cell::{CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::resolve;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters a sheet name may not contain
const INVALID_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// A workbook (spreadsheet document)
///
/// Sheets are addressed by index or by their unique, case-sensitive name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workbook {
    /// Worksheets in display order
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a new workbook with one empty worksheet named "Sheet1"
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new("Sheet1")],
        }
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.worksheets
            .iter_mut()
            .find(|ws| ws.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Sheet names in display order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(Worksheet::name).collect()
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with a generated "SheetN" name
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = self.generate_sheet_name();
        self.add_worksheet_with_name(&name)
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Insert a new worksheet at a specific index
    pub fn insert_worksheet(&mut self, index: usize, name: &str) -> Result<()> {
        if index > self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(name)?;

        self.worksheets.insert(index, Worksheet::new(name));
        tracing::info!(sheet = name, index, "inserted worksheet");
        Ok(())
    }

    /// Add an existing worksheet to the end of the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        tracing::info!(sheet = worksheet.name(), index, "added worksheet");
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Remove a worksheet by name
    ///
    /// The last remaining sheet cannot be removed.
    pub fn remove_worksheet(&mut self, name: &str) -> Result<Worksheet> {
        let index = self.require_index(name)?;
        if self.worksheets.len() == 1 {
            return Err(Error::LastSheet);
        }

        let worksheet = self.worksheets.remove(index);
        tracing::info!(sheet = name, "removed worksheet");
        Ok(worksheet)
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let index = self.require_index(old_name)?;
        self.validate_sheet_name_excluding(new_name, Some(index))?;

        self.worksheets[index].set_name(new_name);
        tracing::info!(from = old_name, to = new_name, "renamed worksheet");
        Ok(())
    }

    /// Append a copy of a worksheet under a new name
    ///
    /// Values, extent and merged regions are all copied. Returns the index
    /// of the new sheet.
    pub fn copy_worksheet(&mut self, source: &str, new_name: &str) -> Result<usize> {
        let mut copy = self.worksheet_by_name(source)?.clone();
        copy.set_name(new_name);
        self.add_existing_worksheet(copy)
    }

    /// Move a worksheet to a new position
    ///
    /// `index` is the sheet's position after the move and must be in
    /// `0..sheet_count()`.
    pub fn move_worksheet(&mut self, name: &str, index: usize) -> Result<()> {
        let from = self.require_index(name)?;
        let last = self.worksheets.len() - 1;
        if index > last {
            return Err(Error::SheetOutOfBounds(index, last));
        }

        let worksheet = self.worksheets.remove(from);
        self.worksheets.insert(index, worksheet);
        tracing::info!(sheet = name, from, to = index, "moved worksheet");
        Ok(())
    }

    /// Copy a range of one sheet into another sheet
    ///
    /// The source is read in full before the target is written, so copying
    /// within a single sheet behaves like [`Worksheet::copy_range`]. Returns
    /// the target range.
    pub fn copy_range_between(
        &mut self,
        source_sheet: &str,
        source: &CellRange,
        target_sheet: &str,
        target_top_left: CellAddress,
    ) -> Result<CellRange> {
        if source_sheet == target_sheet {
            return self
                .worksheet_by_name_mut(source_sheet)?
                .copy_range(source, target_top_left);
        }

        let from = self.worksheet_by_name(source_sheet)?;
        resolve::validate_read(from, source)?;
        let target = source.with_top_left(target_top_left)?;
        resolve::validate_write(&target)?;
        let block = from.cells().snapshot(source);

        let to = self.worksheet_by_name_mut(target_sheet)?;
        resolve::validate_merged_write(to, &target)?;
        to.cells_mut().write_block(target.start, block);

        tracing::info!(
            from = source_sheet,
            to = target_sheet,
            %source,
            %target,
            "copied range between sheets"
        );
        Ok(target)
    }

    fn require_index(&self, name: &str) -> Result<usize> {
        self.sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))
    }

    /// Validate a sheet name
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        self.validate_sheet_name_excluding(name, None)
    }

    /// Validate a sheet name, optionally excluding a sheet from duplicate check
    fn validate_sheet_name_excluding(
        &self,
        name: &str,
        exclude_index: Option<usize>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }
        if let Some(c) = name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        // Names are unique, compared exactly
        let taken = self
            .worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude_index && ws.name() == name);
        if taken {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }

    /// Generate a unique sheet name
    fn generate_sheet_name(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{}", n);
            if self.sheet_index(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use pretty_assertions::assert_eq;

    fn workbook(names: &[&str]) -> Workbook {
        let mut wb = Workbook::empty();
        for name in names {
            wb.add_worksheet_with_name(name).unwrap();
        }
        wb
    }

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
        assert!(Workbook::empty().is_empty());
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();

        let idx = wb.add_worksheet().unwrap();
        assert_eq!(idx, 1);
        assert_eq!(wb.worksheet(1).unwrap().name(), "Sheet2");

        let idx = wb.add_worksheet_with_name("Data").unwrap();
        assert_eq!(idx, 2);

        wb.insert_worksheet(0, "First").unwrap();
        assert_eq!(wb.sheet_names(), vec!["First", "Sheet1", "Sheet2", "Data"]);
        assert_eq!(
            wb.insert_worksheet(9, "Late"),
            Err(Error::SheetOutOfBounds(9, 4))
        );
    }

    #[test]
    fn test_duplicate_name_is_case_sensitive() {
        let mut wb = Workbook::new();
        assert_eq!(
            wb.add_worksheet_with_name("Sheet1"),
            Err(Error::DuplicateSheetName("Sheet1".into()))
        );
        assert!(wb.add_worksheet_with_name("SHEET1").is_ok());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();

        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("Sheet/1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet:1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet[1]").is_err());
        assert!(wb.add_worksheet_with_name("Q?").is_err());

        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(matches!(
            wb.add_worksheet_with_name(&long_name),
            Err(Error::InvalidSheetName(_))
        ));
        assert!(wb
            .add_worksheet_with_name(&"A".repeat(MAX_SHEET_NAME_LEN))
            .is_ok());
    }

    #[test]
    fn test_remove_worksheet() {
        let mut wb = workbook(&["A", "B"]);
        assert_eq!(wb.remove_worksheet("A").unwrap().name(), "A");
        assert_eq!(wb.remove_worksheet("B"), Err(Error::LastSheet));
        assert_eq!(
            wb.remove_worksheet("Missing"),
            Err(Error::SheetNotFound("Missing".into()))
        );
        assert_eq!(wb.sheet_names(), vec!["B"]);
    }

    #[test]
    fn test_rename_worksheet() {
        let mut wb = workbook(&["A", "B"]);
        wb.rename_worksheet("A", "Inputs").unwrap();
        assert_eq!(wb.sheet_names(), vec!["Inputs", "B"]);

        // Renaming to its own name is allowed, to another sheet's is not
        assert!(wb.rename_worksheet("B", "B").is_ok());
        assert_eq!(
            wb.rename_worksheet("B", "Inputs"),
            Err(Error::DuplicateSheetName("Inputs".into()))
        );
        assert!(wb.rename_worksheet("Nope", "X").is_err());
    }

    #[test]
    fn test_copy_worksheet() {
        let mut wb = workbook(&["Data"]);
        {
            let ws = wb.worksheet_by_name_mut("Data").unwrap();
            ws.set_cell_value("B2", 7).unwrap();
            ws.merge_range(&CellRange::parse("C1:D1").unwrap()).unwrap();
        }

        let idx = wb.copy_worksheet("Data", "Data (2)").unwrap();
        assert_eq!(idx, 1);
        let copy = wb.worksheet(1).unwrap();
        assert_eq!(copy.get_value("B2").unwrap(), CellValue::Number(7.0));
        assert_eq!(copy.merged_regions().len(), 1);
        assert_eq!(copy.extent(), wb.worksheet(0).unwrap().extent());

        assert!(wb.copy_worksheet("Data", "Data (2)").is_err());
    }

    #[test]
    fn test_move_worksheet() {
        let mut wb = workbook(&["Sheet1", "A", "B", "C"]);

        wb.move_worksheet("C", 1).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "C", "A", "B"]);

        wb.move_worksheet("Sheet1", 3).unwrap();
        assert_eq!(wb.sheet_names(), vec!["C", "A", "B", "Sheet1"]);

        let err = wb.move_worksheet("A", 4).unwrap_err();
        assert_eq!(err, Error::SheetOutOfBounds(4, 3));
        assert_eq!(err.to_string(), "Invalid index 4. Must be between 0 and 3");
    }

    #[test]
    fn test_worksheet_by_name() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Data").unwrap();

        assert!(wb.worksheet_by_name("Data").is_ok());
        assert_eq!(
            wb.worksheet_by_name("data").unwrap_err(),
            Error::SheetNotFound("data".into())
        );
    }

    #[test]
    fn test_copy_range_between_sheets() {
        let mut wb = workbook(&["Src", "Dst"]);
        {
            let src = wb.worksheet_by_name_mut("Src").unwrap();
            src.set_cell_value("A1", "x").unwrap();
            src.set_cell_value("B2", 2).unwrap();
        }

        let target = wb
            .copy_range_between(
                "Src",
                &CellRange::parse("A1:B2").unwrap(),
                "Dst",
                CellAddress::parse("C3").unwrap(),
            )
            .unwrap();
        assert_eq!(target.to_string(), "C3:D4");

        let dst = wb.worksheet_by_name("Dst").unwrap();
        assert_eq!(dst.get_value("C3").unwrap(), CellValue::string("x"));
        assert_eq!(dst.get_value("D4").unwrap(), CellValue::Number(2.0));
        assert_eq!(dst.extent().rows, 4);

        // Source untouched
        let src = wb.worksheet_by_name("Src").unwrap();
        assert_eq!(src.get_value("A1").unwrap(), CellValue::string("x"));
    }

    #[test]
    fn test_copy_range_between_errors() {
        let mut wb = workbook(&["Src", "Dst"]);
        wb.worksheet_by_name_mut("Src")
            .unwrap()
            .set_cell_value("A1", 1)
            .unwrap();
        let range = CellRange::parse("A1:A2").unwrap();

        assert!(matches!(
            wb.copy_range_between("Src", &range, "Dst", CellAddress::new(1, 1)),
            Err(Error::RangeOutOfBounds { .. })
        ));
        assert_eq!(
            wb.copy_range_between(
                "Src",
                &CellRange::parse("A1:A1").unwrap(),
                "Nope",
                CellAddress::new(1, 1)
            ),
            Err(Error::SheetNotFound("Nope".into()))
        );
        assert!(wb.worksheet_by_name("Dst").unwrap().is_empty());

        wb.worksheet_by_name_mut("Dst")
            .unwrap()
            .merge_range(&CellRange::parse("B1:C2").unwrap())
            .unwrap();
        assert!(matches!(
            wb.copy_range_between(
                "Src",
                &CellRange::parse("A1:A1").unwrap(),
                "Dst",
                CellAddress::new(2, 3)
            ),
            Err(Error::OverlappingMerge { .. })
        ));
        assert!(wb.worksheet_by_name("Dst").unwrap().is_empty());
    }
}
