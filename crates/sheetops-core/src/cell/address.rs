//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Separator between the two corners of a range string
pub const RANGE_SEPARATOR: char = ':';

/// A cell address (e.g., "A1", "AA10")
///
/// Both coordinates are 1-based, matching how spreadsheets display them:
/// `A1` is `row = 1, col = 1`. Column letters are bijective base-26
/// (A=1 ... Z=26, AA=27), so there is no letter for zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1, B=2, ..., XFD=16384)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address from 1-based row and column numbers
    pub fn new(row: u32, col: u32) -> Self {
        debug_assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Letters are case-insensitive. The row part must not be zero and must
    /// not carry leading zeros.
    ///
    /// # Examples
    /// ```
    /// use sheetops_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("b3").unwrap();
    /// assert_eq!(addr.row, 3);
    /// assert_eq!(addr.col, 2);
    /// assert_eq!(addr.to_string(), "B3");
    ///
    /// assert!(CellAddress::parse("A01").is_err());
    /// assert!(CellAddress::parse("3B").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "unexpected characters after row number in '{}'",
                s
            )));
        }
        if digits.starts_with('0') {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 without leading zeros in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(letters)?;
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self {
            row: row as u32,
            col,
        })
    }

    /// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut letters = Vec::new();
        let mut n = col;

        while n > 0 {
            let remainder = (n - 1) % 26;
            letters.push(b'A' + remainder as u8);
            n = (n - 1) / 26;
        }

        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }

    /// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
            }
        }

        Ok(col as u32)
    }

    /// Translate this address by a number of rows and columns
    ///
    /// Fails when the result falls past the spreadsheet limits.
    pub fn offset(&self, rows: u32, cols: u32) -> Result<Self> {
        let row = self.row as u64 + rows as u64;
        let col = self.col as u64 + cols as u64;
        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }
        if col > MAX_COLS as u64 {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
        Ok(Self {
            row: row as u32,
            col: col as u32,
        })
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CellAddress> for String {
    fn from(addr: CellAddress) -> Self {
        addr.to_a1_string()
    }
}

/// A rectangular range of cells (e.g., "A1:B10")
///
/// Always normalized: `start` is the top-left corner and `end` the
/// bottom-right one, whatever order the corners were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalizing corner order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from 1-based row/column numbers
    pub fn from_indices(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from `start:end` notation
    ///
    /// Both components are required, so `"B2:B2"` is the single-cell form.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(RANGE_SEPARATOR).map(str::trim).collect();

        match parts.as_slice() {
            [start, end] if !start.is_empty() && !end.is_empty() => {
                let start = CellAddress::parse(start)?;
                let end = CellAddress::parse(end)?;
                Ok(Self::new(start, end))
            }
            [_] => Err(Error::InvalidRangeFormat(format!(
                "missing '{}' separator in '{}'",
                RANGE_SEPARATOR, s
            ))),
            _ => Err(Error::InvalidRangeFormat(format!(
                "expected exactly two non-empty cells in '{}'",
                s
            ))),
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Check if another range lies entirely within this one
    pub fn covers(&self, other: &CellRange) -> bool {
        self.contains(&other.start) && self.contains(&other.end)
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Get the intersection of two ranges, if any
    pub fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        if !self.overlaps(other) {
            return None;
        }

        Some(CellRange::from_indices(
            self.start.row.max(other.start.row),
            self.start.col.max(other.start.col),
            self.end.row.min(other.end.row),
            self.end.col.min(other.end.col),
        ))
    }

    /// The range with the same shape whose top-left corner is `top_left`
    pub fn with_top_left(&self, top_left: CellAddress) -> Result<CellRange> {
        let end = top_left.offset(self.row_count() - 1, self.col_count() - 1)?;
        Ok(CellRange {
            start: top_left,
            end,
        })
    }

    /// Format as A1:B10 string (single cells keep both corners, e.g. "B2:B2")
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}{}",
            self.start.to_a1_string(),
            RANGE_SEPARATOR,
            self.end.to_a1_string()
        )
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellRange {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CellRange> for String {
    fn from(range: CellRange) -> Self {
        range.to_a1_string()
    }
}
