//! CSV options

/// Options for reading CSV files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Keep the first row as text instead of inferring types
    pub has_header: bool,
    /// Infer numbers, booleans and dates from field text
    pub auto_detect_types: bool,
    /// Name of the worksheet the rows are read into
    pub sheet_name: String,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            auto_detect_types: true,
            sheet_name: "Sheet1".into(),
        }
    }
}

/// Options for writing CSV files
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
