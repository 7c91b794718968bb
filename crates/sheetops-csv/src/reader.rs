//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sheetops_core::{CellValue, Worksheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read CSV file into a worksheet
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let file = File::open(path.as_ref())?;
        let worksheet = Self::read(file, options)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            cells = worksheet.cell_count(),
            "read csv"
        );
        Ok(worksheet)
    }

    /// Read CSV from a reader into a worksheet
    ///
    /// Every record becomes one row starting at `A1`; records may have
    /// different lengths.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(options.sheet_name.as_str());

        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = index as u32 + 1;
            let as_text = !options.auto_detect_types || (options.has_header && index == 0);

            for (col, field) in record.iter().enumerate() {
                let value = if as_text {
                    text_value(field)
                } else {
                    CellValue::infer(field)
                };
                worksheet.set_cell_value_at(row, col as u32 + 1, value)?;
            }
        }

        Ok(worksheet)
    }
}

fn text_value(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_infers_types_below_header() {
        let data = "Name,Revenue,Active\nA,5,true\nB,15.5,FALSE\n";
        let ws = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(ws.name(), "Sheet1");
        assert_eq!(ws.get_value("B1").unwrap(), CellValue::string("Revenue"));
        assert_eq!(ws.get_value("B2").unwrap(), CellValue::Number(5.0));
        assert_eq!(ws.get_value("B3").unwrap(), CellValue::Number(15.5));
        assert_eq!(ws.get_value("C3").unwrap(), CellValue::Boolean(false));
        assert_eq!(ws.get_value("C2").unwrap(), CellValue::string("true"));
        assert_eq!(ws.extent().rows, 3);
        assert_eq!(ws.extent().cols, 3);
    }

    #[test]
    fn test_read_ragged_rows_and_options() {
        let data = "1;2;3\n4\n";
        let options = CsvReadOptions {
            delimiter: b';',
            has_header: false,
            auto_detect_types: false,
            sheet_name: "Raw".into(),
            ..Default::default()
        };
        let ws = CsvReader::read(data.as_bytes(), &options).unwrap();

        assert_eq!(ws.name(), "Raw");
        assert_eq!(ws.get_value("C1").unwrap(), CellValue::string("3"));
        assert_eq!(ws.get_value("A2").unwrap(), CellValue::string("4"));
        assert_eq!(ws.get_value("B2").unwrap(), CellValue::Empty);
    }
}
