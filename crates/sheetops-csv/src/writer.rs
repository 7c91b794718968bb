//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use sheetops_core::Worksheet;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a worksheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        worksheet: &Worksheet,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path.as_ref())?;
        Self::write(worksheet, file, options)?;
        tracing::debug!(path = %path.as_ref().display(), sheet = worksheet.name(), "wrote csv");
        Ok(())
    }

    /// Write a worksheet to a writer
    ///
    /// Rows run from `A1` to the sheet's extent; empty cells become empty
    /// fields. Merge state is not representable and is dropped.
    pub fn write<W: Write>(
        worksheet: &Worksheet,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(true)
            .from_writer(writer);

        if let Some(range) = worksheet.extent().as_range() {
            for row in worksheet.read_range(&range)? {
                csv_writer.write_record(row.iter().map(|value| value.to_string()))?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_to_extent() {
        let mut ws = Worksheet::new("Out");
        ws.set_cell_value("B1", "x,y").unwrap();
        ws.set_cell_value("A2", 2).unwrap();
        ws.set_cell_value("C2", 1.5).unwrap();

        let mut buf = Vec::new();
        CsvWriter::write(&ws, &mut buf, &CsvWriteOptions::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), ",\"x,y\",\n2,,1.5\n");
    }

    #[test]
    fn test_write_empty_sheet() {
        let mut buf = Vec::new();
        CsvWriter::write(&Worksheet::new("Empty"), &mut buf, &CsvWriteOptions::default()).unwrap();
        assert!(buf.is_empty());
    }
}
