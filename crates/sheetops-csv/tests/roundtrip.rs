//! CSV files written and read back through the filesystem

use pretty_assertions::assert_eq;
use sheetops_core::{CellValue, Worksheet};
use sheetops_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, LineTerminator};
use tempfile::TempDir;

/// Values keep their addresses and inferred types across a save and load
#[test]
fn values_keep_their_addresses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.csv");

    let mut ws = Worksheet::new("Sheet1");
    ws.set_cell_value("A1", "Name").unwrap();
    ws.set_cell_value("B1", "Revenue").unwrap();
    ws.set_cell_value("A2", "B").unwrap();
    ws.set_cell_value("B2", 15).unwrap();
    ws.set_cell_value("C4", true).unwrap();

    CsvWriter::write_file(&ws, &path, &CsvWriteOptions::default()).unwrap();
    let loaded = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

    assert_eq!(loaded.get_value("B2").unwrap(), CellValue::Number(15.0));
    assert_eq!(loaded.get_value("C4").unwrap(), CellValue::Boolean(true));
    assert_eq!(loaded.get_value("C3").unwrap(), CellValue::Empty);
    assert_eq!(loaded.extent(), ws.extent());
    assert_eq!(loaded.used_range(), ws.used_range());
}

/// Header cells stay text even when they look like numbers
#[test]
fn header_row_is_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("years.csv");
    std::fs::write(&path, "2023,2024\r\n1,2\r\n").unwrap();

    let ws = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();
    assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("2023"));
    assert_eq!(ws.get_value("B2").unwrap(), CellValue::Number(2.0));

    let mut buf = Vec::new();
    let options = CsvWriteOptions {
        line_terminator: LineTerminator::CRLF,
        ..Default::default()
    };
    CsvWriter::write(&ws, &mut buf, &options).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "2023,2024\r\n1,2\r\n");
}

/// Missing files surface as IO errors
#[test]
fn missing_file() {
    let dir = TempDir::new().unwrap();
    let err = CsvReader::read_file(dir.path().join("nope.csv"), &CsvReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, sheetops_csv::CsvError::Io(_)));
}
