//! End-to-end scenarios against an in-memory workbook

use pretty_assertions::assert_eq;
use sheetops_core::ops::validate_range;
use sheetops_core::resolve::{resolve, resolve_range_string};
use sheetops_core::{
    filter_rows, CellAddress, CellRange, CellValue, Error, FilterMode, ShiftDirection, Workbook,
    Worksheet,
};

fn sales() -> Worksheet {
    let mut ws = Worksheet::new("Sales");
    ws.write_rows(
        CellAddress::new(1, 1),
        vec![
            vec!["Name".into(), "Revenue".into()],
            vec!["A".into(), 5.into()],
            vec!["B".into(), 15.into()],
            vec!["C".into(), 20.into()],
        ],
    )
    .unwrap();
    ws
}

/// Numeric predicates compare against numeric cells numerically
#[test]
fn filter_by_revenue() {
    let ws = sales();
    let result = filter_rows(&ws, &["Revenue"], &["15"], FilterMode::All).unwrap();
    assert_eq!(result.headers, vec!["Name", "Revenue"]);
    assert_eq!(
        result.rows,
        vec![vec![CellValue::string("B"), CellValue::Number(15.0)]]
    );
}

/// Range metrics for single-cell and multi-letter ranges
#[test]
fn range_metrics() {
    let mut ws = Worksheet::new("Wide");
    ws.set_cell_value("AB2", "edge").unwrap();

    let single = resolve_range_string("B2:B2").unwrap();
    assert_eq!((single.row_count(), single.col_count()), (1, 1));

    let info = validate_range(&ws, "AA1:AB2").unwrap();
    assert_eq!(info.num_cols, 2);
    let range = resolve_range_string("AA1:AB2").unwrap();
    assert_eq!((range.start.col, range.end.col), (27, 28));
}

/// Merge then unmerge leaves no merged region but keeps the cleared cells empty
#[test]
fn merge_unmerge_round_trip() {
    let mut ws = sales();
    let header = resolve("A1", Some("B1")).unwrap();

    ws.merge_range(&header).unwrap();
    ws.unmerge_range(&header).unwrap();
    assert!(ws.merged_regions().is_empty());
    assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("Name"));
    assert_eq!(ws.get_value("B1").unwrap(), CellValue::Empty);

    // Mergeable again
    ws.merge_range(&header).unwrap();
    assert_eq!(ws.merged_regions(), &[header]);
}

/// Deleting rows keeps the row above and pulls the row below into place
#[test]
fn delete_rows_shifts_up() {
    let mut ws = sales();
    let above = ws.read_range(&resolve_range_string("A2:B2").unwrap()).unwrap();
    let below = ws.read_range(&resolve_range_string("A4:B4").unwrap()).unwrap();

    ws.delete_range(&resolve_range_string("A3:B3").unwrap(), ShiftDirection::Up)
        .unwrap();

    assert_eq!(ws.extent().rows, 3);
    assert_eq!(
        ws.read_range(&resolve_range_string("A2:B2").unwrap()).unwrap(),
        above
    );
    assert_eq!(
        ws.read_range(&resolve_range_string("A3:B3").unwrap()).unwrap(),
        below
    );
}

/// Failed operations leave the sheet exactly as it was
#[test]
fn failures_do_not_mutate() {
    let mut ws = sales();
    ws.merge_range(&resolve_range_string("A1:B1").unwrap()).unwrap();
    let before = ws.clone();

    assert!(matches!(
        ws.merge_range(&resolve_range_string("B1:C2").unwrap()),
        Err(Error::OverlappingMerge { .. })
    ));
    assert!(matches!(
        ws.unmerge_range(&resolve_range_string("A1:A1").unwrap()),
        Err(Error::RangeNotMerged(_))
    ));
    assert!(matches!(
        ws.copy_range(&resolve_range_string("A1:C9").unwrap(), CellAddress::new(1, 4)),
        Err(Error::RangeOutOfBounds { .. })
    ));
    assert!(matches!(
        ws.delete_range(&resolve_range_string("A5:A5").unwrap(), ShiftDirection::Left),
        Err(Error::RangeOutOfBounds { .. })
    ));
    assert!(matches!(
        "down".parse::<ShiftDirection>(),
        Err(Error::InvalidShiftDirection(_))
    ));
    assert!(matches!(
        filter_rows(&ws, &["Profit"], &["1"], FilterMode::All),
        Err(Error::ColumnNotFound(_))
    ));
    assert_eq!(ws, before);
}

/// Moving a block onto an overlapping target keeps the moved values intact
#[test]
fn move_overlapping_block() {
    let mut ws = sales();
    let source = resolve_range_string("A2:B4").unwrap();
    let expected = ws.read_range(&source).unwrap();

    let target = ws.move_range(&source, CellAddress::new(3, 2)).unwrap();
    assert_eq!(target, CellRange::from_indices(3, 2, 5, 3));
    assert_eq!(ws.read_range(&target).unwrap(), expected);

    // Uncovered source cells are cleared
    assert_eq!(ws.get_value("A2").unwrap(), CellValue::Empty);
    assert_eq!(ws.get_value("B2").unwrap(), CellValue::Empty);
    assert_eq!(ws.get_value("A3").unwrap(), CellValue::Empty);
}

/// Sheet management and cross-sheet copies through the workbook
#[test]
fn workbook_sheet_lifecycle() {
    let mut wb = Workbook::new();
    wb.add_existing_worksheet(sales()).unwrap();
    wb.add_worksheet_with_name("Report").unwrap();

    wb.copy_range_between(
        "Sales",
        &resolve_range_string("A1:B4").unwrap(),
        "Report",
        CellAddress::parse("B2").unwrap(),
    )
    .unwrap();
    let report = wb.worksheet_by_name("Report").unwrap();
    assert_eq!(report.get_value("C5").unwrap(), CellValue::Number(20.0));

    wb.move_worksheet("Report", 0).unwrap();
    wb.rename_worksheet("Sheet1", "Notes").unwrap();
    wb.remove_worksheet("Notes").unwrap();
    assert_eq!(wb.sheet_names(), vec!["Report", "Sales"]);
}
