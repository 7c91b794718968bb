//! Tool layer
//!
//! Every engine operation is exposed as a [`Tool`] with a stable external
//! name. [`SheetService`] runs a tool against a workbook file and renders
//! the outcome as a uniform [`Response`]: errors never escape, they become
//! `success: false` plus a message.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sheetops_core::error::Error as CoreError;
use sheetops_core::resolve::{self, RangeInfo};
use sheetops_core::{
    filter_rows, ops, CellAddress, CellRange, CellValue, FilterMode, ShiftDirection, Workbook,
    Worksheet,
};

use crate::audit;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::WorkbookStore;

/// Externally visible operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    CreateWorkbook,
    ListWorkbooks,
    GetWorkbookInfo,
    ReadData,
    WriteData,
    CreateWorksheet,
    DeleteWorksheet,
    RenameWorksheet,
    CopyWorksheet,
    MoveWorksheet,
    GetWorksheet,
    ListWorksheets,
    MergeRange,
    UnmergeRange,
    CopyRange,
    MoveRange,
    DeleteRange,
    ValidateRange,
    FilterRows,
}

impl Tool {
    /// Every tool, in registration order
    pub const ALL: [Tool; 19] = [
        Tool::CreateWorkbook,
        Tool::ListWorkbooks,
        Tool::GetWorkbookInfo,
        Tool::ReadData,
        Tool::WriteData,
        Tool::CreateWorksheet,
        Tool::DeleteWorksheet,
        Tool::RenameWorksheet,
        Tool::CopyWorksheet,
        Tool::MoveWorksheet,
        Tool::GetWorksheet,
        Tool::ListWorksheets,
        Tool::MergeRange,
        Tool::UnmergeRange,
        Tool::CopyRange,
        Tool::MoveRange,
        Tool::DeleteRange,
        Tool::ValidateRange,
        Tool::FilterRows,
    ];

    /// Stable name, without prefix
    pub fn name(self) -> &'static str {
        match self {
            Tool::CreateWorkbook => "create_workbook",
            Tool::ListWorkbooks => "list_workbooks",
            Tool::GetWorkbookInfo => "get_workbook_info",
            Tool::ReadData => "read_data",
            Tool::WriteData => "write_data",
            Tool::CreateWorksheet => "create_worksheet",
            Tool::DeleteWorksheet => "delete_worksheet",
            Tool::RenameWorksheet => "rename_worksheet",
            Tool::CopyWorksheet => "copy_worksheet",
            Tool::MoveWorksheet => "move_worksheet",
            Tool::GetWorksheet => "get_worksheet",
            Tool::ListWorksheets => "list_worksheets",
            Tool::MergeRange => "merge_range",
            Tool::UnmergeRange => "unmerge_range",
            Tool::CopyRange => "copy_range",
            Tool::MoveRange => "move_range",
            Tool::DeleteRange => "delete_range",
            Tool::ValidateRange => "validate_range",
            Tool::FilterRows => "filter_rows",
        }
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            Tool::CreateWorkbook => "Create a new workbook file with one empty sheet",
            Tool::ListWorkbooks => "List the workbook files in the folder",
            Tool::GetWorkbookInfo => "Describe the sheets of a workbook",
            Tool::ReadData => "Read cell values from a range",
            Tool::WriteData => "Write rows of values, appending when no start cell is given",
            Tool::CreateWorksheet => "Add a worksheet",
            Tool::DeleteWorksheet => "Delete a worksheet (never the last one)",
            Tool::RenameWorksheet => "Rename a worksheet",
            Tool::CopyWorksheet => "Copy a worksheet under a new name",
            Tool::MoveWorksheet => "Move a worksheet to a new position",
            Tool::GetWorksheet => "Describe one worksheet",
            Tool::ListWorksheets => "List the worksheet names",
            Tool::MergeRange => "Merge a range of cells",
            Tool::UnmergeRange => "Unmerge a previously merged range",
            Tool::CopyRange => "Copy a range to another location, optionally on another sheet",
            Tool::MoveRange => "Move a range to another location",
            Tool::DeleteRange => "Delete a range and shift cells up or left",
            Tool::ValidateRange => "Check that a range exists within the sheet",
            Tool::FilterRows => "Select rows by header column values",
        }
    }

    /// Name with the configured prefix applied
    pub fn qualified_name(self, prefix: &str) -> String {
        format!("{}{}", prefix, self.name())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform outcome of a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    /// Successful outcome
    pub fn ok<S: Into<String>>(message: S, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Failed outcome
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

type Outcome = Result<(String, Option<Value>)>;

/// Runs tools against the workbooks of a [`WorkbookStore`]
#[derive(Debug)]
pub struct SheetService {
    store: WorkbookStore,
}

impl SheetService {
    /// Create a service over an existing store
    pub fn new(store: WorkbookStore) -> Self {
        Self { store }
    }

    /// Create a service and its store from a configuration
    pub fn from_config(config: StoreConfig) -> Self {
        Self::new(WorkbookStore::new(config))
    }

    /// Get the underlying store
    pub fn store(&self) -> &WorkbookStore {
        &self.store
    }

    /// Qualified names of every tool
    pub fn tool_names(&self) -> Vec<String> {
        let prefix = &self.store.config().tool_prefix;
        Tool::ALL.iter().map(|t| t.qualified_name(prefix)).collect()
    }

    // === Workbooks ===

    /// Create a workbook file
    pub fn create_workbook(&self, filename: &str, sheet_name: Option<&str>) -> Response {
        self.run(Tool::CreateWorkbook, || {
            let sheet = sheet_name.unwrap_or("Sheet1");
            let path = self.store.create(filename, sheet)?;
            audit::record(Tool::CreateWorkbook.name(), filename, json!({ "sheet": sheet }));
            Ok((
                format!("Created workbook at {}", path.display()),
                Some(json!({ "path": path.display().to_string(), "sheet": sheet })),
            ))
        })
    }

    /// List the workbook files in the folder
    pub fn list_workbooks(&self) -> Response {
        self.run(Tool::ListWorkbooks, || {
            let files = self.store.list()?;
            Ok((
                format!("Found {} workbook(s)", files.len()),
                Some(json!({ "files": files })),
            ))
        })
    }

    /// Describe each sheet: name, position, used range, extent and merges
    pub fn get_workbook_info(&self, filename: &str) -> Response {
        self.run(Tool::GetWorkbookInfo, || {
            let workbook = self.store.load(filename)?;
            let sheets: Vec<Value> = workbook
                .worksheets()
                .enumerate()
                .map(|(index, ws)| sheet_summary(index, ws))
                .collect();
            Ok((
                format!("Workbook has {} sheet(s)", sheets.len()),
                Some(json!({ "file": filename, "sheets": sheets })),
            ))
        })
    }

    // === Data ===

    /// Read values from `start` (default `A1`) to `end`
    ///
    /// Without `end` the read runs to the sheet's extent; an empty sheet,
    /// or a start past the extent, yields no rows.
    pub fn read_data(
        &self,
        filename: &str,
        sheet: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Response {
        self.run(Tool::ReadData, || {
            let workbook = self.store.load(filename)?;
            let ws = workbook.worksheet_by_name(sheet)?;
            let start = start.unwrap_or("A1");

            let range = match end {
                Some(_) => Some(resolve::resolve(start, end)?),
                None => {
                    let start = CellAddress::parse(start)?;
                    let extent = ws.extent();
                    (start.row <= extent.rows && start.col <= extent.cols)
                        .then(|| CellRange::new(start, CellAddress::new(extent.rows, extent.cols)))
                }
            };
            let Some(range) = range else {
                return Ok((
                    "No data found in specified range".to_string(),
                    Some(json!({ "rows": [] })),
                ));
            };

            let rows: Vec<Vec<Value>> = ws
                .read_range(&range)?
                .iter()
                .map(|row| row.iter().map(cell_to_json).collect())
                .collect();
            Ok((
                format!("Read {} row(s) from {}", rows.len(), range),
                Some(json!({ "range": RangeInfo::from(&range), "rows": rows })),
            ))
        })
    }

    /// Write rows of JSON scalars starting at `start`
    ///
    /// Without `start` the rows are appended below the sheet's extent, in
    /// column A.
    pub fn write_data(
        &self,
        filename: &str,
        sheet: &str,
        rows: &[Vec<Value>],
        start: Option<&str>,
    ) -> Response {
        self.mutate(Tool::WriteData, filename, |workbook| {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            if width == 0 {
                return Err(Error::NoData);
            }

            let ws = workbook.worksheet_by_name_mut(sheet)?;
            let start = match start {
                Some(start) => CellAddress::parse(start)?,
                None => CellAddress::new(ws.next_append_row(), 1),
            };
            let end = start.offset(rows.len() as u32 - 1, width as u32 - 1)?;
            self.check_limits(&CellRange::new(start, end))?;

            let values = rows
                .iter()
                .map(|row| row.iter().map(json_to_cell).collect())
                .collect();
            let written = ws.write_rows(start, values)?.ok_or(Error::NoData)?;

            Ok((
                format!("Wrote {} row(s) to {} in sheet '{}'", rows.len(), written, sheet),
                json!({ "sheet": sheet, "range": RangeInfo::from(&written) }),
            ))
        })
    }

    // === Worksheets ===

    /// Add a worksheet at the end
    pub fn create_worksheet(&self, filename: &str, sheet: &str) -> Response {
        self.mutate(Tool::CreateWorksheet, filename, |workbook| {
            let index = workbook.add_worksheet_with_name(sheet)?;
            Ok((
                format!("Sheet '{}' created", sheet),
                json!({ "sheet": sheet, "index": index }),
            ))
        })
    }

    /// Delete a worksheet
    pub fn delete_worksheet(&self, filename: &str, sheet: &str) -> Response {
        self.mutate(Tool::DeleteWorksheet, filename, |workbook| {
            workbook.remove_worksheet(sheet)?;
            Ok((format!("Sheet '{}' deleted", sheet), json!({ "sheet": sheet })))
        })
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&self, filename: &str, old_name: &str, new_name: &str) -> Response {
        self.mutate(Tool::RenameWorksheet, filename, |workbook| {
            workbook.rename_worksheet(old_name, new_name)?;
            Ok((
                format!("Sheet '{}' renamed to '{}'", old_name, new_name),
                json!({ "from": old_name, "to": new_name }),
            ))
        })
    }

    /// Copy a worksheet under a new name
    pub fn copy_worksheet(&self, filename: &str, source: &str, new_name: &str) -> Response {
        self.mutate(Tool::CopyWorksheet, filename, |workbook| {
            let index = workbook.copy_worksheet(source, new_name)?;
            Ok((
                format!("Sheet '{}' copied to '{}'", source, new_name),
                json!({ "source": source, "sheet": new_name, "index": index }),
            ))
        })
    }

    /// Move a worksheet to position `index`
    pub fn move_worksheet(&self, filename: &str, sheet: &str, index: usize) -> Response {
        self.mutate(Tool::MoveWorksheet, filename, |workbook| {
            workbook.move_worksheet(sheet, index)?;
            Ok((
                format!("Sheet '{}' moved to position {}", sheet, index),
                json!({ "sheet": sheet, "index": index }),
            ))
        })
    }

    /// Describe one worksheet: position, used range, extent and merges
    pub fn get_worksheet(&self, filename: &str, sheet: &str) -> Response {
        self.run(Tool::GetWorksheet, || {
            let workbook = self.store.load(filename)?;
            let ws = workbook.worksheet_by_name(sheet)?;
            let index = workbook.sheet_index(sheet).unwrap_or_default();
            Ok((
                format!("Retrieved worksheet '{}'", sheet),
                Some(json!({ "sheet": sheet_summary(index, ws) })),
            ))
        })
    }

    /// List worksheet names in order
    pub fn list_worksheets(&self, filename: &str) -> Response {
        self.run(Tool::ListWorksheets, || {
            let workbook = self.store.load(filename)?;
            let names = workbook.sheet_names();
            Ok((
                format!("Found {} sheet(s)", names.len()),
                Some(json!({ "sheets": names })),
            ))
        })
    }

    // === Ranges ===

    /// Merge `start:end`
    pub fn merge_range(&self, filename: &str, sheet: &str, start: &str, end: &str) -> Response {
        self.mutate(Tool::MergeRange, filename, |workbook| {
            let range = resolve::resolve(start, Some(end))?;
            workbook.worksheet_by_name_mut(sheet)?.merge_range(&range)?;
            Ok((
                format!("Range '{}' merged in sheet '{}'", range, sheet),
                json!({ "sheet": sheet, "range": range.to_string() }),
            ))
        })
    }

    /// Unmerge `start:end` (must match a merged region exactly)
    pub fn unmerge_range(&self, filename: &str, sheet: &str, start: &str, end: &str) -> Response {
        self.mutate(Tool::UnmergeRange, filename, |workbook| {
            let range = resolve::resolve(start, Some(end))?;
            workbook.worksheet_by_name_mut(sheet)?.unmerge_range(&range)?;
            Ok((
                format!("Range '{}' unmerged in sheet '{}'", range, sheet),
                json!({ "sheet": sheet, "range": range.to_string() }),
            ))
        })
    }

    /// Copy `source_start:source_end` so it starts at `target_start`
    ///
    /// The target sheet defaults to the source sheet.
    pub fn copy_range(
        &self,
        filename: &str,
        sheet: &str,
        source_start: &str,
        source_end: &str,
        target_start: &str,
        target_sheet: Option<&str>,
    ) -> Response {
        self.mutate(Tool::CopyRange, filename, |workbook| {
            let source = resolve::resolve(source_start, Some(source_end))?;
            let top_left = CellAddress::parse(target_start)?;
            self.check_limits(&source.with_top_left(top_left)?)?;
            let target_sheet = target_sheet.unwrap_or(sheet);
            let target = workbook.copy_range_between(sheet, &source, target_sheet, top_left)?;
            Ok((
                format!(
                    "Range '{}' copied to '{}' in sheet '{}'",
                    source, target, target_sheet
                ),
                json!({
                    "sheet": sheet,
                    "source": source.to_string(),
                    "target_sheet": target_sheet,
                    "target": RangeInfo::from(&target),
                }),
            ))
        })
    }

    /// Move `source_start:source_end` so it starts at `target_start`
    pub fn move_range(
        &self,
        filename: &str,
        sheet: &str,
        source_start: &str,
        source_end: &str,
        target_start: &str,
    ) -> Response {
        self.mutate(Tool::MoveRange, filename, |workbook| {
            let source = resolve::resolve(source_start, Some(source_end))?;
            let top_left = CellAddress::parse(target_start)?;
            self.check_limits(&source.with_top_left(top_left)?)?;
            let target = workbook
                .worksheet_by_name_mut(sheet)?
                .move_range(&source, top_left)?;
            Ok((
                format!("Range '{}' moved to '{}' in sheet '{}'", source, target, sheet),
                json!({
                    "sheet": sheet,
                    "source": source.to_string(),
                    "target": RangeInfo::from(&target),
                }),
            ))
        })
    }

    /// Delete `start[:end]` and shift cells `up` or `left`
    pub fn delete_range(
        &self,
        filename: &str,
        sheet: &str,
        start: &str,
        end: Option<&str>,
        shift: &str,
    ) -> Response {
        self.mutate(Tool::DeleteRange, filename, |workbook| {
            let shift: ShiftDirection = shift.parse()?;
            let range = resolve::resolve(start, end)?;
            workbook
                .worksheet_by_name_mut(sheet)?
                .delete_range(&range, shift)?;
            Ok((
                format!(
                    "Range '{}' deleted in sheet '{}', cells shifted {}",
                    range, sheet, shift
                ),
                json!({ "sheet": sheet, "range": range.to_string(), "shift": shift }),
            ))
        })
    }

    /// Check a `start:end` range string against the sheet without changing it
    pub fn validate_range(&self, filename: &str, sheet: &str, range: &str) -> Response {
        self.run(Tool::ValidateRange, || {
            let workbook = self.store.load(filename)?;
            let info = ops::validate_range(workbook.worksheet_by_name(sheet)?, range)?;
            Ok((
                format!("Range '{}:{}' is valid", info.start_cell, info.end_cell),
                Some(serde_json::to_value(info)?),
            ))
        })
    }

    /// Select rows whose header columns match the given values
    pub fn filter_rows(
        &self,
        filename: &str,
        sheet: &str,
        columns: &[String],
        values: &[String],
        mode: FilterMode,
    ) -> Response {
        self.run(Tool::FilterRows, || {
            let workbook = self.store.load(filename)?;
            let result = filter_rows(workbook.worksheet_by_name(sheet)?, columns, values, mode)?;
            let rows: Vec<Vec<Value>> = result
                .rows
                .iter()
                .map(|row| row.iter().map(cell_to_json).collect())
                .collect();
            Ok((
                format!("Found {} matching row(s)", rows.len()),
                Some(json!({
                    "headers": result.headers,
                    "rows": rows,
                    "count": rows.len(),
                })),
            ))
        })
    }

    // === Internal ===

    /// Check a write target against the configured limits
    fn check_limits(&self, target: &CellRange) -> Result<()> {
        let config = self.store.config();
        if target.end.row > config.max_rows {
            return Err(CoreError::RowOutOfBounds(target.end.row as u64, config.max_rows).into());
        }
        if target.end.col > config.max_cols {
            return Err(
                CoreError::ColumnOutOfBounds(target.end.col as u64, config.max_cols).into(),
            );
        }
        Ok(())
    }

    fn run<F>(&self, tool: Tool, f: F) -> Response
    where
        F: FnOnce() -> Outcome,
    {
        let span = tracing::debug_span!("tool", name = tool.name());
        let _entered = span.enter();

        match f() {
            Ok((message, data)) => {
                tracing::debug!(%message, "tool succeeded");
                Response::ok(message, data)
            }
            Err(err) => {
                tracing::warn!(error = %err, "tool failed");
                Response::failure(err.to_string())
            }
        }
    }

    /// Run a load-mutate-save tool and audit it once the save succeeded
    fn mutate<F>(&self, tool: Tool, filename: &str, f: F) -> Response
    where
        F: FnOnce(&mut Workbook) -> Result<(String, Value)>,
    {
        self.run(tool, || {
            let (message, details) = self.store.update(filename, f)?;
            audit::record(tool.name(), filename, details.clone());
            Ok((message, Some(details)))
        })
    }
}

fn sheet_summary(index: usize, ws: &Worksheet) -> Value {
    let extent = ws.extent();
    let merged: Vec<String> = ws.merged_regions().iter().map(|r| r.to_string()).collect();
    json!({
        "index": index,
        "name": ws.name(),
        "used_range": ws.used_range().map(|r| r.to_string()),
        "rows": extent.rows,
        "cols": extent.cols,
        "merged": merged,
    })
}

/// JSON scalar for a cell value (integral numbers without a fraction)
fn cell_to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Empty => Value::Null,
        CellValue::Boolean(b) => Value::Bool(*b),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Value::from(*n as i64),
        CellValue::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        CellValue::String(s) => Value::String(s.clone()),
        CellValue::Date(_) => Value::String(value.to_string()),
    }
}

/// Cell value for a JSON scalar; arrays and objects are stored as their text
fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Boolean(*b),
        Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        Value::String(s) if s.is_empty() => CellValue::Empty,
        Value::String(s) => CellValue::string(s.as_str()),
        other => CellValue::string(other.to_string()),
    }
}
