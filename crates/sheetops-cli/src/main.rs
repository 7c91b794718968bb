//! sheetops CLI - run workbook tools from the command line
//!
//! Every subcommand prints the tool's JSON response on stdout and exits
//! with status 1 when the tool reports a failure. Diagnostics go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use sheetops::{
    FilterMode, Response, SheetService, StoreConfig, Tool, DEFAULT_FOLDER, DEFAULT_TOOL_PREFIX,
    MAX_COLS, MAX_ROWS,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetops")]
#[command(author, version, about = "Cell range operations on workbook files")]
struct Cli {
    /// Folder holding the workbook files
    #[arg(long, env = "SHEETOPS_FOLDER", default_value = DEFAULT_FOLDER, global = true)]
    folder: PathBuf,

    /// Log filter, e.g. "info" or "sheetops::audit=info" (falls back to RUST_LOG)
    #[arg(long, env = "SHEETOPS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Prefix for qualified tool names
    #[arg(long, env = "SHEETOPS_TOOL_PREFIX", default_value = DEFAULT_TOOL_PREFIX, global = true)]
    tool_prefix: String,

    /// Highest row a write may reach
    #[arg(long, env = "SHEETOPS_MAX_ROWS", default_value_t = MAX_ROWS, global = true)]
    max_rows: u32,

    /// Highest column a write may reach
    #[arg(long, env = "SHEETOPS_MAX_COLS", default_value_t = MAX_COLS, global = true)]
    max_cols: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available tools with their qualified names
    Tools,

    /// Create a new workbook file
    CreateWorkbook {
        /// Workbook file (.json or .csv)
        file: String,

        /// Name of the first sheet
        #[arg(long)]
        sheet: Option<String>,
    },

    /// List the workbook files in the folder
    #[command(alias = "ls")]
    ListWorkbooks,

    /// Show the sheets of a workbook
    #[command(alias = "info")]
    GetWorkbookInfo {
        file: String,
    },

    /// Read cell values
    ReadData {
        file: String,
        sheet: String,

        /// First cell (default: A1)
        #[arg(long)]
        start: Option<String>,

        /// Last cell (default: the sheet's extent)
        #[arg(long)]
        end: Option<String>,
    },

    /// Write rows of values given as a JSON array of arrays
    WriteData {
        file: String,
        sheet: String,

        /// Rows, e.g. '[["Name","Revenue"],["A",5]]'
        #[arg(long)]
        data: String,

        /// First cell (default: append below the extent)
        #[arg(long)]
        start: Option<String>,
    },

    /// Add a worksheet
    CreateWorksheet {
        file: String,
        sheet: String,
    },

    /// Delete a worksheet
    DeleteWorksheet {
        file: String,
        sheet: String,
    },

    /// Rename a worksheet
    RenameWorksheet {
        file: String,
        old_name: String,
        new_name: String,
    },

    /// Copy a worksheet under a new name
    CopyWorksheet {
        file: String,
        source: String,
        new_name: String,
    },

    /// Move a worksheet to a 0-based position
    MoveWorksheet {
        file: String,
        sheet: String,
        index: usize,
    },

    /// Describe one worksheet
    GetWorksheet {
        file: String,
        sheet: String,
    },

    /// List the worksheet names
    ListWorksheets {
        file: String,
    },

    /// Merge a range of cells
    MergeRange {
        file: String,
        sheet: String,
        start: String,
        end: String,
    },

    /// Unmerge a merged range
    UnmergeRange {
        file: String,
        sheet: String,
        start: String,
        end: String,
    },

    /// Copy a range so it starts at a target cell
    CopyRange {
        file: String,
        sheet: String,
        source_start: String,
        source_end: String,
        target_start: String,

        /// Sheet to copy into (default: the source sheet)
        #[arg(long)]
        target_sheet: Option<String>,
    },

    /// Move a range so it starts at a target cell
    MoveRange {
        file: String,
        sheet: String,
        source_start: String,
        source_end: String,
        target_start: String,
    },

    /// Delete a range and shift the remaining cells
    DeleteRange {
        file: String,
        sheet: String,
        start: String,

        /// Last cell (default: the start cell)
        #[arg(long)]
        end: Option<String>,

        /// "up" or "left"
        #[arg(long, default_value = "up")]
        shift: String,
    },

    /// Check a "start:end" range against a sheet
    ValidateRange {
        file: String,
        sheet: String,
        range: String,
    },

    /// Select rows by header column values
    FilterRows {
        file: String,
        sheet: String,

        /// Header name to match (repeatable)
        #[arg(long = "column", required = true)]
        columns: Vec<String>,

        /// Value for the matching --column (repeatable)
        #[arg(long = "value", required = true)]
        values: Vec<String>,

        /// Select rows matching any predicate instead of all
        #[arg(long)]
        any: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let config = StoreConfig::new(&cli.folder)
        .with_tool_prefix(cli.tool_prefix)
        .with_limits(cli.max_rows, cli.max_cols);
    tracing::debug!(folder = %config.folder.display(), "using workbook folder");
    let service = SheetService::from_config(config);

    let response = run(&service, cli.command)?;
    print_response(&response)?;

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

fn run(service: &SheetService, command: Commands) -> Result<Response> {
    let response = match command {
        Commands::Tools => list_tools(service),
        Commands::CreateWorkbook { file, sheet } => {
            service.create_workbook(&file, sheet.as_deref())
        }
        Commands::ListWorkbooks => service.list_workbooks(),
        Commands::GetWorkbookInfo { file } => service.get_workbook_info(&file),
        Commands::ReadData {
            file,
            sheet,
            start,
            end,
        } => service.read_data(&file, &sheet, start.as_deref(), end.as_deref()),
        Commands::WriteData {
            file,
            sheet,
            data,
            start,
        } => {
            let rows: Vec<Vec<Value>> = serde_json::from_str(&data)
                .context("--data must be a JSON array of rows, e.g. [[\"A\",1]]")?;
            service.write_data(&file, &sheet, &rows, start.as_deref())
        }
        Commands::CreateWorksheet { file, sheet } => service.create_worksheet(&file, &sheet),
        Commands::DeleteWorksheet { file, sheet } => service.delete_worksheet(&file, &sheet),
        Commands::RenameWorksheet {
            file,
            old_name,
            new_name,
        } => service.rename_worksheet(&file, &old_name, &new_name),
        Commands::CopyWorksheet {
            file,
            source,
            new_name,
        } => service.copy_worksheet(&file, &source, &new_name),
        Commands::MoveWorksheet { file, sheet, index } => {
            service.move_worksheet(&file, &sheet, index)
        }
        Commands::GetWorksheet { file, sheet } => service.get_worksheet(&file, &sheet),
        Commands::ListWorksheets { file } => service.list_worksheets(&file),
        Commands::MergeRange {
            file,
            sheet,
            start,
            end,
        } => service.merge_range(&file, &sheet, &start, &end),
        Commands::UnmergeRange {
            file,
            sheet,
            start,
            end,
        } => service.unmerge_range(&file, &sheet, &start, &end),
        Commands::CopyRange {
            file,
            sheet,
            source_start,
            source_end,
            target_start,
            target_sheet,
        } => service.copy_range(
            &file,
            &sheet,
            &source_start,
            &source_end,
            &target_start,
            target_sheet.as_deref(),
        ),
        Commands::MoveRange {
            file,
            sheet,
            source_start,
            source_end,
            target_start,
        } => service.move_range(&file, &sheet, &source_start, &source_end, &target_start),
        Commands::DeleteRange {
            file,
            sheet,
            start,
            end,
            shift,
        } => service.delete_range(&file, &sheet, &start, end.as_deref(), &shift),
        Commands::ValidateRange { file, sheet, range } => {
            service.validate_range(&file, &sheet, &range)
        }
        Commands::FilterRows {
            file,
            sheet,
            columns,
            values,
            any,
        } => {
            let mode = if any { FilterMode::Any } else { FilterMode::All };
            service.filter_rows(&file, &sheet, &columns, &values, mode)
        }
    };
    Ok(response)
}

fn list_tools(service: &SheetService) -> Response {
    let prefix = &service.store().config().tool_prefix;
    let tools: Vec<Value> = Tool::ALL
        .iter()
        .map(|tool| {
            json!({
                "name": tool.qualified_name(prefix),
                "description": tool.description(),
            })
        })
        .collect();
    Response::ok(format!("{} tools available", tools.len()), Some(json!(tools)))
}

fn print_response(response: &Response) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, response).context("Failed to write response")?;
    writeln!(out)?;
    Ok(())
}
