//! Store and tool-layer configuration

use std::path::{Path, PathBuf};

use sheetops_core::{MAX_COLS, MAX_ROWS};

/// Folder relative filenames resolve against by default
pub const DEFAULT_FOLDER: &str = "excel_files";

/// Prefix applied to the external tool names by default
pub const DEFAULT_TOOL_PREFIX: &str = "EXCEL_MCP_";

/// Configuration for [`WorkbookStore`](crate::WorkbookStore) and
/// [`SheetService`](crate::SheetService)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Folder holding the workbook files
    pub folder: PathBuf,
    /// Prefix for qualified tool names
    pub tool_prefix: String,
    /// Highest row a write may reach
    pub max_rows: u32,
    /// Highest column a write may reach
    pub max_cols: u32,
}

impl StoreConfig {
    /// Configuration rooted at `folder`, other settings at their defaults
    pub fn new<P: AsRef<Path>>(folder: P) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the tool name prefix
    pub fn with_tool_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.tool_prefix = prefix.into();
        self
    }

    /// Lower the write limits (values above the sheet limits are clamped)
    pub fn with_limits(mut self, max_rows: u32, max_cols: u32) -> Self {
        self.max_rows = max_rows.min(MAX_ROWS);
        self.max_cols = max_cols.min(MAX_COLS);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_FOLDER),
            tool_prefix: DEFAULT_TOOL_PREFIX.to_string(),
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = StoreConfig::default();
        assert_eq!(config.folder, PathBuf::from("excel_files"));
        assert_eq!(config.tool_prefix, "EXCEL_MCP_");
        assert_eq!(config.max_rows, MAX_ROWS);

        let config = StoreConfig::new("/data")
            .with_tool_prefix("")
            .with_limits(100, u32::MAX);
        assert_eq!(config.folder, PathBuf::from("/data"));
        assert!(config.tool_prefix.is_empty());
        assert_eq!((config.max_rows, config.max_cols), (100, MAX_COLS));
    }
}
