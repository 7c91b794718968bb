//! Workbook files on disk
//!
//! Filenames resolve against the configured folder. Every save goes to a
//! temporary file in the destination directory that is then renamed over
//! the target, so a reader never sees a half-written workbook.
//! Load-mutate-save cycles on the same path are serialized by
//! [`WorkbookStore::update`].

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ahash::AHashMap;
use sheetops_core::{Workbook, Worksheet};
use sheetops_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use tempfile::NamedTempFile;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

/// On-disk workbook format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The whole workbook (values, extents, merged regions) as JSON
    Json,
    /// A single worksheet's values as CSV
    Csv,
}

impl Format {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("csv") => Ok(Format::Csv),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads and saves workbooks inside a folder
///
/// The store is `Send + Sync`; share it behind an `Arc` to serve concurrent
/// callers.
#[derive(Debug)]
pub struct WorkbookStore {
    config: StoreConfig,
    /// One lock per resolved path, created on first use
    locks: Mutex<AHashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl WorkbookStore {
    /// Create a store for the configured folder
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            locks: Mutex::new(AHashMap::new()),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Map a filename to its location
    ///
    /// Absolute paths are used as given; relative ones are joined to the
    /// configured folder. `..` components are rejected.
    pub fn resolve_path(&self, filename: &str) -> Result<PathBuf> {
        if filename.trim().is_empty() {
            return Err(Error::InvalidPath("filename is empty".into()));
        }

        let path = Path::new(filename);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Error::InvalidPath(filename.to_string()));
        }

        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.config.folder.join(path))
        }
    }

    /// Create a new workbook file holding one empty sheet
    ///
    /// Fails with [`Error::WorkbookExists`] if the file is already there.
    pub fn create(&self, filename: &str, sheet_name: &str) -> Result<PathBuf> {
        let path = self.resolve_path(filename)?;
        Format::from_path(&path)?;

        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if path.exists() {
            return Err(Error::WorkbookExists(path));
        }

        let mut workbook = Workbook::empty();
        workbook.add_worksheet_with_name(sheet_name)?;
        write_workbook(&path, &workbook)?;

        tracing::info!(path = %path.display(), sheet = sheet_name, "created workbook");
        Ok(path)
    }

    /// Load a workbook
    pub fn load(&self, filename: &str) -> Result<Workbook> {
        let path = self.resolve_path(filename)?;
        read_workbook(&path)
    }

    /// Save a workbook, replacing any existing file atomically
    pub fn save(&self, filename: &str, workbook: &Workbook) -> Result<PathBuf> {
        let path = self.resolve_path(filename)?;

        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        write_workbook(&path, workbook)?;
        Ok(path)
    }

    /// Load, mutate and save a workbook while holding the file's lock
    ///
    /// The workbook is saved only when `f` succeeds; on error the file is
    /// left untouched.
    pub fn update<T, F>(&self, filename: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Workbook) -> Result<T>,
    {
        let path = self.resolve_path(filename)?;

        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut workbook = read_workbook(&path)?;
        let out = f(&mut workbook)?;
        write_workbook(&path, &workbook)?;
        Ok(out)
    }

    /// Names of the workbook files in the folder, sorted
    ///
    /// The folder is created if it does not exist yet.
    pub fn list(&self) -> Result<Vec<String>> {
        let folder = &self.config.folder;
        fs::create_dir_all(folder)?;

        let mut names = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if !path.is_file() || Format::from_path(&path).is_err() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();

        tracing::debug!(folder = %folder.display(), count = names.len(), "listed workbooks");
        Ok(names)
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }
}

fn read_workbook(path: &Path) -> Result<Workbook> {
    let format = Format::from_path(path)?;
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let workbook = match format {
        Format::Json => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        Format::Csv => {
            let sheet = CsvReader::read_file(path, &CsvReadOptions::default())?;
            let mut workbook = Workbook::empty();
            workbook.add_existing_worksheet(sheet)?;
            workbook
        }
    };

    tracing::debug!(path = %path.display(), sheets = workbook.sheet_count(), "loaded workbook");
    Ok(workbook)
}

fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let format = Format::from_path(path)?;
    let dir = parent_dir_or_dot(path);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    match format {
        Format::Json => {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, workbook)?;
            writer.flush()?;
        }
        Format::Csv => {
            let sheet = single_sheet(workbook, path)?;
            CsvWriter::write(sheet, tmp.as_file_mut(), &CsvWriteOptions::default())?;
        }
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|source| Error::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "saved workbook");
    Ok(())
}

/// CSV holds exactly one sheet
fn single_sheet<'a>(workbook: &'a Workbook, path: &Path) -> Result<&'a Worksheet> {
    match workbook.worksheet(0) {
        Some(sheet) if workbook.sheet_count() == 1 => Ok(sheet),
        _ => Err(Error::UnsupportedFormat(format!(
            "{} holds exactly one worksheet, workbook has {}",
            path.display(),
            workbook.sheet_count()
        ))),
    }
}

/// `Path::parent` is `Some("")` for a bare file name
fn parent_dir_or_dot(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}
