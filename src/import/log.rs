//! Error log sink for row-level failures

use console::style;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::{ImportError, RowError};

/// One recorded failure with its row context
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LoggedError {
    /// Input file the row came from
    pub source: String,
    /// 1-based data row, `None` for failures outside a row
    pub row: Option<usize>,
    /// Column being processed when the error was raised
    pub column: Option<String>,
    pub message: String,
}

impl fmt::Display for LoggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(row) = self.row {
            write!(f, ", row {}", row)?;
        }
        if let Some(column) = &self.column {
            write!(f, ", column {}", column)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Collects row errors in memory and optionally appends them to a file
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<LoggedError>,
    file: Option<File>,
    path: Option<PathBuf>,
    echo: bool,
}

impl ErrorLog {
    /// In-memory log that does not print
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every entry to `path` as well
    pub fn with_file(mut self, path: &Path) -> Result<Self, ImportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ImportError::ErrorLog {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ImportError::ErrorLog {
                path: path.to_path_buf(),
                source,
            })?;
        self.file = Some(file);
        self.path = Some(path.to_path_buf());
        Ok(self)
    }

    /// Print each entry to stderr as it is recorded
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn record(&mut self, entry: LoggedError) {
        // an echoed entry is already on stderr once
        if self.echo {
            tracing::debug!(source = %entry.source, row = ?entry.row, column = ?entry.column, "{}", entry.message);
            eprintln!("{} {}", style("✗").red(), entry);
        } else {
            tracing::warn!(source = %entry.source, row = ?entry.row, column = ?entry.column, "{}", entry.message);
        }

        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", entry) {
                tracing::error!(error = %e, "failed to append to error log");
            }
        }

        self.entries.push(entry);
    }

    /// Record a row error with its context
    pub fn record_row(&mut self, source: &str, row: usize, column: Option<&str>, error: &RowError) {
        self.record(LoggedError {
            source: source.to_string(),
            row: Some(row),
            column: column.map(str::to_string),
            message: error.to_string(),
        });
    }

    pub fn entries(&self) -> &[LoggedError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
