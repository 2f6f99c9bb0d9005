//! Flat-file import pipeline
//!
//! A run reads a CSV file row by row. Each row moves through a fixed
//! lifecycle ([`engine::RowStage`]): the row-init hook resolves the target
//! entity by natural key, every column is routed to exactly one of
//! ignored / handled / captured / mapped, then the pre-save, save and
//! post-save hooks run. Row errors go to the [`ErrorLog`] and the run
//! continues; setup errors ([`ImportError`]) abort it.

pub mod accession;
pub mod accumulate;
pub mod authority;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod log;
pub mod route;
pub mod rows;
pub mod target;

use std::path::{Path, PathBuf};

pub use config::ImportConfig;
pub use context::{ImportContext, RowStatusVars};
pub use engine::{FlatfileImport, ImportOutcome, ImportStats, RowStage};
pub use error::{ImportError, RowError};
pub use log::{ErrorLog, LoggedError};
pub use route::Route;
pub use rows::{Row, RowReader};
pub use target::{ImportTarget, NoTarget};

use crate::core::config::DEFAULT_ROWS_UNTIL_UPDATE;

/// Options shared by every import task
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Data rows to skip after the header
    pub skip_rows: usize,
    /// Progress line every N rows (0 disables)
    pub rows_until_update: usize,
    /// File row errors are appended to
    pub error_log: Option<PathBuf>,
    /// Keymap source name; defaults to the input file name
    pub source_name: Option<String>,
    /// Print row errors to stderr as they happen
    pub echo_errors: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            rows_until_update: DEFAULT_ROWS_UNTIL_UPDATE,
            error_log: None,
            source_name: None,
            echo_errors: false,
        }
    }
}

impl ImportOptions {
    /// Source name for keymap entries of a run over `path`
    pub fn source_name_for(&self, path: &Path) -> String {
        self.source_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Fresh error log for one pass
    pub fn error_log(&self) -> Result<ErrorLog, ImportError> {
        let log = ErrorLog::new().echo(self.echo_errors);
        match &self.error_log {
            Some(path) => log.with_file(path),
            None => Ok(log),
        }
    }
}
