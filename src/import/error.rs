//! Import error types
//!
//! [`ImportError`] is fatal and aborts a run; [`RowError`] is recorded in
//! the error log against the row that raised it and the run continues.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::store::StoreError;
use crate::core::taxonomy::UnknownTerm;

/// Setup failures that stop an import before or between passes
#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("cannot open {path}")]
    #[diagnostic(code(fonds::import::open), help("check that the file exists and is readable"))]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read the header row of {path}")]
    #[diagnostic(code(fonds::import::header))]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no header row")]
    #[diagnostic(
        code(fonds::import::empty),
        help("the first line (after any skipped rows) must name the columns")
    )]
    EmptyHeader { path: PathBuf },

    #[error("cannot open error log {path}")]
    #[diagnostic(code(fonds::import::error_log))]
    ErrorLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required term '{name}' is missing from the {taxonomy} taxonomy")]
    #[diagnostic(code(fonds::import::term), help("run 'fonds terms {taxonomy}' to inspect the vocabulary"))]
    MissingTerm { taxonomy: String, name: String },

    #[error(transparent)]
    #[diagnostic(code(fonds::store))]
    Store(#[from] StoreError),
}

/// Recoverable failures scoped to one row
#[derive(Debug, Error)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    Malformed { expected: usize, found: usize },

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("{kind} has no field '{field}'")]
    UnknownField { kind: &'static str, field: String },

    #[error(transparent)]
    UnknownTerm(#[from] UnknownTerm),

    #[error("{0} is not a valid actor entity type")]
    InvalidEntityType(String),

    #[error("Actor \"{0}\" does not exist")]
    MissingActor(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("missing value for required column '{0}'")]
    MissingValue(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
