//! fonds: CSV flat-file import for an archival description store
//!
//! Legacy catalogues of accessions and authority records are read row by
//! row, mapped onto archival records through a configurable pipeline, and
//! persisted to a project-local SQLite archive.

pub mod cli;
pub mod core;
pub mod entities;
pub mod import;
