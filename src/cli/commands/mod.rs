//! Command implementations

pub mod completions;
pub mod import;
pub mod init;
pub mod list;
pub mod purge;
pub mod terms;
