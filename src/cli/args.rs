//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, import::ImportCommands, init::InitArgs, list::ListArgs,
    purge::PurgeArgs, terms::TermsArgs,
};

#[derive(Parser)]
#[command(name = "fonds")]
#[command(author, version, about = "Import legacy CSV catalogues into an archival description store")]
#[command(
    long_about = "Reads flat CSV exports of accessions and authority records, maps their columns onto archival records and saves them to a project-local archive database."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project root (default: auto-detect by finding .fonds/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new fonds project
    Init(InitArgs),

    /// Import CSV files
    #[command(subcommand)]
    Import(ImportCommands),

    /// List imported records
    List(ListArgs),

    /// Show controlled vocabulary terms
    Terms(TermsArgs),

    /// Delete every record an import source created
    Purge(PurgeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default (table when unset)
    #[default]
    Auto,
    /// Aligned table for terminals
    Table,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
}

impl OutputFormat {
    /// Resolve `Auto` against the configured default format
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        match configured.map(|f| f.trim().to_lowercase()).as_deref() {
            Some("json") => OutputFormat::Json,
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_resolution() {
        assert_eq!(OutputFormat::Auto.resolve(None), OutputFormat::Table);
        assert_eq!(OutputFormat::Auto.resolve(Some("JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::Csv.resolve(Some("json")), OutputFormat::Csv);
    }
}
