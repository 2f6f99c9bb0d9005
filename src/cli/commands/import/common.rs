//! Options, summaries and templates shared by the import commands

use console::style;
use miette::IntoDiagnostic;
use std::path::{Path, PathBuf};

use crate::cli::helpers::Workspace;
use crate::cli::GlobalOpts;
use crate::core::ArchiveStore;
use crate::import::{ErrorLog, ImportOptions, ImportStats};

/// Arguments every import takes
#[derive(clap::Args, Debug)]
pub struct ImportRunArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Data rows to skip after the header (resume an interrupted import)
    #[arg(long, default_value_t = 0)]
    pub skip_rows: usize,

    /// Print a progress line every N rows (0 disables)
    #[arg(long)]
    pub rows_until_update: Option<usize>,

    /// Append row errors to this file
    #[arg(long)]
    pub error_log: Option<PathBuf>,

    /// Source name for keymap entries (default: the file name)
    #[arg(long)]
    pub source_name: Option<String>,
}

impl ImportRunArgs {
    /// Merge command-line options over the project configuration
    pub fn options(&self, workspace: &Workspace, global: &GlobalOpts) -> ImportOptions {
        let rows_until_update = if global.quiet {
            0
        } else {
            self.rows_until_update
                .unwrap_or_else(|| workspace.config.rows_until_update())
        };

        // a configured log path is relative to the project root
        let error_log = self.error_log.clone().or_else(|| {
            workspace.config.error_log.as_ref().map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    workspace.project.root().join(path)
                }
            })
        });

        ImportOptions {
            skip_rows: self.skip_rows,
            rows_until_update,
            error_log,
            source_name: self
                .source_name
                .clone()
                .or_else(|| workspace.config.source_name.clone()),
            echo_errors: !global.quiet,
        }
    }
}

/// Fail early, before any pass has written anything
pub fn require_file(path: &Path) -> miette::Result<()> {
    if !path.is_file() {
        return Err(miette::miette!("File not found: {}", path.display()));
    }
    Ok(())
}

pub fn print_pass_header(label: &str, path: &Path) {
    println!(
        "{} {} from {}",
        style("→").blue(),
        label,
        style(path.display()).yellow()
    );
}

/// Summary block printed after each import
pub fn print_summary(title: &str, stats: &ImportStats, log: &ErrorLog) {
    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style(title).bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows processed:   {}", style(stats.rows_processed).cyan());
    println!("  Records created:  {}", style(stats.entities_created).green());
    if stats.entities_updated > 0 {
        println!("  Records updated:  {}", style(stats.entities_updated).yellow());
    }
    if stats.errors > 0 {
        println!("  Errors:           {}", style(stats.errors).red());
    }
    if stats.skipped > 0 {
        println!("  Skipped:          {}", style(stats.skipped).dim());
    }
    if let (Some(path), false) = (log.path(), log.is_empty()) {
        println!("  Error log:        {}", style(path.display()).dim());
    }
}

/// Record totals after all passes have run
pub fn print_archive_totals(store: &ArchiveStore) -> miette::Result<()> {
    let totals = store.statistics().into_diagnostic()?;
    println!();
    println!(
        "Archive now holds {} accession(s), {} actor(s), {} relation(s)",
        style(totals.accessions).cyan(),
        style(totals.actors).cyan(),
        style(totals.relations).cyan()
    );
    println!(
        "  with {} other name(s), {} contact record(s), {} note(s)",
        style(totals.other_names).dim(),
        style(totals.contact_information).dim(),
        style(totals.notes).dim()
    );
    Ok(())
}

/// Which import file to print a template for
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Accession,
    Authority,
    Alias,
    Relation,
}

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    /// Import file kind
    #[arg(value_enum)]
    pub kind: TemplateKind,
}

pub fn template(kind: TemplateKind) -> (Vec<&'static str>, Vec<&'static str>) {
    match kind {
        TemplateKind::Accession => (
            vec![
                "ACCESSION NUMBER",
                "TITLE",
                "DATE OF ACQUISITION",
                "TYPE",
                "ACQUISITION METHOD",
                "SCOPE AND CONTENT",
                "DATE OF CREATION",
                "CREATOR or COLLECTOR",
                "LOCATION",
                "INTEXTUALRECORDS",
                "INMAP",
                "ARCHIVIST",
                "APPRAISAL NOTES",
                "DONOR",
                "EMAIL",
                "TELEPHONE",
                "ADDRESS_Street",
                "ADDRESS_City",
                "ADDRESS_Province",
                "POSTAL CODE",
            ],
            vec![
                "2011-004",
                "Parks Board minutes",
                "2011-04-15",
                "Public records",
                "Scheduled Transfer",
                "Minutes of regular meetings",
                "1901-1950",
                "Parks Board|Engineering",
                "Vault 2",
                "1.5",
                "3",
                "J. Doe",
                "Retain permanently",
                "Parks Board",
                "parks@example.org",
                "555-0100",
                "2099 Beach Ave",
                "Vancouver",
                "BC",
                "V6G 1Z4",
            ],
        ),
        TemplateKind::Authority => (
            vec![
                "name",
                "dates",
                "history",
                "EntityType",
                "email",
                "telephone",
                "streetAddress",
                "region",
                "countryCode",
                "postalCode",
                "maintenanceNotes",
            ],
            vec![
                "\"Smith, John\"",
                "1880-1952",
                "Alderman and surveyor",
                "Person",
                "",
                "",
                "",
                "BC",
                "CA",
                "",
                "Imported from legacy catalogue",
            ],
        ),
        TemplateKind::Alias => (
            vec!["RecordID", "parentAuthority", "OtherName", "email"],
            vec!["1", "\"Smith, John\"", "J. Smith", ""],
        ),
        TemplateKind::Relation => (
            vec![
                "RecordID",
                "Source_Name",
                "Target_Name",
                "Relationship_Category",
                "Relationship_Date",
                "Relationship_StartDate",
                "Relationship_EndDate",
                "Relationship_Description",
            ],
            vec!["1", "\"Smith, John\"", "Parks Board", "associative", "", "1920", "1935", "Commissioner"],
        ),
    }
}

pub fn print_template(args: TemplateArgs) -> miette::Result<()> {
    let (headers, example) = template(args.kind);

    // stdout only carries the CSV so it can be redirected
    println!("{}", headers.join(","));
    println!("{}", example.join(","));

    let name = format!("{:?}", args.kind).to_lowercase();
    eprintln!();
    eprintln!(
        "{} Template generated. Redirect to file: fonds import template {} > {}.csv",
        style("→").blue(),
        name,
        name
    );
    Ok(())
}
