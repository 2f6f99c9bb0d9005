//! `fonds import` command - Import accessions and authority records from CSV

pub mod accession;
pub mod authority;
pub mod common;

use miette::Result;

use crate::cli::GlobalOpts;

pub use accession::AccessionArgs;
pub use authority::AuthorityArgs;
pub use common::{ImportRunArgs, TemplateArgs};

#[derive(clap::Subcommand, Debug)]
pub enum ImportCommands {
    /// Import accessions, one row per accession number
    Accession(AccessionArgs),

    /// Import authority records, with optional alias and relation files
    Authority(AuthorityArgs),

    /// Print a CSV header and example row for an import file
    Template(TemplateArgs),
}

pub fn run(cmd: ImportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ImportCommands::Accession(args) => accession::run(args, global),
        ImportCommands::Authority(args) => authority::run(args, global),
        ImportCommands::Template(args) => common::print_template(args),
    }
}
