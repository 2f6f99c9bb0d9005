//! `fonds import authority` - authority record CSV import
//!
//! Runs up to three passes: aliases, actors, relations. Each pass is a
//! separate import run; the alias list and the actor name registry are
//! handed from one to the next.

use miette::Result;
use std::path::PathBuf;

use super::common::{print_archive_totals, print_pass_header, print_summary, require_file, ImportRunArgs};
use crate::cli::helpers::open_workspace;
use crate::cli::GlobalOpts;
use crate::import::authority::{import_actors, import_aliases, import_relations};

#[derive(clap::Args, Debug)]
pub struct AuthorityArgs {
    #[command(flatten)]
    pub run: ImportRunArgs,

    /// CSV file of alternate names (parentAuthority, OtherName)
    #[arg(long)]
    pub alias_file: Option<PathBuf>,

    /// CSV file of relationships between actors (Source_Name, Target_Name, ...)
    #[arg(long)]
    pub relation_file: Option<PathBuf>,
}

pub fn run(args: AuthorityArgs, global: &GlobalOpts) -> Result<()> {
    require_file(&args.run.file)?;
    for path in args.alias_file.iter().chain(args.relation_file.iter()) {
        require_file(path)?;
    }

    let workspace = open_workspace(global)?;
    let options = args.run.options(&workspace, global);
    let store = &workspace.store;

    let aliases = match &args.alias_file {
        Some(path) => {
            if !global.quiet {
                print_pass_header("Reading aliases", path);
            }
            let outcome = import_aliases(store, path, &options)?;
            tracing::info!(aliases = outcome.status.aliases.len(), "aliases read");
            outcome.status.aliases
        }
        None => Vec::new(),
    };

    if !global.quiet {
        print_pass_header("Importing authority records", &args.run.file);
    }
    let actors = import_actors(store, &args.run.file, aliases, &options)?;
    if !global.quiet {
        print_summary("Authority Record Import Summary", &actors.stats, &actors.log);
    }

    if let Some(path) = &args.relation_file {
        if !global.quiet {
            println!();
            print_pass_header("Importing relationships", path);
        }
        let relations = import_relations(store, path, actors.status.registry, &options)?;
        if !global.quiet {
            print_summary("Relationship Import Summary", &relations.stats, &relations.log);
        }
    }

    if !global.quiet {
        print_archive_totals(store)?;
    }
    Ok(())
}
