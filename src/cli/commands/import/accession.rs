//! `fonds import accession` - accession CSV import

use miette::Result;

use super::common::{print_archive_totals, print_pass_header, print_summary, require_file, ImportRunArgs};
use crate::cli::helpers::open_workspace;
use crate::cli::GlobalOpts;
use crate::import::accession::import_accessions;

#[derive(clap::Args, Debug)]
pub struct AccessionArgs {
    #[command(flatten)]
    pub run: ImportRunArgs,
}

pub fn run(args: AccessionArgs, global: &GlobalOpts) -> Result<()> {
    require_file(&args.run.file)?;
    let workspace = open_workspace(global)?;
    let options = args.run.options(&workspace, global);

    if !global.quiet {
        print_pass_header("Importing accessions", &args.run.file);
    }

    let outcome = import_accessions(&workspace.store, &args.run.file, &options)?;

    if !global.quiet {
        print_summary("Accession Import Summary", &outcome.stats, &outcome.log);
        print_archive_totals(&workspace.store)?;
    }
    Ok(())
}
