//! `fonds init` command - Initialize a new fonds project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError};
use crate::core::taxonomy::Taxonomy;
use crate::core::ArchiveStore;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Recreate the archive database even if .fonds/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            // opening a missing database creates and seeds it
            let store = ArchiveStore::open(&project).into_diagnostic()?;

            if global.quiet {
                return Ok(());
            }

            println!(
                "{} Initialized fonds project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Seeded vocabularies:");
            for taxonomy in Taxonomy::all() {
                let terms = store.load_terms(*taxonomy).into_diagnostic()?;
                println!("  {:<22} {} term(s)", style(taxonomy.as_str()).cyan(), terms.len());
            }
            println!();
            println!("Next steps:");
            println!(
                "  {} Print a CSV header to start from",
                style("fonds import template accession").yellow()
            );
            println!(
                "  {} Import accessions",
                style("fonds import accession accessions.csv").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} fonds project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to recreate the archive", style("fonds init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
