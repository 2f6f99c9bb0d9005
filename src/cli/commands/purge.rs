//! `fonds purge` command - delete every record an import source created

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_workspace;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct PurgeArgs {
    /// Source name recorded at import time (default: the imported file name)
    #[arg(long)]
    pub source_name: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: PurgeArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store = &workspace.store;

    let entries = store.keymap_for_source(&args.source_name).into_diagnostic()?;
    if entries.is_empty() {
        println!(
            "{} No records were imported from source {}",
            style("!").yellow(),
            style(&args.source_name).cyan()
        );
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete {} record(s) imported from '{}'?",
                entries.len(),
                args.source_name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut deleted = 0;
    for entry in &entries {
        let id = entry.target_id;
        let (label, removed) = match entry.target_name.as_str() {
            "accession" => {
                let label = store.get_accession(id).into_diagnostic()?.map(|a| a.identifier);
                (label, store.delete_accession(id).into_diagnostic()?)
            }
            "actor" => {
                let label = store.get_actor(id).into_diagnostic()?.map(|a| a.authorized_form_of_name);
                (label, store.delete_actor(id).into_diagnostic()?)
            }
            _ => (None, store.delete_object(id).into_diagnostic()?),
        };

        if removed {
            deleted += 1;
            tracing::debug!(kind = %entry.target_name, id, "deleted");
            if global.verbose > 0 && !global.quiet {
                println!(
                    "  {} {} {}",
                    style("✗").red(),
                    entry.target_name,
                    style(label.unwrap_or_else(|| id.to_string())).cyan()
                );
            }
        }
    }
    store
        .delete_keymap_for_source(&args.source_name)
        .into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Deleted {} record(s) from source {}",
            style("✓").green(),
            style(deleted).cyan(),
            style(&args.source_name).cyan()
        );
    }
    Ok(())
}
