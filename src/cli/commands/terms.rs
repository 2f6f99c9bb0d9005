//! `fonds terms` command - show controlled vocabularies

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::open_workspace;
use crate::cli::GlobalOpts;
use crate::core::taxonomy::Taxonomy;

#[derive(clap::Args, Debug)]
pub struct TermsArgs {
    /// Taxonomy to show (default: all), e.g. acquisition-type
    #[arg(value_parser = parse_taxonomy)]
    pub taxonomy: Option<Taxonomy>,
}

fn parse_taxonomy(s: &str) -> Result<Taxonomy, String> {
    s.parse()
}

pub fn run(args: TermsArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let taxonomies: Vec<Taxonomy> = match args.taxonomy {
        Some(taxonomy) => vec![taxonomy],
        None => Taxonomy::all().to_vec(),
    };

    let mut builder = Builder::default();
    builder.push_record(["TAXONOMY", "ID", "TERM"]);
    let mut count = 0;

    for taxonomy in taxonomies {
        let terms = workspace.store.load_terms(taxonomy).into_diagnostic()?;
        for (id, name) in terms.iter() {
            builder.push_record([taxonomy.to_string(), id.to_string(), name.to_string()]);
            count += 1;
        }
    }

    println!("{}", builder.build().with(Style::rounded()));
    if !global.quiet {
        println!("{} term(s)", style(count).cyan());
    }
    Ok(())
}
