//! `fonds list` command - list imported records

use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, first_line, open_workspace, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::taxonomy::Taxonomy;
use crate::core::ArchiveStore;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Accessions,
    Actors,
    Relations,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Record kind to list
    #[arg(value_enum)]
    pub kind: ListKind,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "auto")]
    pub format: OutputFormat,

    /// Show at most N records
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Rows ready for any output format
struct Listing {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    json: serde_json::Value,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let format = args.format.resolve(workspace.config.default_format.as_deref());
    let limit = args.limit.unwrap_or(usize::MAX);

    let listing = match args.kind {
        ListKind::Accessions => list_accessions(&workspace.store, limit)?,
        ListKind::Actors => list_actors(&workspace.store, limit)?,
        ListKind::Relations => list_relations(&workspace.store, limit)?,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listing.json).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            println!("{}", listing.headers.join(","));
            for row in &listing.rows {
                let cells: Vec<String> = row.iter().map(|c| escape_csv(c)).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if listing.rows.is_empty() {
                println!("No records found.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(listing.headers.iter().copied());
            for row in &listing.rows {
                builder.push_record(row.iter().map(|c| truncate_str(first_line(c), 48)));
            }
            println!("{}", builder.build().with(Style::rounded()));
            if !global.quiet {
                println!(
                    "{} record(s) found",
                    style(listing.rows.len()).cyan()
                );
            }
        }
    }
    Ok(())
}

/// Term id to name across every taxonomy
fn term_names(store: &ArchiveStore) -> Result<HashMap<i64, String>> {
    let mut names = HashMap::new();
    for taxonomy in Taxonomy::all() {
        let terms = store.load_terms(*taxonomy).into_diagnostic()?;
        names.extend(terms.iter().map(|(id, name)| (id, name.to_string())));
    }
    Ok(names)
}

fn term(names: &HashMap<i64, String>, id: Option<i64>) -> String {
    id.and_then(|id| names.get(&id).cloned()).unwrap_or_default()
}

fn list_accessions(store: &ArchiveStore, limit: usize) -> Result<Listing> {
    let names = term_names(store)?;
    let accessions: Vec<_> = store
        .list_accessions()
        .into_diagnostic()?
        .into_iter()
        .take(limit)
        .collect();

    let rows = accessions
        .iter()
        .map(|a| {
            vec![
                a.id.map(|id| id.to_string()).unwrap_or_default(),
                a.identifier.clone(),
                a.title.clone(),
                a.date.map(|d| d.to_string()).unwrap_or_default(),
                term(&names, a.resource_type_id),
                a.received_extent_units.clone(),
            ]
        })
        .collect();

    Ok(Listing {
        headers: vec!["ID", "NUMBER", "TITLE", "ACQUIRED", "TYPE", "EXTENT"],
        rows,
        json: serde_json::to_value(&accessions).into_diagnostic()?,
    })
}

fn list_actors(store: &ArchiveStore, limit: usize) -> Result<Listing> {
    let names = term_names(store)?;
    let actors: Vec<_> = store
        .list_actors()
        .into_diagnostic()?
        .into_iter()
        .take(limit)
        .collect();

    let mut rows = Vec::with_capacity(actors.len());
    for actor in &actors {
        let other_names = match actor.id {
            Some(id) => store
                .other_names_for(id)
                .into_diagnostic()?
                .into_iter()
                .map(|o| o.name)
                .collect::<Vec<_>>()
                .join("; "),
            None => String::new(),
        };
        rows.push(vec![
            actor.id.map(|id| id.to_string()).unwrap_or_default(),
            actor.authorized_form_of_name.clone(),
            term(&names, actor.entity_type_id),
            actor.dates_of_existence.clone(),
            other_names,
        ]);
    }

    Ok(Listing {
        headers: vec!["ID", "NAME", "TYPE", "DATES", "OTHER NAMES"],
        rows,
        json: serde_json::to_value(&actors).into_diagnostic()?,
    })
}

fn list_relations(store: &ArchiveStore, limit: usize) -> Result<Listing> {
    let names = term_names(store)?;

    let mut labels: HashMap<i64, String> = HashMap::new();
    for accession in store.list_accessions().into_diagnostic()? {
        if let Some(id) = accession.id {
            labels.insert(id, accession.identifier);
        }
    }
    for actor in store.list_actors().into_diagnostic()? {
        if let Some(id) = actor.id {
            labels.insert(id, actor.authorized_form_of_name);
        }
    }
    let label = |id: i64| labels.get(&id).cloned().unwrap_or_else(|| id.to_string());

    let relations: Vec<_> = store
        .list_relations()
        .into_diagnostic()?
        .into_iter()
        .take(limit)
        .collect();

    let rows = relations
        .iter()
        .map(|r| {
            let span = match (&r.start_date, &r.end_date) {
                (None, None) => r.date.clone().unwrap_or_default(),
                (start, end) => format!(
                    "{} - {}",
                    start.as_deref().unwrap_or("?"),
                    end.as_deref().unwrap_or("?")
                ),
            };
            vec![
                r.id.map(|id| id.to_string()).unwrap_or_default(),
                label(r.subject_id),
                term(&names, Some(r.type_id)),
                label(r.object_id),
                span,
            ]
        })
        .collect();

    Ok(Listing {
        headers: vec!["ID", "SUBJECT", "TYPE", "OBJECT", "DATE"],
        rows,
        json: serde_json::to_value(&relations).into_diagnostic()?,
    })
}
