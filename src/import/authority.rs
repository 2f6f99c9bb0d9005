//! Authority record import
//!
//! Three independent passes, composed by the caller:
//! 1. [`import_aliases`] reads an optional alias file into `(authoritative,
//!    other name)` pairs
//! 2. [`import_actors`] creates or updates one actor per row, attaching the
//!    aliases, contact information and notes, and fills an [`ActorRegistry`]
//! 3. [`import_relations`] links registered actors by name

use std::collections::BTreeMap;
use std::path::Path;

use super::config::ImportConfig;
use super::context::ImportContext;
use super::engine::{FlatfileImport, ImportOutcome};
use super::error::{ImportError, RowError};
use super::rows::RowReader;
use super::target::NoTarget;
use super::ImportOptions;
use crate::core::store::ArchiveStore;
use crate::core::taxonomy::{Taxonomy, TermList};
use crate::entities::{Actor, ContactInformation, Note, OtherName, Relation};

/// Natural key column of the actor file
pub const NAME_COLUMN: &str = "name";

/// Mapped straight onto actor fields
pub const ACTOR_COLUMN_MAP: &[(&str, &str)] = &[
    (NAME_COLUMN, "authorized_form_of_name"),
    ("dates", "dates_of_existence"),
    ("history", "history"),
];

/// Captured into row variables in the actor pass
pub const ACTOR_VARIABLE_COLUMNS: &[&str] = &[
    "EntityType",
    "email",
    "notes",
    "countryCode",
    "fax",
    "telephone",
    "postalCode",
    "streetAddress",
    "region",
    MAINTENANCE_NOTES,
];

/// Actor contact columns and the contact property each fills
const CONTACT_COLUMNS: &[(&str, &str)] = &[
    ("email", "email"),
    ("notes", "note"),
    ("countryCode", "country_code"),
    ("fax", "fax"),
    ("telephone", "telephone"),
    ("postalCode", "postal_code"),
    ("streetAddress", "street_address"),
    ("region", "region"),
];

/// Column written as a Maintenance note
const MAINTENANCE_NOTES: &str = "maintenanceNotes";

pub const ALIAS_VARIABLE_COLUMNS: &[&str] = &["parentAuthority", "OtherName", "email"];

pub const RELATION_VARIABLE_COLUMNS: &[&str] = &[
    "Source_Name",
    "Target_Name",
    "Relationship_Category",
    "Relationship_Date",
    "Relationship_StartDate",
    "Relationship_EndDate",
    "Relationship_Description",
];

/// Legacy record id, never imported
const RECORD_ID: &str = "RecordID";

/// An alternate name for an authoritative actor name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub authoritative: String,
    pub other_name: String,
}

/// Actor name to id, filled by the actor pass and read by the relation pass
///
/// The first id recorded for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorRegistry {
    names: BTreeMap<String, i64>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, id: i64) {
        self.names.entry(name.to_string()).or_insert(id);
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Shared state of the alias pass
#[derive(Debug, Default)]
pub struct AliasStatus {
    pub aliases: Vec<Alias>,
}

type AliasCtx<'a> = ImportContext<'a, NoTarget, AliasStatus>;

pub fn configure_aliases() -> ImportConfig<NoTarget, AliasStatus> {
    ImportConfig::new()
        .ignore(&[RECORD_ID])
        .capture(ALIAS_VARIABLE_COLUMNS)
        .on_save(collect_alias)
}

/// Read `(parentAuthority, OtherName)` pairs from an alias file
pub fn import_aliases(
    store: &ArchiveStore,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportOutcome<AliasStatus>, ImportError> {
    let rows = RowReader::open(path, 0)?;
    let import = FlatfileImport::new(configure_aliases(), store, AliasStatus::default(), options.error_log()?);
    Ok(import.run(rows))
}

fn collect_alias(ctx: &mut AliasCtx<'_>) -> Result<(), RowError> {
    let Some(other_name) = ctx.var("OtherName").map(str::to_string) else {
        return Ok(());
    };
    let authoritative = ctx.vars.get_or_empty("parentAuthority").trim().to_string();

    ctx.status_mut().aliases.push(Alias {
        authoritative,
        other_name,
    });
    Ok(())
}

/// Shared state of the actor pass: vocabularies, aliases and the name registry
#[derive(Debug)]
pub struct AuthorityStatus {
    pub entity_types: TermList,
    pub maintenance_note_type: i64,
    pub aliases: Vec<Alias>,
    pub registry: ActorRegistry,
}

impl AuthorityStatus {
    pub fn load(store: &ArchiveStore, aliases: Vec<Alias>) -> Result<Self, ImportError> {
        let note_types = store.load_terms(Taxonomy::NoteType)?;
        let maintenance_note_type =
            note_types
                .id_for("Maintenance note")
                .ok_or_else(|| ImportError::MissingTerm {
                    taxonomy: Taxonomy::NoteType.to_string(),
                    name: "Maintenance note".to_string(),
                })?;

        Ok(Self {
            entity_types: store.load_terms(Taxonomy::ActorEntityType)?,
            maintenance_note_type,
            aliases,
            registry: ActorRegistry::new(),
        })
    }
}

type ActorCtx<'a> = ImportContext<'a, Actor, AuthorityStatus>;

pub fn configure_actors(options: &ImportOptions, source_name: &str) -> ImportConfig<Actor, AuthorityStatus> {
    let mut config = ImportConfig::new()
        .capture(ACTOR_VARIABLE_COLUMNS)
        .on_row_init(find_or_create_actor)
        .on_pre_save(resolve_entity_type)
        .on_post_save(attach_related_records)
        .rows_until_update(options.rows_until_update)
        .source_name(source_name);

    for &(column, field) in ACTOR_COLUMN_MAP {
        config = config.map_column(column, field);
    }
    config
}

/// Import actors from `path`, attaching `aliases` by authoritative name
pub fn import_actors(
    store: &ArchiveStore,
    path: &Path,
    aliases: Vec<Alias>,
    options: &ImportOptions,
) -> Result<ImportOutcome<AuthorityStatus>, ImportError> {
    let rows = RowReader::open(path, options.skip_rows)?;
    let source_name = options.source_name_for(path);
    let status = AuthorityStatus::load(store, aliases)?;

    let import = FlatfileImport::new(configure_actors(options, &source_name), store, status, options.error_log()?);
    Ok(import.run(rows))
}

fn find_or_create_actor(ctx: &mut ActorCtx<'_>) -> Result<(), RowError> {
    let name = ctx
        .raw(NAME_COLUMN)
        .map(str::trim)
        .ok_or_else(|| RowError::MissingValue(NAME_COLUMN.to_string()))?;

    let actor = match ctx.store().find_actor_by_name(name)? {
        Some(existing) => existing,
        None => Actor::new(name),
    };
    ctx.object = Some(actor);
    Ok(())
}

/// `person` and `PERSON` both match the `Person` term
fn capitalize(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn resolve_entity_type(ctx: &mut ActorCtx<'_>) -> Result<(), RowError> {
    let Some(raw) = ctx.var("EntityType") else {
        return Ok(());
    };
    let entity_type = capitalize(raw);
    let id = ctx
        .status()
        .entity_types
        .id_for(&entity_type)
        .ok_or(RowError::InvalidEntityType(entity_type))?;

    if let Some(actor) = ctx.object.as_mut() {
        actor.entity_type_id = Some(id);
    }
    Ok(())
}

fn attach_related_records(ctx: &mut ActorCtx<'_>) -> Result<(), RowError> {
    let Some((actor_id, name)) = ctx
        .object
        .as_ref()
        .and_then(|a| Some((a.id?, a.authorized_form_of_name.clone())))
    else {
        return Ok(());
    };
    let store = ctx.store();

    ctx.status_mut().registry.record(&name, actor_id);

    let other_names: Vec<String> = ctx
        .status()
        .aliases
        .iter()
        .filter(|alias| alias.authoritative == name)
        .map(|alias| alias.other_name.clone())
        .collect();
    let existing: Vec<String> = store
        .other_names_for(actor_id)?
        .into_iter()
        .map(|o| o.name)
        .collect();
    for other_name in other_names {
        if existing.contains(&other_name) {
            continue;
        }
        if let Err(e) = store.save_other_name(&mut OtherName::other_form(actor_id, other_name)) {
            ctx.log_error(&RowError::Store(e));
        }
    }

    let mut info = ContactInformation::new(actor_id);
    for (column, property) in CONTACT_COLUMNS {
        if let Some(value) = ctx.var(column) {
            let known = info.set(property, value);
            debug_assert!(known, "unknown contact property {}", property);
        }
    }
    if !info.is_empty() {
        if let Err(e) = store.create_or_fetch_contact_information(info) {
            ctx.log_error(&RowError::Store(e));
        }
    }

    if let Some(content) = ctx.var(MAINTENANCE_NOTES).map(str::to_string) {
        let mut note = Note {
            id: None,
            object_id: actor_id,
            type_id: ctx.status().maintenance_note_type,
            content,
        };
        if let Err(e) = store.save_note(&mut note) {
            ctx.log_error(&RowError::Store(e));
        }
    }

    Ok(())
}

/// Shared state of the relation pass
#[derive(Debug)]
pub struct RelationStatus {
    pub relation_types: TermList,
    pub registry: ActorRegistry,
}

impl RelationStatus {
    pub fn load(store: &ArchiveStore, registry: ActorRegistry) -> Result<Self, ImportError> {
        Ok(Self {
            relation_types: store.load_terms(Taxonomy::ActorRelationType)?,
            registry,
        })
    }
}

type RelationCtx<'a> = ImportContext<'a, NoTarget, RelationStatus>;

pub fn configure_relations(options: &ImportOptions) -> ImportConfig<NoTarget, RelationStatus> {
    ImportConfig::new()
        .ignore(&[RECORD_ID])
        .capture(RELATION_VARIABLE_COLUMNS)
        .on_save(link_actors)
        .rows_until_update(options.rows_until_update)
}

/// Import actor-to-actor relations, resolving names through `registry`
pub fn import_relations(
    store: &ArchiveStore,
    path: &Path,
    registry: ActorRegistry,
    options: &ImportOptions,
) -> Result<ImportOutcome<RelationStatus>, ImportError> {
    let rows = RowReader::open(path, 0)?;
    let status = RelationStatus::load(store, registry)?;
    let import = FlatfileImport::new(configure_relations(options), store, status, options.error_log()?);
    Ok(import.run(rows))
}

fn link_actors(ctx: &mut RelationCtx<'_>) -> Result<(), RowError> {
    let status = ctx.status();
    let type_id = status.relation_types.translate(
        "relationship category",
        ctx.vars.get_or_empty("Relationship_Category"),
        &[],
    )?;

    let resolve = |column: &str| {
        let name = ctx.vars.get_or_empty(column).trim();
        status
            .registry
            .resolve(name)
            .ok_or_else(|| RowError::MissingActor(name.to_string()))
    };
    let subject_id = resolve("Source_Name")?;
    let object_id = resolve("Target_Name")?;

    let mut relation = Relation::new(subject_id, object_id, type_id);
    relation.date = ctx.var("Relationship_Date").map(str::to_string);
    relation.start_date = ctx.var("Relationship_StartDate").map(str::to_string);
    relation.end_date = ctx.var("Relationship_EndDate").map(str::to_string);
    relation.description = ctx.var("Relationship_Description").map(str::to_string);

    ctx.store().save_relation(&mut relation)?;
    ctx.mark_created();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::log::ErrorLog;

    fn options() -> ImportOptions {
        ImportOptions {
            rows_until_update: 0,
            ..Default::default()
        }
    }

    fn reader<'a>(csv: &'a str, name: &str) -> RowReader<&'a [u8]> {
        RowReader::from_reader(csv.as_bytes(), 0, Path::new(name)).unwrap()
    }

    fn aliases(store: &ArchiveStore, csv: &str) -> Vec<Alias> {
        FlatfileImport::new(configure_aliases(), store, AliasStatus::default(), ErrorLog::new())
            .run(reader(csv, "aliases.csv"))
            .status
            .aliases
    }

    fn actors(store: &ArchiveStore, csv: &str, aliases: Vec<Alias>) -> ImportOutcome<AuthorityStatus> {
        let status = AuthorityStatus::load(store, aliases).unwrap();
        FlatfileImport::new(configure_actors(&options(), "actors.csv"), store, status, ErrorLog::new())
            .run(reader(csv, "actors.csv"))
    }

    fn relations(store: &ArchiveStore, csv: &str, registry: ActorRegistry) -> ImportOutcome<RelationStatus> {
        let status = RelationStatus::load(store, registry).unwrap();
        FlatfileImport::new(configure_relations(&options()), store, status, ErrorLog::new())
            .run(reader(csv, "relations.csv"))
    }

    #[test]
    fn test_alias_becomes_other_name() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let found = aliases(
            &store,
            "RecordID,parentAuthority,OtherName,email\n\
             1,\"Smith, John\",J. Smith,\n\
             2,\"Smith, John\",,\n",
        );
        assert_eq!(
            found,
            vec![Alias {
                authoritative: "Smith, John".to_string(),
                other_name: "J. Smith".to_string(),
            }]
        );

        let outcome = actors(&store, "name\n\"Smith, John\"\n", found);
        assert!(outcome.log.is_empty());

        let all = store.list_actors().unwrap();
        assert_eq!(all.len(), 1);
        let other_names = store.other_names_for(all[0].id.unwrap()).unwrap();
        assert_eq!(other_names.len(), 1);
        assert_eq!(other_names[0].name, "J. Smith");
    }

    #[test]
    fn test_actor_fields_contact_and_notes() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let outcome = actors(
            &store,
            "name,dates,history,EntityType,email,region,maintenanceNotes\n\
             Parks Board,1888-,Runs the parks,CORPORATE BODY,parks@example.org,BC,Imported\n",
            vec![],
        );
        assert!(outcome.log.is_empty(), "{:?}", outcome.log.entries());

        let actor = store.find_actor_by_name("Parks Board").unwrap().unwrap();
        let id = actor.id.unwrap();
        assert_eq!(actor.dates_of_existence, "1888-");
        assert_eq!(actor.entity_type_id, outcome.status.entity_types.id_for("Corporate body"));
        assert_eq!(outcome.status.registry.resolve("Parks Board"), Some(id));

        let contacts = store.contact_information_for(id).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].region.as_deref(), Some("BC"));

        let notes = store.notes_for(id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].type_id, outcome.status.maintenance_note_type);
    }

    #[test]
    fn test_invalid_entity_type_skips_row() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let outcome = actors(&store, "name,EntityType\nGhost,Spirit\n", vec![]);

        assert_eq!(outcome.log.len(), 1);
        assert_eq!(outcome.log.entries()[0].message, "Spirit is not a valid actor entity type");
        assert!(store.list_actors().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_names_share_one_actor() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let outcome = actors(&store, "name,history\nSmith,first\nSmith,second\n", vec![]);

        assert_eq!(outcome.stats.entities_created, 1);
        assert_eq!(outcome.stats.entities_updated, 1);
        assert_eq!(store.list_actors().unwrap()[0].history, "second");
        assert_eq!(outcome.status.registry.len(), 1);
    }

    #[test]
    fn test_relations_resolve_through_registry() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let registry = actors(&store, "name\nSmith\nJones\n", vec![]).status.registry;

        let outcome = relations(
            &store,
            "RecordID,Source_Name,Target_Name,Relationship_Category,Relationship_Date,Relationship_StartDate,Relationship_EndDate,Relationship_Description\n\
             1,Smith,Jones,associative,1920,,,Partners\n\
             2,Smith,Nobody,associative,,,,\n\
             3,Smith,Jones,cosmic,,,,\n",
            registry.clone(),
        );

        assert_eq!(outcome.stats.rows_processed, 3);
        assert_eq!(outcome.stats.entities_created, 1);

        let messages: Vec<_> = outcome.log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Actor \"Nobody\" does not exist",
                "unknown relationship category 'cosmic'"
            ]
        );

        let saved = store.list_relations().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].subject_id, registry.resolve("Smith").unwrap());
        assert_eq!(saved[0].date.as_deref(), Some("1920"));
        assert_eq!(saved[0].start_date, None);
        assert_eq!(saved[0].description.as_deref(), Some("Partners"));
    }

    #[test]
    fn test_registry_first_id_wins() {
        let mut registry = ActorRegistry::new();
        registry.record("Smith", 1);
        registry.record("Smith", 2);
        assert_eq!(registry.resolve("Smith"), Some(1));
        assert_eq!(registry.resolve("Jones"), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("PERSON"), "Person");
        assert_eq!(capitalize(" corporate body "), "Corporate body");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_failed_note_only_loses_the_note() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let status = AuthorityStatus {
            entity_types: store.load_terms(Taxonomy::ActorEntityType).unwrap(),
            // no such term, so saving the note breaks the foreign key
            maintenance_note_type: 999_999,
            aliases: vec![Alias {
                authoritative: "Smith".to_string(),
                other_name: "J. Smith".to_string(),
            }],
            registry: ActorRegistry::new(),
        };
        let outcome = FlatfileImport::new(configure_actors(&options(), "actors.csv"), &store, status, ErrorLog::new())
            .run(reader(
                "name,email,maintenanceNotes
                 Smith,smith@example.org,Revised
                 Jones,,
",
                "actors.csv",
            ));

        assert_eq!(outcome.log.len(), 1);
        assert_eq!(outcome.log.entries()[0].row, Some(1));

        let smith = store.find_actor_by_name("Smith").unwrap().unwrap();
        let id = smith.id.unwrap();
        assert_eq!(store.other_names_for(id).unwrap().len(), 1);
        assert_eq!(store.contact_information_for(id).unwrap().len(), 1);
        assert!(store.notes_for(id).unwrap().is_empty());
        assert_eq!(outcome.status.registry.resolve("Smith"), Some(id));

        assert!(store.find_actor_by_name("Jones").unwrap().is_some());
        assert_eq!(outcome.stats.entities_created, 2);
    }

    #[test]
    fn test_contact_columns_name_known_properties() {
        for (column, property) in CONTACT_COLUMNS {
            assert!(ContactInformation::PROPERTIES.contains(property), "{}", column);
        }
    }
}
