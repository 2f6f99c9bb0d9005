//! Accession import
//!
//! One row per accession, matched on `ACCESSION NUMBER`. Extent and
//! processing-note columns are folded into single fields with a prefix per
//! column, and a non-empty `DONOR` becomes an actor linked to the accession
//! by a Donor relation.

use chrono::NaiveDate;
use std::path::Path;

use super::accumulate::append_with_line_break_if_needed;
use super::config::ImportConfig;
use super::context::ImportContext;
use super::engine::{FlatfileImport, ImportOutcome};
use super::error::{ImportError, RowError};
use super::rows::RowReader;
use super::ImportOptions;
use crate::core::store::ArchiveStore;
use crate::core::taxonomy::{Taxonomy, TermList};
use crate::entities::{Accession, ContactInformation};

/// Natural key column
pub const ACCESSION_NUMBER: &str = "ACCESSION NUMBER";

/// Extent columns and the prefix each contributes to received extent units
pub const EXTENT_COLUMNS: &[(&str, &str)] = &[
    ("INARCHITECTURALPLAN", "Plans (count): "),
    ("INAUDIOCASSETTE", "Audio Cassettes (count): "),
    ("INAUDIOREEL", "Audio Reels (count): "),
    ("INCOMPACTDISC", "CDs (count): "),
    ("INDIGITALPHOTO", "Digital Photos (count): "),
    ("INDOCUMENTARYART", "Doc Art (count): "),
    ("INDVD", "DVDs (count): "),
    ("INFILMREEL", "Film Reels (count): "),
    ("INMAP", "Maps (count): "),
    ("INMICROFICHE", "Microfiche (count): "),
    ("INMICROFILM", "Microfilm Reels (count): "),
    ("INNEGATIVE", "Photo Negs (count): "),
    ("INOTHER MATERIALS", "Other Materials (count): "),
    ("INPHOTOGRAPHICPRINT", "Photo Prints (count): "),
    ("INSLIDE", "Slides (count): "),
    ("INTEXTUALRECORDS", "Textual (m): "),
    ("INVIDEOCASSETTE", "Video Cassettes (count): "),
];

/// Processing-note columns and their prefixes
pub const PROCESSING_NOTE_COLUMNS: &[(&str, &str)] = &[
    ("ACCESSION NOTE", ""),
    ("ACKNOWLEDGMENT", "Acknowledge Donor in Description? (Y/N): "),
    ("ARCHIVIST", "Registered by: "),
    ("CVA NUMBER", "CVA #: "),
    ("ItemNumberTracking", "Last Item #: "),
    ("PR SERIES NUMBER", "PR Series #: "),
    ("PRI REC NO", "Private Rec. #: "),
    ("RECORD ID", "CS Record ID: "),
    ("TRANSFER NUMBER", "RM Transfer #: "),
    ("VanRims Number", "Classification #: "),
    ("COPYRIGHT STATUS", "Copyright Note: "),
    ("RESTRICTIONS", "Restrictions Note: "),
];

/// Captured into row variables
pub const VARIABLE_COLUMNS: &[&str] = &[
    ACCESSION_NUMBER,
    "TYPE",
    "DONOR",
    "EMAIL",
    "POSTAL CODE",
    "TELEPHONE",
    "ADDRESS_Street",
    "ADDRESS_City",
    "ADDRESS_Province",
    "APPRAISAL NOTES",
    "DISPOSITION NOTE",
    "DATE OF CREATION",
    "DEPARTMENT",
    "CREATOR or COLLECTOR",
];

/// Mapped straight onto accession fields
pub const COLUMN_MAP: &[(&str, &str)] = &[
    ("TITLE", "title"),
    ("LOCATION", "location_information"),
    ("SCOPE AND CONTENT", "scope_and_content"),
    ("scopeAndContent", "scope_and_content"),
    ("physicalCondition", "physical_characteristics"),
    ("CONSERVATION NOTE", "physical_characteristics"),
    ("extent", "received_extent_units"),
    ("primaryNotes", "notes"),
    ("notes", "notes"),
];

/// Legacy transfer types
pub const RESOURCE_TYPE_ALIASES: &[(&str, &str)] = &[
    ("Private records", "Private transfer"),
    ("Public records", "Public transfer"),
];

/// Legacy acquisition methods
pub const ACQUISITION_TYPE_ALIASES: &[(&str, &str)] = &[
    ("Copy Loan", "Deposit"),
    ("Donation", "Gift"),
    ("Direct Transfer", "Transfer"),
    ("Scheduled Transfer", "Transfer"),
];

/// Donor contact columns and the contact property each fills
const CONTACT_COLUMNS: &[(&str, &str)] = &[
    ("EMAIL", "email"),
    ("TELEPHONE", "telephone"),
    ("ADDRESS_Street", "street_address"),
    ("ADDRESS_City", "city"),
    ("ADDRESS_Province", "region"),
    ("POSTAL CODE", "postal_code"),
];

/// Appraisal variables and their prefixes, in output order
const APPRAISAL_VARS: &[(&str, &str)] = &[
    ("DISPOSITION NOTE", ""),
    ("APPRAISAL NOTES", "Appraisal Notes: "),
];

const EXTENT_VAR: &str = "receivedExtentUnits";
const PROCESSING_NOTES_VAR: &str = "processingNotes";

/// Date formats accepted in `DATE OF ACQUISITION`
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y", "%b %d, %Y"];

/// Terms resolved once per run
#[derive(Debug)]
pub struct AccessionStatus {
    pub acquisition_types: TermList,
    pub resource_types: TermList,
    /// Relation type linking an accession to its donor
    pub donor_relation_type: i64,
}

impl AccessionStatus {
    pub fn load(store: &ArchiveStore) -> Result<Self, ImportError> {
        let relation_types = store.load_terms(Taxonomy::RelationType)?;
        let donor_relation_type = relation_types.id_for("Donor").ok_or_else(|| ImportError::MissingTerm {
            taxonomy: Taxonomy::RelationType.to_string(),
            name: "Donor".to_string(),
        })?;

        Ok(Self {
            acquisition_types: store.load_terms(Taxonomy::AcquisitionType)?,
            resource_types: store.load_terms(Taxonomy::ResourceType)?,
            donor_relation_type,
        })
    }
}

type Ctx<'a> = ImportContext<'a, Accession, AccessionStatus>;

/// Build the accession import configuration
pub fn configure(options: &ImportOptions, source_name: &str) -> ImportConfig<Accession, AccessionStatus> {
    let mut config = ImportConfig::new()
        .capture(VARIABLE_COLUMNS)
        .handle_all(EXTENT_COLUMNS.iter().map(|(c, _)| *c), extent_column)
        .handle_all(PROCESSING_NOTE_COLUMNS.iter().map(|(c, _)| *c), processing_note_column)
        .handle("DATE OF ACQUISITION", date_of_acquisition)
        .handle("TYPE", transfer_type)
        .handle("ACQUISITION METHOD", acquisition_method)
        .on_row_init(find_or_create_accession)
        .on_pre_save(amalgamate_fields)
        .on_post_save(link_donor)
        .rows_until_update(options.rows_until_update)
        .source_name(source_name)
        .key_column(ACCESSION_NUMBER);

    for &(column, field) in COLUMN_MAP {
        config = config.map_column(column, field);
    }
    config
}

/// Import accessions from `path`
pub fn import_accessions(
    store: &ArchiveStore,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportOutcome<AccessionStatus>, ImportError> {
    let rows = RowReader::open(path, options.skip_rows)?;
    let source_name = options.source_name_for(path);
    let status = AccessionStatus::load(store)?;
    let log = options.error_log()?;

    let import = FlatfileImport::new(configure(options, &source_name), store, status, log);
    Ok(import.run(rows))
}

fn find_or_create_accession(ctx: &mut Ctx<'_>) -> Result<(), RowError> {
    let number = ctx.raw(ACCESSION_NUMBER).unwrap_or("");

    let accession = match ctx.store().find_accession_by_identifier(number)? {
        Some(existing) if !number.is_empty() => {
            tracing::debug!(id = ?existing.id, number, "found accession");
            existing
        }
        _ => {
            tracing::debug!(number, "accession not found, creating");
            Accession::new(number)
        }
    };

    ctx.object = Some(accession);
    Ok(())
}

fn extent_column(ctx: &mut Ctx<'_>, value: &str) -> Result<(), RowError> {
    if let Some(column) = ctx.column().map(str::to_string) {
        ctx.accumulate_column(EXTENT_VAR, EXTENT_COLUMNS, &column, value);
    }
    Ok(())
}

fn processing_note_column(ctx: &mut Ctx<'_>, value: &str) -> Result<(), RowError> {
    if let Some(column) = ctx.column().map(str::to_string) {
        ctx.accumulate_column(PROCESSING_NOTES_VAR, PROCESSING_NOTE_COLUMNS, &column, value);
    }
    Ok(())
}

fn date_of_acquisition(ctx: &mut Ctx<'_>, value: &str) -> Result<(), RowError> {
    if value.is_empty() {
        return Ok(());
    }
    let date = parse_date(value).ok_or_else(|| RowError::InvalidDate(value.to_string()))?;
    if let Some(accession) = ctx.object.as_mut() {
        accession.date = Some(date);
    }
    Ok(())
}

fn transfer_type(ctx: &mut Ctx<'_>, value: &str) -> Result<(), RowError> {
    if value.is_empty() {
        return Ok(());
    }
    let id = ctx
        .status()
        .resource_types
        .translate("transfer type", value, RESOURCE_TYPE_ALIASES)?;
    if let Some(accession) = ctx.object.as_mut() {
        accession.resource_type_id = Some(id);
    }
    Ok(())
}

fn acquisition_method(ctx: &mut Ctx<'_>, value: &str) -> Result<(), RowError> {
    if value.is_empty() {
        return Ok(());
    }
    let id = ctx
        .status()
        .acquisition_types
        .translate("acquisition type", value, ACQUISITION_TYPE_ALIASES)?;
    if let Some(accession) = ctx.object.as_mut() {
        accession.acquisition_type_id = Some(id);
    }
    Ok(())
}

fn amalgamate_fields(ctx: &mut Ctx<'_>) -> Result<(), RowError> {
    let Some(accession) = ctx.object.as_mut() else {
        return Ok(());
    };
    let vars = &ctx.vars;

    if let Some(dates) = vars.get("DATE OF CREATION") {
        append_with_line_break_if_needed(
            &mut accession.scope_and_content,
            &format!("Dates of Creation: {}", dates),
        );
    }

    if let Some(creators) = vars.get("CREATOR or COLLECTOR") {
        for creator in creators.split('|') {
            append_with_line_break_if_needed(
                &mut accession.scope_and_content,
                &format!("Creator: {}", creator.trim()),
            );
        }
    }

    if let Some(department) = vars.get("DEPARTMENT") {
        append_with_line_break_if_needed(
            &mut accession.scope_and_content,
            &format!("Creator: {}", department),
        );
    }

    if let Some(extent) = vars.get(EXTENT_VAR) {
        accession.received_extent_units = extent.to_string();
    }

    if let Some(notes) = vars.get(PROCESSING_NOTES_VAR) {
        accession.processing_notes = notes.to_string();
    }

    for (var, prefix) in APPRAISAL_VARS {
        if let Some(value) = vars.get(var) {
            append_with_line_break_if_needed(&mut accession.appraisal, &format!("{}{}", prefix, value));
        }
    }

    Ok(())
}

fn link_donor(ctx: &mut Ctx<'_>) -> Result<(), RowError> {
    let Some(accession_id) = ctx.object.as_ref().and_then(|a| a.id) else {
        return Ok(());
    };
    let Some(donor) = ctx.var("DONOR").map(str::to_string) else {
        return Ok(());
    };

    let store = ctx.store();
    let actor = store.create_or_fetch_actor(&donor)?;
    let Some(actor_id) = actor.id else {
        return Err(RowError::MissingActor(donor));
    };

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

    let donor_type = ctx.status().donor_relation_type;
    if let Err(e) = store.create_relation(accession_id, actor_id, donor_type) {
        ctx.log_error(&RowError::Store(e));
    }

    Ok(())
}

/// Parse a legacy acquisition date; a bare year or year-month means its first day
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    let parts: Vec<&str> = value.split(['-', '/']).collect();
    match parts.as_slice() {
        [year] if year.len() == 4 => NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1),
        [year, month] if year.len() == 4 => NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1),
        _ => None,
    }
}
