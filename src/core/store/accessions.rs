//! Accession persistence

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{today, ArchiveStore, StoreError};
use crate::core::entity::non_empty;
use crate::entities::Accession;

const ACCESSION_COLUMNS: &str = "a.id, o.slug, a.identifier, a.title, a.date, a.scope_and_content, \
     a.appraisal, a.location_information, a.physical_characteristics, a.received_extent_units, \
     a.processing_notes, a.notes, a.acquisition_type_id, a.resource_type_id, a.processing_status_id";

fn accession_from_row(row: &Row<'_>) -> rusqlite::Result<Accession> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let date: Option<String> = row.get(4)?;

    Ok(Accession {
        id: Some(row.get(0)?),
        slug: row.get(1)?,
        identifier: row.get(2)?,
        title: text(3)?,
        date: date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        scope_and_content: text(5)?,
        appraisal: text(6)?,
        location_information: text(7)?,
        physical_characteristics: text(8)?,
        received_extent_units: text(9)?,
        processing_notes: text(10)?,
        notes: text(11)?,
        acquisition_type_id: row.get(12)?,
        resource_type_id: row.get(13)?,
        processing_status_id: row.get(14)?,
    })
}

impl ArchiveStore {
    /// Look up an accession by accession number
    pub fn find_accession_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Accession>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM accessions a JOIN objects o ON o.id = a.id WHERE a.identifier = ?1",
                    ACCESSION_COLUMNS
                ),
                params![identifier],
                accession_from_row,
            )
            .optional()?)
    }

    pub fn get_accession(&self, id: i64) -> Result<Option<Accession>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM accessions a JOIN objects o ON o.id = a.id WHERE a.id = ?1",
                    ACCESSION_COLUMNS
                ),
                params![id],
                accession_from_row,
            )
            .optional()?)
    }

    pub fn list_accessions(&self) -> Result<Vec<Accession>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM accessions a JOIN objects o ON o.id = a.id ORDER BY a.id",
            ACCESSION_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], accession_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert or update an accession, returning its id
    ///
    /// On insert, an empty accession number is generated from the accession
    /// mask and a slug is derived from the accession number.
    pub fn save_accession(&self, accession: &mut Accession) -> Result<i64, StoreError> {
        let tx = self.conn.unchecked_transaction()?;

        let id = match accession.id {
            Some(id) => {
                let updated = self.conn.execute(
                    "UPDATE accessions SET identifier = ?2, title = ?3, date = ?4,
                        scope_and_content = ?5, appraisal = ?6, location_information = ?7,
                        physical_characteristics = ?8, received_extent_units = ?9,
                        processing_notes = ?10, notes = ?11, acquisition_type_id = ?12,
                        resource_type_id = ?13, processing_status_id = ?14
                     WHERE id = ?1",
                    params![
                        id,
                        accession.identifier,
                        non_empty(&accession.title),
                        accession.date.map(|d| d.format("%Y-%m-%d").to_string()),
                        non_empty(&accession.scope_and_content),
                        non_empty(&accession.appraisal),
                        non_empty(&accession.location_information),
                        non_empty(&accession.physical_characteristics),
                        non_empty(&accession.received_extent_units),
                        non_empty(&accession.processing_notes),
                        non_empty(&accession.notes),
                        accession.acquisition_type_id,
                        accession.resource_type_id,
                        accession.processing_status_id,
                    ],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound {
                        kind: "accession",
                        id,
                    });
                }
                id
            }
            None => {
                if accession.identifier.trim().is_empty() {
                    accession.identifier = self.next_accession_identifier(today())?;
                }
                let (id, slug) = self.insert_object("accession", &accession.identifier)?;
                self.conn.execute(
                    "INSERT INTO accessions (id, identifier, title, date, scope_and_content,
                        appraisal, location_information, physical_characteristics,
                        received_extent_units, processing_notes, notes, acquisition_type_id,
                        resource_type_id, processing_status_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    params![
                        id,
                        accession.identifier,
                        non_empty(&accession.title),
                        accession.date.map(|d| d.format("%Y-%m-%d").to_string()),
                        non_empty(&accession.scope_and_content),
                        non_empty(&accession.appraisal),
                        non_empty(&accession.location_information),
                        non_empty(&accession.physical_characteristics),
                        non_empty(&accession.received_extent_units),
                        non_empty(&accession.processing_notes),
                        non_empty(&accession.notes),
                        accession.acquisition_type_id,
                        accession.resource_type_id,
                        accession.processing_status_id,
                    ],
                )?;
                accession.id = Some(id);
                accession.slug = Some(slug);
                id
            }
        };

        tx.commit()?;
        Ok(id)
    }
}
