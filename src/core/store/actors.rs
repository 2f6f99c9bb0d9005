//! Actor persistence and the records that hang off an actor

use rusqlite::{params, OptionalExtension, Row};

use super::{ArchiveStore, StoreError};
use crate::core::entity::non_empty;
use crate::entities::{Actor, ContactInformation, Note, OtherName};

fn actor_from_row(row: &Row<'_>) -> rusqlite::Result<Actor> {
    Ok(Actor {
        id: Some(row.get(0)?),
        slug: row.get(1)?,
        authorized_form_of_name: row.get(2)?,
        dates_of_existence: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        history: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        entity_type_id: row.get(5)?,
    })
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<ContactInformation> {
    Ok(ContactInformation {
        id: Some(row.get(0)?),
        actor_id: row.get(1)?,
        email: row.get(2)?,
        telephone: row.get(3)?,
        fax: row.get(4)?,
        street_address: row.get(5)?,
        city: row.get(6)?,
        region: row.get(7)?,
        country_code: row.get(8)?,
        postal_code: row.get(9)?,
        note: row.get(10)?,
    })
}

const ACTOR_SELECT: &str = "SELECT a.id, o.slug, a.authorized_form_of_name, a.dates_of_existence, \
     a.history, a.entity_type_id FROM actors a JOIN objects o ON o.id = a.id";

impl ArchiveStore {
    /// First actor (lowest id) with exactly this authorized name
    pub fn find_actor_by_name(&self, name: &str) -> Result<Option<Actor>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("{} WHERE a.authorized_form_of_name = ?1 ORDER BY a.id LIMIT 1", ACTOR_SELECT),
                params![name],
                actor_from_row,
            )
            .optional()?)
    }

    pub fn get_actor(&self, id: i64) -> Result<Option<Actor>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("{} WHERE a.id = ?1", ACTOR_SELECT),
                params![id],
                actor_from_row,
            )
            .optional()?)
    }

    pub fn list_actors(&self) -> Result<Vec<Actor>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY a.id", ACTOR_SELECT))?;
        let rows = stmt
            .query_map([], actor_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Fetch the actor with this name, creating it when absent
    pub fn create_or_fetch_actor(&self, name: &str) -> Result<Actor, StoreError> {
        if let Some(actor) = self.find_actor_by_name(name)? {
            return Ok(actor);
        }
        let mut actor = Actor::new(name);
        self.save_actor(&mut actor)?;
        Ok(actor)
    }

    /// Insert or update an actor, returning its id
    pub fn save_actor(&self, actor: &mut Actor) -> Result<i64, StoreError> {
        let tx = self.conn.unchecked_transaction()?;

        let id = match actor.id {
            Some(id) => {
                let updated = self.conn.execute(
                    "UPDATE actors SET authorized_form_of_name = ?2, dates_of_existence = ?3,
                        history = ?4, entity_type_id = ?5
                     WHERE id = ?1",
                    params![
                        id,
                        actor.authorized_form_of_name,
                        non_empty(&actor.dates_of_existence),
                        non_empty(&actor.history),
                        actor.entity_type_id,
                    ],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound { kind: "actor", id });
                }
                id
            }
            None => {
                let (id, slug) = self.insert_object("actor", &actor.authorized_form_of_name)?;
                self.conn.execute(
                    "INSERT INTO actors (id, authorized_form_of_name, dates_of_existence, history, entity_type_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        id,
                        actor.authorized_form_of_name,
                        non_empty(&actor.dates_of_existence),
                        non_empty(&actor.history),
                        actor.entity_type_id,
                    ],
                )?;
                actor.id = Some(id);
                actor.slug = Some(slug);
                id
            }
        };

        tx.commit()?;
        Ok(id)
    }

    pub fn contact_information_for(&self, actor_id: i64) -> Result<Vec<ContactInformation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, actor_id, email, telephone, fax, street_address, city, region,
                    country_code, postal_code, note
             FROM contact_information WHERE actor_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![actor_id], contact_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn save_contact_information(&self, info: &mut ContactInformation) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO contact_information (actor_id, email, telephone, fax, street_address,
                city, region, country_code, postal_code, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                info.actor_id,
                info.email,
                info.telephone,
                info.fax,
                info.street_address,
                info.city,
                info.region,
                info.country_code,
                info.postal_code,
                info.note,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info.id = Some(id);
        Ok(id)
    }

    /// Reuse an existing contact record with the same details, else create one
    pub fn create_or_fetch_contact_information(
        &self,
        mut info: ContactInformation,
    ) -> Result<ContactInformation, StoreError> {
        if let Some(existing) = self
            .contact_information_for(info.actor_id)?
            .into_iter()
            .find(|existing| existing.same_details(&info))
        {
            return Ok(existing);
        }
        self.save_contact_information(&mut info)?;
        Ok(info)
    }

    pub fn save_other_name(&self, other_name: &mut OtherName) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO other_names (object_id, name, type) VALUES (?1, ?2, ?3)",
            params![other_name.object_id, other_name.name, other_name.name_type.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();
        other_name.id = Some(id);
        Ok(id)
    }

    pub fn other_names_for(&self, object_id: i64) -> Result<Vec<OtherName>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, object_id, name, type FROM other_names WHERE object_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![object_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(id, object_id, name, kind)| OtherName {
                id: Some(id),
                object_id,
                name,
                name_type: kind.parse().unwrap_or_default(),
            })
            .collect())
    }

    pub fn save_note(&self, note: &mut Note) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO notes (object_id, type_id, content) VALUES (?1, ?2, ?3)",
            params![note.object_id, note.type_id, note.content],
        )?;
        let id = self.conn.last_insert_rowid();
        note.id = Some(id);
        Ok(id)
    }

    pub fn notes_for(&self, object_id: i64) -> Result<Vec<Note>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, object_id, type_id, content FROM notes WHERE object_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![object_id], |row| {
                Ok(Note {
                    id: Some(row.get(0)?),
                    object_id: row.get(1)?,
                    type_id: row.get(2)?,
                    content: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
