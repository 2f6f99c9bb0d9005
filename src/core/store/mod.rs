//! SQLite-backed archive store
//!
//! The persistence collaborator of the import pipeline. It provides:
//! - find-by-natural-key lookups (accession number, actor name)
//! - create/update of target entities (accessions, actors)
//! - creation of related records (contact information, other names,
//!   notes, relations, keymap entries)
//! - deletion with cascade to everything hanging off a record
//!
//! Every accession and actor owns a row in `objects`, so ids are unique
//! across record kinds and relations can point at either.

mod accessions;
mod actors;
mod keymap;
mod relations;
mod schema;
mod terms;

use std::path::Path;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::core::config::DEFAULT_ACCESSION_MASK;
use crate::core::identity::slugify;
use crate::core::project::Project;

/// Current schema version; a mismatch asks the operator to re-init
const SCHEMA_VERSION: i32 = 1;

/// Setting that holds the last accession counter value
const ACCESSION_COUNTER: &str = "accession_counter";

/// Errors raised by the archive store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("archive database schema is version {found}, expected {expected}. Run 'fonds init --force' to recreate it.")]
    SchemaMismatch { found: i32, expected: i32 },

    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: i64 },
}

/// The archive database
pub struct ArchiveStore {
    conn: Connection,
    accession_mask: String,
}

impl ArchiveStore {
    /// Open the project's database, creating and seeding it on first use
    pub fn open(project: &Project) -> Result<Self, StoreError> {
        Self::open_path(&project.database_path())
    }

    /// Open a database file, creating and seeding it on first use
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        let needs_init = !path.exists();
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn, needs_init)
    }

    /// Fresh in-memory store with seeded taxonomies
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, true)
    }

    fn from_connection(conn: Connection, needs_init: bool) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let store = Self {
            conn,
            accession_mask: DEFAULT_ACCESSION_MASK.to_string(),
        };

        if needs_init {
            store.init_schema()?;
            store.seed_terms()?;
        } else {
            let found = store.schema_version()?;
            if found != SCHEMA_VERSION {
                return Err(StoreError::SchemaMismatch {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
        }

        Ok(store)
    }

    /// Mask used to generate accession numbers for accessions saved without one
    pub fn set_accession_mask(&mut self, mask: impl Into<String>) {
        self.accession_mask = mask.into();
    }

    pub fn get_setting(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn set_setting(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO settings (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            params![name, value],
        )?;
        Ok(())
    }

    /// Increment the accession counter and expand the mask with it
    fn next_accession_identifier(&self, today: NaiveDate) -> Result<String, StoreError> {
        let current: u64 = self
            .get_setting(ACCESSION_COUNTER)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let next = current + 1;
        self.set_setting(ACCESSION_COUNTER, &next.to_string())?;

        Ok(crate::core::identity::generate_accession_identifier(
            &self.accession_mask,
            next,
            today,
        ))
    }

    /// Allocate an object id with a slug unique across all records
    fn insert_object(&self, kind: &str, label: &str) -> Result<(i64, String), StoreError> {
        let base = slugify(label);
        let mut slug = base.clone();
        let mut n = 2;
        while self
            .conn
            .query_row("SELECT 1 FROM objects WHERE slug = ?1", params![slug], |_| Ok(()))
            .optional()?
            .is_some()
        {
            slug = format!("{}-{}", base, n);
            n += 1;
        }

        self.conn.execute(
            "INSERT INTO objects (kind, slug) VALUES (?1, ?2)",
            params![kind, slug],
        )?;
        Ok((self.conn.last_insert_rowid(), slug))
    }

    /// Delete any record by object id; related rows cascade
    pub fn delete_object(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM objects WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Delete an accession and the relations it is the subject of
    pub fn delete_accession(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_kind(id, "accession")
    }

    /// Delete an actor with its contact information, other names, notes
    /// and relations
    pub fn delete_actor(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_kind(id, "actor")
    }

    fn delete_kind(&self, id: i64, kind: &str) -> Result<bool, StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM objects WHERE id = ?1 AND kind = ?2",
            params![id, kind],
        )?;
        Ok(deleted > 0)
    }

    /// Row counts per table, for status output
    pub fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let count = |table: &str| -> Result<i64, StoreError> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?)
        };

        Ok(StoreStatistics {
            accessions: count("accessions")?,
            actors: count("actors")?,
            relations: count("relations")?,
            other_names: count("other_names")?,
            contact_information: count("contact_information")?,
            notes: count("notes")?,
        })
    }
}

/// Record counts in the archive
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreStatistics {
    pub accessions: i64,
    pub actors: i64,
    pub relations: i64,
    pub other_names: i64,
    pub contact_information: i64,
    pub notes: i64,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_and_reopens() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("archive.db");

        {
            let store = ArchiveStore::open_path(&path).unwrap();
            store.set_setting("greeting", "hello").unwrap();
        }

        let store = ArchiveStore::open_path(&path).unwrap();
        assert_eq!(store.get_setting("greeting").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_schema_mismatch_is_reported() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("archive.db");
        {
            let store = ArchiveStore::open_path(&path).unwrap();
            store
                .conn
                .execute("UPDATE schema_version SET version = 99", [])
                .unwrap();
        }

        assert!(matches!(
            ArchiveStore::open_path(&path),
            Err(StoreError::SchemaMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn test_slugs_are_unique_across_kinds() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let (_, first) = store.insert_object("accession", "Smith").unwrap();
        let (_, second) = store.insert_object("actor", "smith").unwrap();
        let (_, third) = store.insert_object("actor", "SMITH!").unwrap();

        assert_eq!(first, "smith");
        assert_eq!(second, "smith-2");
        assert_eq!(third, "smith-3");
    }

    #[test]
    fn test_delete_checks_kind() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let actor = store.create_or_fetch_actor("Parks Board").unwrap();
        let id = actor.id.unwrap();

        assert!(!store.delete_accession(id).unwrap());
        assert!(store.delete_actor(id).unwrap());
        assert!(store.get_actor(id).unwrap().is_none());
        assert!(!store.delete_object(id).unwrap());
    }

    #[test]
    fn test_accession_counter_increments() {
        let mut store = ArchiveStore::open_in_memory().unwrap();
        store.set_accession_mask("#iii");
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert_eq!(store.next_accession_identifier(day).unwrap(), "001");
        assert_eq!(store.next_accession_identifier(day).unwrap(), "002");
    }
}
