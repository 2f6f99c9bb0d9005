//! Database schema initialization

use rusqlite::params;

use super::{ArchiveStore, StoreError, SCHEMA_VERSION};

impl ArchiveStore {
    /// Create all tables
    pub(super) fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Key/value settings (accession counter, ...)
            CREATE TABLE IF NOT EXISTS settings (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Controlled vocabularies
            CREATE TABLE IF NOT EXISTS terms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                taxonomy TEXT NOT NULL,
                name TEXT NOT NULL,
                UNIQUE (taxonomy, name)
            );
            CREATE INDEX IF NOT EXISTS idx_terms_taxonomy ON terms(taxonomy);

            -- Id allocation shared by every record kind
            CREATE TABLE IF NOT EXISTS objects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS accessions (
                id INTEGER PRIMARY KEY REFERENCES objects(id) ON DELETE CASCADE,
                identifier TEXT NOT NULL UNIQUE,
                title TEXT,
                date TEXT,
                scope_and_content TEXT,
                appraisal TEXT,
                location_information TEXT,
                physical_characteristics TEXT,
                received_extent_units TEXT,
                processing_notes TEXT,
                notes TEXT,
                acquisition_type_id INTEGER REFERENCES terms(id),
                resource_type_id INTEGER REFERENCES terms(id),
                processing_status_id INTEGER REFERENCES terms(id)
            );

            CREATE TABLE IF NOT EXISTS actors (
                id INTEGER PRIMARY KEY REFERENCES objects(id) ON DELETE CASCADE,
                authorized_form_of_name TEXT NOT NULL,
                dates_of_existence TEXT,
                history TEXT,
                entity_type_id INTEGER REFERENCES terms(id)
            );
            CREATE INDEX IF NOT EXISTS idx_actors_name ON actors(authorized_form_of_name);

            CREATE TABLE IF NOT EXISTS contact_information (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                actor_id INTEGER NOT NULL REFERENCES actors(id) ON DELETE CASCADE,
                email TEXT,
                telephone TEXT,
                fax TEXT,
                street_address TEXT,
                city TEXT,
                region TEXT,
                country_code TEXT,
                postal_code TEXT,
                note TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_contact_actor ON contact_information(actor_id);

            CREATE TABLE IF NOT EXISTS other_names (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                object_id INTEGER NOT NULL REFERENCES objects(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                type TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_other_names_object ON other_names(object_id);

            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                object_id INTEGER NOT NULL REFERENCES objects(id) ON DELETE CASCADE,
                type_id INTEGER NOT NULL REFERENCES terms(id),
                content TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_notes_object ON notes(object_id);

            CREATE TABLE IF NOT EXISTS relations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id INTEGER NOT NULL REFERENCES objects(id) ON DELETE CASCADE,
                object_id INTEGER NOT NULL REFERENCES objects(id) ON DELETE CASCADE,
                type_id INTEGER NOT NULL REFERENCES terms(id),
                date TEXT,
                start_date TEXT,
                end_date TEXT,
                description TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_relations_subject ON relations(subject_id);
            CREATE INDEX IF NOT EXISTS idx_relations_object ON relations(object_id);

            -- Which import source produced which record
            CREATE TABLE IF NOT EXISTS keymap (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_name TEXT NOT NULL,
                source_id TEXT NOT NULL,
                target_id INTEGER NOT NULL REFERENCES objects(id) ON DELETE CASCADE,
                target_name TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_keymap_source ON keymap(source_name);
            "#,
        )?;

        self.conn
            .execute("INSERT INTO schema_version (version) VALUES (?1)", params![SCHEMA_VERSION])?;

        Ok(())
    }

    pub(super) fn schema_version(&self) -> Result<i32, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
            .unwrap_or(0))
    }
}
