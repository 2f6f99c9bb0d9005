//! Controlled vocabulary storage

use rusqlite::params;

use super::{ArchiveStore, StoreError};
use crate::core::taxonomy::{Taxonomy, TermList};

impl ArchiveStore {
    /// Insert the default terms of every taxonomy
    pub(super) fn seed_terms(&self) -> Result<(), StoreError> {
        for taxonomy in Taxonomy::all() {
            for name in taxonomy.default_terms() {
                self.add_term(*taxonomy, name)?;
            }
        }
        Ok(())
    }

    /// Add a term, returning the id of the new or existing term
    pub fn add_term(&self, taxonomy: Taxonomy, name: &str) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO terms (taxonomy, name) VALUES (?1, ?2)",
            params![taxonomy.as_str(), name],
        )?;
        Ok(self.conn.query_row(
            "SELECT id FROM terms WHERE taxonomy = ?1 AND name = ?2",
            params![taxonomy.as_str(), name],
            |row| row.get(0),
        )?)
    }

    /// Load every term of a taxonomy
    pub fn load_terms(&self, taxonomy: Taxonomy) -> Result<TermList, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM terms WHERE taxonomy = ?1 ORDER BY id")?;
        let terms = stmt
            .query_map(params![taxonomy.as_str()], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TermList::new(terms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_terms_are_seeded() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let types = store.load_terms(Taxonomy::ActorEntityType).unwrap();

        assert_eq!(types.len(), 3);
        assert!(types.id_for("Person").is_some());
        assert!(types.id_for("person").is_none());
    }

    #[test]
    fn test_add_term_is_idempotent() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let first = store.add_term(Taxonomy::AcquisitionType, "Bequest").unwrap();
        let second = store.add_term(Taxonomy::AcquisitionType, "Bequest").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load_terms(Taxonomy::AcquisitionType).unwrap().len(), 5);
    }
}
