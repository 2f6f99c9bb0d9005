//! Keymap persistence

use rusqlite::params;

use super::{ArchiveStore, StoreError};
use crate::entities::KeymapEntry;

impl ArchiveStore {
    pub fn insert_keymap(&self, entry: &KeymapEntry) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO keymap (source_name, source_id, target_id, target_name) VALUES (?1, ?2, ?3, ?4)",
            params![entry.source_name, entry.source_id, entry.target_id, entry.target_name],
        )?;
        Ok(())
    }

    /// Every record an import source produced, oldest first
    pub fn keymap_for_source(&self, source_name: &str) -> Result<Vec<KeymapEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT source_name, source_id, target_id, target_name FROM keymap
             WHERE source_name = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![source_name], |row| {
                Ok(KeymapEntry {
                    source_name: row.get(0)?,
                    source_id: row.get(1)?,
                    target_id: row.get(2)?,
                    target_name: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl ArchiveStore {
    /// Forget every keymap entry of a source, returning how many were removed
    pub fn delete_keymap_for_source(&self, source_name: &str) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM keymap WHERE source_name = ?1", params![source_name])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_round_trip_and_cascade() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let actor = store.create_or_fetch_actor("Smith, John").unwrap();
        let entry = KeymapEntry {
            source_name: "authorities.csv".to_string(),
            source_id: "2".to_string(),
            target_id: actor.id.unwrap(),
            target_name: "actor".to_string(),
        };
        store.insert_keymap(&entry).unwrap();

        assert_eq!(store.keymap_for_source("authorities.csv").unwrap(), vec![entry]);
        assert!(store.keymap_for_source("other.csv").unwrap().is_empty());
        assert_eq!(store.delete_keymap_for_source("other.csv").unwrap(), 0);

        store.delete_object(actor.id.unwrap()).unwrap();
        assert!(store.keymap_for_source("authorities.csv").unwrap().is_empty());
    }
}
