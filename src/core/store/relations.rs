//! Relation persistence

use rusqlite::{params, Row};

use super::{ArchiveStore, StoreError};
use crate::entities::Relation;

fn relation_from_row(row: &Row<'_>) -> rusqlite::Result<Relation> {
    Ok(Relation {
        id: Some(row.get(0)?),
        subject_id: row.get(1)?,
        object_id: row.get(2)?,
        type_id: row.get(3)?,
        date: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        description: row.get(7)?,
    })
}

const RELATION_SELECT: &str = "SELECT id, subject_id, object_id, type_id, date, start_date, \
     end_date, description FROM relations";

impl ArchiveStore {
    pub fn save_relation(&self, relation: &mut Relation) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO relations (subject_id, object_id, type_id, date, start_date, end_date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                relation.subject_id,
                relation.object_id,
                relation.type_id,
                relation.date,
                relation.start_date,
                relation.end_date,
                relation.description,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        relation.id = Some(id);
        Ok(id)
    }

    /// Create the relation unless an identical subject/object/type link exists
    pub fn create_relation(
        &self,
        subject_id: i64,
        object_id: i64,
        type_id: i64,
    ) -> Result<Relation, StoreError> {
        if let Some(existing) = self
            .relations_for_subject(subject_id)?
            .into_iter()
            .find(|r| r.object_id == object_id && r.type_id == type_id)
        {
            return Ok(existing);
        }
        let mut relation = Relation::new(subject_id, object_id, type_id);
        self.save_relation(&mut relation)?;
        Ok(relation)
    }

    pub fn relations_for_subject(&self, subject_id: i64) -> Result<Vec<Relation>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE subject_id = ?1 ORDER BY id", RELATION_SELECT))?;
        let rows = stmt
            .query_map(params![subject_id], relation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_relations(&self) -> Result<Vec<Relation>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id", RELATION_SELECT))?;
        let rows = stmt
            .query_map([], relation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::Taxonomy;
    use crate::entities::Accession;

    #[test]
    fn test_create_relation_is_idempotent() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let donor = store
            .load_terms(Taxonomy::RelationType)
            .unwrap()
            .id_for("Donor")
            .unwrap();
        let mut accession = Accession::new("A-1");
        let accession_id = store.save_accession(&mut accession).unwrap();
        let actor = store.create_or_fetch_actor("Smith, John").unwrap();

        let first = store.create_relation(accession_id, actor.id.unwrap(), donor).unwrap();
        let second = store.create_relation(accession_id, actor.id.unwrap(), donor).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_relations().unwrap().len(), 1);
    }

    #[test]
    fn test_deleting_either_end_removes_relation() {
        let store = ArchiveStore::open_in_memory().unwrap();
        let kind = store
            .load_terms(Taxonomy::ActorRelationType)
            .unwrap()
            .id_for("family")
            .unwrap();
        let a = store.create_or_fetch_actor("A").unwrap().id.unwrap();
        let b = store.create_or_fetch_actor("B").unwrap().id.unwrap();
        store.create_relation(a, b, kind).unwrap();

        store.delete_object(b).unwrap();
        assert!(store.list_relations().unwrap().is_empty());
    }
}
