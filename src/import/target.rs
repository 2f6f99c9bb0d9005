//! Target entities the import engine can create and update

use super::error::RowError;
use crate::core::entity::Entity;
use crate::core::store::{ArchiveStore, StoreError};
use crate::entities::{Accession, Actor};

/// A record an import row resolves to and persists
pub trait ImportTarget {
    /// Record kind as stored in the keymap
    const KIND: &'static str;

    fn id(&self) -> Option<i64>;

    /// Natural key, used in progress and debug output
    fn natural_key(&self) -> &str;

    /// Current value of a mappable field
    fn field(&self, name: &str) -> Option<&str>;

    /// Assign a mapped column value to a field by name
    fn assign(&mut self, field: &str, value: String) -> Result<(), RowError>;

    /// Insert or update through the store, returning the id
    fn persist(&mut self, store: &ArchiveStore) -> Result<i64, StoreError>;
}

fn assign_text_field<T: Entity>(entity: &mut T, field: &str, value: String) -> Result<(), RowError> {
    match entity.text_field_mut(field) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(RowError::UnknownField {
            kind: T::KIND,
            field: field.to_string(),
        }),
    }
}

impl ImportTarget for Accession {
    const KIND: &'static str = <Accession as Entity>::KIND;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn natural_key(&self) -> &str {
        &self.identifier
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.text_field(name)
    }

    fn assign(&mut self, field: &str, value: String) -> Result<(), RowError> {
        assign_text_field(self, field, value)
    }

    fn persist(&mut self, store: &ArchiveStore) -> Result<i64, StoreError> {
        store.save_accession(self)
    }
}

impl ImportTarget for Actor {
    const KIND: &'static str = <Actor as Entity>::KIND;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn natural_key(&self) -> &str {
        &self.authorized_form_of_name
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.text_field(name)
    }

    fn assign(&mut self, field: &str, value: String) -> Result<(), RowError> {
        assign_text_field(self, field, value)
    }

    fn persist(&mut self, store: &ArchiveStore) -> Result<i64, StoreError> {
        store.save_actor(self)
    }
}

/// Target of passes that only read rows (aliases, relations)
///
/// Uninhabited: such passes never have a row object and do their work in
/// a save hook.
#[derive(Debug)]
pub enum NoTarget {}

impl ImportTarget for NoTarget {
    const KIND: &'static str = "row";

    fn id(&self) -> Option<i64> {
        match *self {}
    }

    fn natural_key(&self) -> &str {
        match *self {}
    }

    fn field(&self, _name: &str) -> Option<&str> {
        match *self {}
    }

    fn assign(&mut self, _field: &str, _value: String) -> Result<(), RowError> {
        match *self {}
    }

    fn persist(&mut self, _store: &ArchiveStore) -> Result<i64, StoreError> {
        match *self {}
    }
}
