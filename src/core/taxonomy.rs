//! Controlled vocabularies and term lookup

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reference taxonomies that imports resolve terms against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    /// How an accession was acquired (gift, purchase, ...)
    AcquisitionType,
    /// Public or private transfer
    ResourceType,
    /// Processing state of an accession
    ProcessingStatus,
    /// Kinds of note attached to records
    NoteType,
    /// Person, family, corporate body
    ActorEntityType,
    /// Categories of actor-to-actor relationship
    ActorRelationType,
    /// Generic relation types (donor, creation, ...)
    RelationType,
}

impl Taxonomy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::AcquisitionType => "acquisition_type",
            Taxonomy::ResourceType => "resource_type",
            Taxonomy::ProcessingStatus => "processing_status",
            Taxonomy::NoteType => "note_type",
            Taxonomy::ActorEntityType => "actor_entity_type",
            Taxonomy::ActorRelationType => "actor_relation_type",
            Taxonomy::RelationType => "relation_type",
        }
    }

    pub fn all() -> &'static [Taxonomy] {
        &[
            Taxonomy::AcquisitionType,
            Taxonomy::ResourceType,
            Taxonomy::ProcessingStatus,
            Taxonomy::NoteType,
            Taxonomy::ActorEntityType,
            Taxonomy::ActorRelationType,
            Taxonomy::RelationType,
        ]
    }

    /// Terms seeded into a new project
    pub fn default_terms(&self) -> &'static [&'static str] {
        match self {
            Taxonomy::AcquisitionType => &["Deposit", "Gift", "Purchase", "Transfer"],
            Taxonomy::ResourceType => &["Public transfer", "Private transfer"],
            Taxonomy::ProcessingStatus => &["Complete", "Incomplete", "In-Progress"],
            Taxonomy::NoteType => &["General note", "Maintenance note", "Source note"],
            Taxonomy::ActorEntityType => &["Corporate body", "Family", "Person"],
            Taxonomy::ActorRelationType => &["hierarchical", "temporal", "family", "associative"],
            Taxonomy::RelationType => &["Donor", "Creation", "Accrual"],
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Taxonomy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Taxonomy::all()
            .iter()
            .find(|t| t.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                let names: Vec<_> = Taxonomy::all().iter().map(|t| t.as_str()).collect();
                format!("Unknown taxonomy '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}

/// A legacy value that could not be matched to a term
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {label} '{value}'")]
pub struct UnknownTerm {
    pub label: String,
    pub value: String,
}

/// Terms of one taxonomy, id to name, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct TermList {
    terms: BTreeMap<i64, String>,
}

impl TermList {
    pub fn new(terms: impl IntoIterator<Item = (i64, String)>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
        }
    }

    /// Exact name lookup, first match in id order
    pub fn id_for(&self, name: &str) -> Option<i64> {
        self.terms
            .iter()
            .find(|(_, term)| term.as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Map a legacy value through `aliases`, then look the result up
    ///
    /// Values with no alias are looked up as-is.
    pub fn translate(
        &self,
        label: &str,
        value: &str,
        aliases: &[(&str, &str)],
    ) -> Result<i64, UnknownTerm> {
        let value = value.trim();
        let name = aliases
            .iter()
            .find(|(legacy, _)| *legacy == value)
            .map(|(_, term)| *term)
            .unwrap_or(value);

        self.id_for(name).ok_or_else(|| UnknownTerm {
            label: label.to_string(),
            value: value.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.terms.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
