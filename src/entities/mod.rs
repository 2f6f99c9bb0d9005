//! Entity type definitions
//!
//! **Target entities** (one per import row):
//! - [`Accession`] - Material received by the archive, keyed by accession number
//! - [`Actor`] - Authority record for a person, family or corporate body
//!
//! **Related entities** (created after the target is saved):
//! - [`ContactInformation`] - Address, phone and email of an actor
//! - [`OtherName`] - Alternate forms of an actor's name
//! - [`Relation`] - Donor links and actor-to-actor relationships
//! - [`Note`] - Typed notes
//! - [`KeymapEntry`] - Import source bookkeeping

pub mod accession;
pub mod actor;
pub mod contact;
pub mod keymap;
pub mod note;
pub mod relation;

pub use accession::Accession;
pub use actor::{Actor, OtherName, OtherNameType};
pub use contact::ContactInformation;
pub use keymap::KeymapEntry;
pub use note::Note;
pub use relation::Relation;
