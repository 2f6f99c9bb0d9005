//! Core module - project, configuration, persistence and vocabularies

pub mod config;
pub mod entity;
pub mod identity;
pub mod project;
pub mod store;
pub mod taxonomy;

pub use config::Config;
pub use entity::Entity;
pub use project::{Project, ProjectError};
pub use store::{ArchiveStore, StoreError, StoreStatistics};
pub use taxonomy::{Taxonomy, TermList, UnknownTerm};
