//! Relations between records (accession donor, actor to actor)

use serde::{Deserialize, Serialize};

/// A typed link from a subject record to an object record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub subject_id: i64,
    pub object_id: i64,

    /// Term id from the relation or actor relation taxonomy
    pub type_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Relation {
    pub fn new(subject_id: i64, object_id: i64, type_id: i64) -> Self {
        Self {
            subject_id,
            object_id,
            type_id,
            ..Default::default()
        }
    }
}
