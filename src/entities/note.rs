//! Typed notes attached to records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Record the note belongs to
    pub object_id: i64,

    /// Term id from the note type taxonomy
    pub type_id: i64,

    pub content: String,
}
