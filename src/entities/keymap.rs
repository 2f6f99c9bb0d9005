//! Keymap entries: which import source produced which record

use serde::{Deserialize, Serialize};

/// Links a row of a named import source to the record it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeymapEntry {
    /// Import source (file name or `--source-name`)
    pub source_name: String,

    /// Legacy key of the row within that source
    pub source_id: String,

    /// Id of the created or updated record
    pub target_id: i64,

    /// Kind of the record ("accession", "actor")
    pub target_name: String,
}
