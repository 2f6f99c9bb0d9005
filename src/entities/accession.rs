//! Accession entity type

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;

/// A record of material received by the archive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accession {
    /// Database id, `None` until saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Accession number (natural key)
    pub identifier: String,

    /// URL slug, assigned on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default)]
    pub title: String,

    /// Date of acquisition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope_and_content: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub appraisal: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location_information: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub physical_characteristics: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub received_extent_units: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub processing_notes: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_type_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_status_id: Option<i64>,
}

impl Accession {
    /// Create an unsaved accession with the given accession number
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }
}

impl Entity for Accession {
    const KIND: &'static str = "accession";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn label(&self) -> &str {
        &self.identifier
    }

    fn text_fields() -> &'static [&'static str] {
        &[
            "title",
            "scope_and_content",
            "appraisal",
            "location_information",
            "physical_characteristics",
            "received_extent_units",
            "processing_notes",
            "notes",
        ]
    }

    fn text_field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "title" => &self.title,
            "scope_and_content" => &self.scope_and_content,
            "appraisal" => &self.appraisal,
            "location_information" => &self.location_information,
            "physical_characteristics" => &self.physical_characteristics,
            "received_extent_units" => &self.received_extent_units,
            "processing_notes" => &self.processing_notes,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn text_field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "scope_and_content" => Some(&mut self.scope_and_content),
            "appraisal" => Some(&mut self.appraisal),
            "location_information" => Some(&mut self.location_information),
            "physical_characteristics" => Some(&mut self.physical_characteristics),
            "received_extent_units" => Some(&mut self.received_extent_units),
            "processing_notes" => Some(&mut self.processing_notes),
            "notes" => Some(&mut self.notes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_field_is_addressable() {
        let mut accession = Accession::new("2011-004");
        for field in Accession::text_fields() {
            assert!(accession.text_field(field).is_some(), "{}", field);
            assert!(accession.text_field_mut(field).is_some(), "{}", field);
        }
        assert!(accession.text_field("identifier").is_none());
    }

    #[test]
    fn test_accession_json_skips_empty_fields() {
        let mut accession = Accession::new("2011-004");
        accession.title = "Minutes".to_string();

        let json = serde_json::to_string(&accession).unwrap();
        assert!(json.contains("\"identifier\":\"2011-004\""));
        assert!(!json.contains("appraisal"));

        let parsed: Accession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, accession);
    }
}
