//! Actor (authority record) entity type and its alternate names

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::entity::Entity;

/// A person, family or corporate body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Authorized form of name (natural key)
    pub authorized_form_of_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dates_of_existence: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub history: String,

    /// Person / family / corporate body term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            authorized_form_of_name: name.into(),
            ..Default::default()
        }
    }
}

impl Entity for Actor {
    const KIND: &'static str = "actor";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn label(&self) -> &str {
        &self.authorized_form_of_name
    }

    fn text_fields() -> &'static [&'static str] {
        &["authorized_form_of_name", "dates_of_existence", "history"]
    }

    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "authorized_form_of_name" => Some(&self.authorized_form_of_name),
            "dates_of_existence" => Some(&self.dates_of_existence),
            "history" => Some(&self.history),
            _ => None,
        }
    }

    fn text_field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "authorized_form_of_name" => Some(&mut self.authorized_form_of_name),
            "dates_of_existence" => Some(&mut self.dates_of_existence),
            "history" => Some(&mut self.history),
            _ => None,
        }
    }
}

/// Kind of alternate name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherNameType {
    #[default]
    OtherForm,
    Parallel,
    Standardized,
}

impl OtherNameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtherNameType::OtherForm => "other_form",
            OtherNameType::Parallel => "parallel",
            OtherNameType::Standardized => "standardized",
        }
    }
}

impl fmt::Display for OtherNameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtherNameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "other_form" => Ok(OtherNameType::OtherForm),
            "parallel" => Ok(OtherNameType::Parallel),
            "standardized" => Ok(OtherNameType::Standardized),
            _ => Err(format!("Invalid other name type: {}", s)),
        }
    }
}

/// An alternate name of an actor ("J. Smith" for "Smith, John")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Actor this name belongs to
    pub object_id: i64,

    pub name: String,

    #[serde(rename = "type", default)]
    pub name_type: OtherNameType,
}

impl OtherName {
    pub fn other_form(object_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: None,
            object_id,
            name: name.into(),
            name_type: OtherNameType::OtherForm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_name_type_round_trip() {
        for kind in [
            OtherNameType::OtherForm,
            OtherNameType::Parallel,
            OtherNameType::Standardized,
        ] {
            assert_eq!(kind.as_str().parse::<OtherNameType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_other_name_serializes_type() {
        let alias = OtherName::other_form(4, "J. Smith");
        let json = serde_json::to_string(&alias).unwrap();
        assert!(json.contains("\"type\":\"other_form\""));
    }
}
