//! Contact information attached to an actor

use serde::{Deserialize, Serialize};

/// Postal, phone and email details for an actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Owning actor
    pub actor_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ContactInformation {
    pub const PROPERTIES: &'static [&'static str] = &[
        "email",
        "telephone",
        "fax",
        "street_address",
        "city",
        "region",
        "country_code",
        "postal_code",
        "note",
    ];

    pub fn new(actor_id: i64) -> Self {
        Self {
            actor_id,
            ..Default::default()
        }
    }

    /// Set a property by name; blank values are ignored
    ///
    /// Returns `false` for an unknown property.
    pub fn set(&mut self, property: &str, value: &str) -> bool {
        let slot = match property {
            "email" => &mut self.email,
            "telephone" => &mut self.telephone,
            "fax" => &mut self.fax,
            "street_address" => &mut self.street_address,
            "city" => &mut self.city,
            "region" => &mut self.region,
            "country_code" => &mut self.country_code,
            "postal_code" => &mut self.postal_code,
            "note" => &mut self.note,
            _ => return false,
        };
        let value = value.trim();
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
        true
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        match property {
            "email" => self.email.as_deref(),
            "telephone" => self.telephone.as_deref(),
            "fax" => self.fax.as_deref(),
            "street_address" => self.street_address.as_deref(),
            "city" => self.city.as_deref(),
            "region" => self.region.as_deref(),
            "country_code" => self.country_code.as_deref(),
            "postal_code" => self.postal_code.as_deref(),
            "note" => self.note.as_deref(),
            _ => None,
        }
    }

    /// True when no property carries a value
    pub fn is_empty(&self) -> bool {
        Self::PROPERTIES.iter().all(|p| self.get(p).is_none())
    }

    /// Same contact details, ignoring ids
    pub fn same_details(&self, other: &ContactInformation) -> bool {
        Self::PROPERTIES.iter().all(|p| self.get(p) == other.get(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ignores_blank_values() {
        let mut info = ContactInformation::new(1);
        assert!(info.set("email", "  "));
        assert!(info.is_empty());

        assert!(info.set("email", " archives@example.org "));
        assert_eq!(info.get("email"), Some("archives@example.org"));
        assert!(!info.is_empty());
    }

    #[test]
    fn test_set_unknown_property() {
        let mut info = ContactInformation::new(1);
        assert!(!info.set("pager", "555"));
    }

    #[test]
    fn test_same_details_ignores_ids() {
        let mut a = ContactInformation::new(1);
        a.set("city", "Vancouver");
        let mut b = a.clone();
        b.id = Some(9);
        assert!(a.same_details(&b));

        b.set("region", "BC");
        assert!(!a.same_details(&b));
    }
}
