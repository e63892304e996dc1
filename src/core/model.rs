//! COBie facility data model.
//!
//! Both the requirement tree and the submission tree use these types. Children
//! are carried inline by their parent (assets under their type, spaces under
//! their zone) so that validation only ever needs explicit, scoped pools and
//! never has to navigate back up to the owning facility.

use crate::core::types::{Attribute, AttributeValue, Category};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a contact by its e-mail key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContactKey {
    /// E-mail address identifying the contact.
    pub email: String,
}

/// Fields shared by every COBie entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CobieObject {
    /// Object name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// Creator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ContactKey>,
    /// Classification codes, in declaration order.
    pub categories: Vec<Category>,
    /// Attributes, in declaration order.
    pub attributes: Vec<Attribute>,
    /// Identifier in the source system (display only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Name of the source system (display only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_system: Option<String>,
}

impl CobieObject {
    /// Create an object with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Set the external identifier.
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Find an attribute by name (case-insensitive, trimmed).
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_named(name))
    }

    /// Categories used for matching: requirement markers are skipped and
    /// equivalent pairs are collapsed (first occurrence wins).
    pub fn matching_categories(&self) -> Vec<&Category> {
        let mut unique: Vec<&Category> = Vec::with_capacity(self.categories.len());
        for category in self.categories.iter().filter(|c| !c.is_marker()) {
            if !unique.iter().any(|u| u.is_equivalent(category)) {
                unique.push(category);
            }
        }
        unique
    }

    /// First category of the given classification.
    pub fn category_in(&self, classification: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.is_in(classification))
    }

    /// Copy of this object with duplicate categories collapsed.
    pub fn normalized(&self) -> Self {
        let categories = self.matching_categories().into_iter().cloned().collect();
        let markers = self.categories.iter().filter(|c| c.is_marker());
        let mut normalized = self.clone();
        normalized.categories = categories;
        for marker in markers {
            if !normalized.categories.iter().any(|c| c.is_equivalent(marker)) {
                normalized.categories.push(marker.clone());
            }
        }
        normalized
    }

    /// Display label used in diagnostics.
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A single asset (instance of an asset type).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Common fields.
    #[serde(flatten)]
    pub object: CobieObject,
}

/// An asset type together with its assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssetType {
    /// Common fields.
    #[serde(flatten)]
    pub object: CobieObject,
    /// Assets of this type.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A space.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Space {
    /// Common fields.
    #[serde(flatten)]
    pub object: CobieObject,
}

/// A zone together with the spaces it groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    /// Common fields.
    #[serde(flatten)]
    pub object: CobieObject,
    /// Spaces in this zone.
    #[serde(default)]
    pub spaces: Vec<Space>,
}

/// A delivered document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Common fields.
    #[serde(flatten)]
    pub object: CobieObject,
}

/// A contact or role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    /// Common fields.
    #[serde(flatten)]
    pub object: CobieObject,
    /// E-mail key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Project information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Site information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Site {
    /// Site name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A complete facility tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    /// Common fields of the facility itself.
    #[serde(flatten)]
    pub object: CobieObject,
    /// Project, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    /// Site, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,
    /// Asset types with their assets.
    #[serde(default)]
    pub asset_types: Vec<AssetType>,
    /// Zones with their spaces.
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Documents.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Contacts.
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl Facility {
    /// Create an empty facility.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: CobieObject::new(name),
            ..Default::default()
        }
    }

    /// Project name, empty when no project is set.
    pub fn project_name(&self) -> &str {
        self.project.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Site name, empty when no site is set.
    pub fn site_name(&self) -> &str {
        self.site.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }
}

// ============================================================================
// Entity access
// ============================================================================

/// Access to the common fields of any COBie entity.
pub trait CobieEntity: Send + Sync {
    /// The common fields.
    fn object(&self) -> &CobieObject;
}

impl CobieEntity for CobieObject {
    fn object(&self) -> &CobieObject {
        self
    }
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(
            impl CobieEntity for $ty {
                fn object(&self) -> &CobieObject {
                    &self.object
                }
            }
        )*
    };
}

impl_entity!(Asset, AssetType, Space, Zone, Document, Contact, Facility);

/// An entity that owns a collection of child entities.
///
/// Entities without children (documents, contacts) return an empty slice.
pub trait RequirementParent: CobieEntity {
    /// Child entity type.
    type Child: CobieEntity;

    /// Children in declaration order.
    fn children(&self) -> &[Self::Child];
}

impl RequirementParent for AssetType {
    type Child = Asset;

    fn children(&self) -> &[Asset] {
        &self.assets
    }
}

impl RequirementParent for Zone {
    type Child = Space;

    fn children(&self) -> &[Space] {
        &self.spaces
    }
}

impl RequirementParent for Document {
    type Child = CobieObject;

    fn children(&self) -> &[CobieObject] {
        &[]
    }
}

impl RequirementParent for Contact {
    type Child = CobieObject;

    fn children(&self) -> &[CobieObject] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_categories_collapse_duplicates() {
        let object = CobieObject::new("Wall")
            .with_category(Category::new("Uniclass2015", "Ss_25_10"))
            .with_category(Category::new("uniclass2015", " ss_25_10"))
            .with_category(Category::new("DPoW", "required"));
        let categories = object.matching_categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].code, "Ss_25_10");
    }

    #[test]
    fn test_normalized_keeps_markers() {
        let object = CobieObject::new("Zone")
            .with_category(Category::new("DPoW", "required"))
            .with_category(Category::new("Sample", "A"))
            .with_category(Category::new("Sample", "a"));
        let normalized = object.normalized();
        assert_eq!(normalized.categories.len(), 2);
        assert!(normalized.categories.iter().any(|c| c.is_marker()));
    }

    #[test]
    fn test_attribute_lookup() {
        let object = CobieObject::new("Door").with_attribute("Fire Rating", "30 min");
        assert!(object.attribute("fire rating").is_some());
        assert!(object.attribute("Width").is_none());
    }

    #[test]
    fn test_missing_project_is_empty() {
        let facility = Facility::new("Lakeside");
        assert_eq!(facility.project_name(), "");
        assert_eq!(facility.site_name(), "");
    }

    #[test]
    fn test_facility_json_flattened() {
        let mut facility = Facility::new("Lakeside");
        facility.zones.push(Zone {
            object: CobieObject::new("Zone A"),
            spaces: vec![Space { object: CobieObject::new("A001") }],
        });
        let json = serde_json::to_string(&facility).unwrap();
        assert!(json.contains(r#""name":"Lakeside""#));
        let back: Facility = serde_json::from_str(&json).unwrap();
        assert_eq!(back, facility);
    }
}
