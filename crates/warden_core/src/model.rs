//! Model metadata as reported by the ORM adapter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cardinality of an association attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationKind {
    /// Single reference (`model`)
    One,
    /// Collection of references (`collection`)
    Many,
}

/// Attribute of a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Scalar type name
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attr_type: Option<String>,
    /// Target entity of a single-valued association
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Target entity of a many-valued association
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Adapter-specific settings, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AttributeDescriptor {
    /// Create a scalar attribute
    #[must_use]
    pub fn scalar(attr_type: impl Into<String>) -> Self {
        Self {
            attr_type: Some(attr_type.into()),
            ..Self::default()
        }
    }

    /// Create a single-valued association to another entity
    #[must_use]
    pub fn association(target: impl Into<String>) -> Self {
        Self {
            model: Some(target.into()),
            ..Self::default()
        }
    }

    /// Create a many-valued association to another entity
    #[must_use]
    pub fn collection(target: impl Into<String>) -> Self {
        Self {
            collection: Some(target.into()),
            ..Self::default()
        }
    }

    /// Target entity name and cardinality, if this is an association
    #[must_use]
    pub fn association_target(&self) -> Option<(&str, AssociationKind)> {
        if let Some(model) = &self.model {
            return Some((model.as_str(), AssociationKind::One));
        }
        self.collection
            .as_deref()
            .map(|collection| (collection, AssociationKind::Many))
    }
}

fn default_primary_key() -> String {
    "id".to_string()
}

/// Model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeta {
    /// Attributes by name, in declaration order
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeDescriptor>,
    /// Primary key attribute name
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

impl ModelMeta {
    /// Create metadata with no attributes and an `id` primary key
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: IndexMap::new(),
            primary_key: default_primary_key(),
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attr: AttributeDescriptor) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// Set the primary key
    #[must_use]
    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = key.into();
        self
    }

    /// Look up an attribute
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.get(name)
    }
}

impl Default for ModelMeta {
    fn default() -> Self {
        Self::new()
    }
}
