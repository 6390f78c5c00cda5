//! The two canonical ownership entities.

use serde::{Deserialize, Serialize};

/// Kind of owner a relation points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    /// Owned by a single actor
    Actor,
    /// Owned by a group
    Group,
}

fn default_actor_entity() -> String {
    "user".to_string()
}

fn default_group_entity() -> String {
    "group".to_string()
}

/// Names of the actor and group entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipModels {
    /// Entity that stores actors
    #[serde(default = "default_actor_entity")]
    pub actor_entity: String,
    /// Entity that stores groups
    #[serde(default = "default_group_entity")]
    pub group_entity: String,
}

impl OwnershipModels {
    /// Create with explicit entity names
    #[must_use]
    pub fn new(actor_entity: impl Into<String>, group_entity: impl Into<String>) -> Self {
        Self {
            actor_entity: actor_entity.into(),
            group_entity: group_entity.into(),
        }
    }

    /// Classify an association target (ASCII case-insensitive)
    #[must_use]
    pub fn kind_of(&self, target: &str) -> Option<OwnerKind> {
        if target.eq_ignore_ascii_case(&self.actor_entity) {
            Some(OwnerKind::Actor)
        } else if target.eq_ignore_ascii_case(&self.group_entity) {
            Some(OwnerKind::Group)
        } else {
            None
        }
    }
}

impl Default for OwnershipModels {
    fn default() -> Self {
        Self {
            actor_entity: default_actor_entity(),
            group_entity: default_group_entity(),
        }
    }
}
