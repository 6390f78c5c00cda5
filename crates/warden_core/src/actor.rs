//! The authenticated principal and its group memberships.

use crate::id::RecordId;
use serde::{Deserialize, Serialize};

/// A group an actor belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    /// Group id
    pub id: RecordId,
    /// Group name, matched case-sensitively against `groupsAccessRights`
    pub name: String,
}

impl Group {
    /// Create a new group
    #[must_use]
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Authenticated actor on whose behalf a request is evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Actor id
    pub id: RecordId,
    /// Administrators bypass group checks on field visibility
    #[serde(default)]
    pub is_administrator: bool,
    /// Group memberships
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Actor {
    /// Create a non-administrator actor with no groups
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            is_administrator: false,
            groups: Vec::new(),
        }
    }

    /// Mark as administrator
    #[must_use]
    pub fn administrator(mut self) -> Self {
        self.is_administrator = true;
        self
    }

    /// Add a group membership
    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Check whether the actor holds at least one of the named groups
    #[must_use]
    pub fn in_any_group(&self, names: &[String]) -> bool {
        self.groups
            .iter()
            .any(|group| names.iter().any(|name| *name == group.name))
    }

    /// Ids of every group the actor belongs to
    #[must_use]
    pub fn group_ids(&self) -> Vec<&RecordId> {
        self.groups.iter().map(|group| &group.id).collect()
    }

    /// The actor's group when it belongs to exactly one
    #[must_use]
    pub fn sole_group(&self) -> Option<&Group> {
        match self.groups.as_slice() {
            [group] => Some(group),
            _ => None,
        }
    }
}
