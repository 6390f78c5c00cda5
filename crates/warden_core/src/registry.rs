//! Entity registry: name lookup for association targets and ownership
//! entities.
//!
//! The registry is built once at configuration time and then only read.
//! Accessors receive it as a `&dyn EntityRegistry` so no lookup goes
//! through global state.

use crate::action::Action;
use crate::config::{ActionPolicy, EntityConfig};
use crate::entity::Entity;
use crate::error::CoreResult;
use crate::model::{AssociationKind, ModelMeta};
use crate::ownership::OwnershipModels;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only lookup of entities by name
pub trait EntityRegistry: Send + Sync {
    /// Look up an entity (ASCII case-insensitive)
    fn entity(&self, name: &str) -> Option<&Entity>;

    /// Names of the actor and group entities
    fn ownership(&self) -> &OwnershipModels;
}

/// Entity as it appears in a registry document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    /// Model metadata
    #[serde(default)]
    pub model: ModelMeta,
    /// Entity configuration
    #[serde(default)]
    pub config: EntityConfig,
}

/// Serialized registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Ownership entity names
    #[serde(default)]
    pub ownership: OwnershipModels,
    /// Entities by name
    #[serde(default)]
    pub entities: IndexMap<String, EntityDocument>,
}

/// Kind of configuration issue found at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Association names an entity that is not registered
    UnknownAssociationTarget {
        /// Entity named by the association
        target: String,
    },
    /// Ownership relation names a missing attribute
    MissingOwnershipField,
    /// Ownership relation names an attribute that is not a single association
    OwnershipFieldNotAssociation,
    /// Ownership relation does not end at the actor or group entity
    OwnershipTargetNotOwner {
        /// Entity the relation ends at
        target: String,
    },
    /// Action override names a field the model and base tier do not know
    UnknownOverrideField {
        /// Action whose override names the field
        action: Action,
    },
    /// Field config sets a key the resolved output reserves; it is ignored
    ReservedFieldKey {
        /// The reserved key
        key: String,
        /// Action override carrying it, `None` for the base tier
        action: Option<Action>,
    },
}

/// Configuration issue found by [`InMemoryRegistry::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Entity the issue belongs to
    pub entity: String,
    /// Field involved, if any
    pub field: Option<String>,
    /// What is wrong
    pub kind: IssueKind,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_deref().unwrap_or("-");
        match &self.kind {
            IssueKind::UnknownAssociationTarget { target } => write!(
                f,
                "{}.{}: association target `{}` is not registered",
                self.entity, field, target
            ),
            IssueKind::MissingOwnershipField => write!(
                f,
                "{}.{}: ownership relation names a missing attribute",
                self.entity, field
            ),
            IssueKind::OwnershipFieldNotAssociation => write!(
                f,
                "{}.{}: ownership relation must be a single-valued association",
                self.entity, field
            ),
            IssueKind::OwnershipTargetNotOwner { target } => write!(
                f,
                "{}.{}: ownership relation targets `{}`, not the actor or group entity",
                self.entity, field, target
            ),
            IssueKind::UnknownOverrideField { action } => write!(
                f,
                "{}.{}: `{}` override names a field the model does not declare",
                self.entity, field, action
            ),
            IssueKind::ReservedFieldKey { key, action } => {
                let tier = action.map_or_else(|| "base".to_string(), |a| a.to_string());
                write!(
                    f,
                    "{}.{}: `{}` is reserved and ignored ({} tier)",
                    self.entity, field, key, tier
                )
            }
        }
    }
}

/// In-memory registry
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    /// Entities keyed by lowercased name
    entities: IndexMap<String, Entity>,
    /// Ownership entity names
    ownership: OwnershipModels,
}

impl InMemoryRegistry {
    /// Create an empty registry with default ownership entity names
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ownership entity names
    #[must_use]
    pub fn with_ownership(mut self, ownership: OwnershipModels) -> Self {
        self.ownership = ownership;
        self
    }

    /// Add an entity
    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.insert(entity);
        self
    }

    /// Register an entity, returning the one it replaced
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.name.to_ascii_lowercase(), entity)
    }

    /// Build from a parsed document
    #[must_use]
    pub fn from_document(document: RegistryDocument) -> Self {
        let mut registry = Self::new().with_ownership(document.ownership);
        for (name, doc) in document.entities {
            registry.insert(Entity::new(name, doc.model, doc.config));
        }
        registry
    }

    /// Parse a JSON registry document
    ///
    /// # Errors
    ///
    /// Returns error if the document is not valid JSON or does not match
    /// the registry shape
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let document: RegistryDocument = serde_json::from_str(json)?;
        let registry = Self::from_document(document);
        tracing::debug!(entities = registry.len(), "loaded entity registry");
        Ok(registry)
    }

    /// Get an entity by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(&name.to_ascii_lowercase())
    }

    /// Registered entity names, in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entities.values().map(|e| e.name.as_str()).collect()
    }

    /// Number of registered entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Check the configuration for problems that would otherwise surface
    /// per request. Never fails; every issue is also logged.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for entity in self.entities.values() {
            self.check_associations(entity, &mut issues);
            self.check_ownership(entity, &mut issues);
            check_overrides(entity, &mut issues);
            check_reserved_keys(entity, &mut issues);
        }

        for issue in &issues {
            tracing::warn!(entity = %issue.entity, "{}", issue);
        }
        issues
    }

    fn check_associations(&self, entity: &Entity, issues: &mut Vec<ConfigIssue>) {
        for (name, attr) in &entity.model.attributes {
            if let Some((target, _)) = attr.association_target() {
                if self.get(target).is_none() {
                    issues.push(ConfigIssue {
                        entity: entity.name.clone(),
                        field: Some(name.clone()),
                        kind: IssueKind::UnknownAssociationTarget {
                            target: target.to_string(),
                        },
                    });
                }
            }
        }
    }

    fn check_ownership(&self, entity: &Entity, issues: &mut Vec<ConfigIssue>) {
        let Some(relation) = &entity.config.user_access_relation else {
            return;
        };

        let issue = |field: &str, kind: IssueKind| ConfigIssue {
            entity: entity.name.clone(),
            field: Some(field.to_string()),
            kind,
        };

        let field = relation.field();
        let Some(attr) = entity.model.attribute(field) else {
            issues.push(issue(field, IssueKind::MissingOwnershipField));
            return;
        };
        let Some((target, AssociationKind::One)) = attr.association_target() else {
            issues.push(issue(field, IssueKind::OwnershipFieldNotAssociation));
            return;
        };

        let (field, owner) = match relation.via() {
            None => (field, target),
            Some(via) => {
                // unknown intermediate already reported by check_associations
                let Some(intermediate) = self.get(target) else {
                    return;
                };
                let Some(via_attr) = intermediate.model.attribute(via) else {
                    issues.push(issue(via, IssueKind::MissingOwnershipField));
                    return;
                };
                let Some((owner, AssociationKind::One)) = via_attr.association_target() else {
                    issues.push(issue(via, IssueKind::OwnershipFieldNotAssociation));
                    return;
                };
                (via, owner)
            }
        };

        if self.ownership.kind_of(owner).is_none() {
            issues.push(issue(
                field,
                IssueKind::OwnershipTargetNotOwner {
                    target: owner.to_string(),
                },
            ));
        }
    }
}

fn check_overrides(entity: &Entity, issues: &mut Vec<ConfigIssue>) {
    for action in Action::ALL {
        let ActionPolicy::Overridden(fields) = entity.config.action(action) else {
            continue;
        };
        for name in fields.keys() {
            let known = entity.model.attributes.contains_key(name)
                || entity.config.fields.contains_key(name);
            if !known {
                issues.push(ConfigIssue {
                    entity: entity.name.clone(),
                    field: Some(name.clone()),
                    kind: IssueKind::UnknownOverrideField { action },
                });
            }
        }
    }
}

fn check_reserved_keys(entity: &Entity, issues: &mut Vec<ConfigIssue>) {
    let overrides = Action::ALL.into_iter().filter_map(|action| match entity.config.action(action) {
        ActionPolicy::Overridden(fields) => Some((Some(action), fields)),
        ActionPolicy::Disabled | ActionPolicy::DefaultEnabled => None,
    });
    let tiers = std::iter::once((None, &entity.config.fields)).chain(overrides);

    for (action, fields) in tiers {
        for (name, policy) in fields {
            let Some(config) = policy.config() else {
                continue;
            };
            for key in config.reserved_keys() {
                issues.push(ConfigIssue {
                    entity: entity.name.clone(),
                    field: Some(name.clone()),
                    kind: IssueKind::ReservedFieldKey {
                        key: key.to_string(),
                        action,
                    },
                });
            }
        }
    }
}

impl EntityRegistry for InMemoryRegistry {
    fn entity(&self, name: &str) -> Option<&Entity> {
        self.get(name)
    }

    fn ownership(&self) -> &OwnershipModels {
        &self.ownership
    }
}
