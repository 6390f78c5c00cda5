//! Nested field policy for association fields.
//!
//! An association field carries a `populated` map describing the target
//! entity's fields. It is always computed from the target's base tier and
//! never expanded past [`MAX_POPULATE_DEPTH`], so self-referencing
//! associations terminate. Reserved keys (`populated`) set in field
//! configuration are dropped, so `populated` only ever comes from here.

use crate::merge::FieldPolicyMerger;
use crate::visibility::GroupVisibilityFilter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use warden_core::{Actor, EntityRegistry, FieldConfig, FieldConfigMap, FieldPolicy, ModelMeta};

/// Deepest level at which `populated` is attached
pub const MAX_POPULATE_DEPTH: usize = 1;

/// One field of a resolved configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedField {
    /// Field configuration (empty for bare `true` entries)
    #[serde(flatten)]
    pub config: FieldConfig,
    /// Target entity's base-tier policy, for association fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populated: Option<FieldConfigMap>,
}

/// Resolved field configuration returned to controllers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedFieldConfig(IndexMap<String, ResolvedField>);

impl ResolvedFieldConfig {
    /// Look up a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedField> {
        self.0.get(name)
    }

    /// Check if a field is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Field names, in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResolvedField)> {
        self.0.iter()
    }
}

/// Attaches `populated` descriptions to association fields
pub struct AssociationPolicyResolver<'a> {
    registry: &'a dyn EntityRegistry,
    actor: &'a Actor,
}

impl<'a> AssociationPolicyResolver<'a> {
    /// Create a resolver
    #[must_use]
    pub fn new(registry: &'a dyn EntityRegistry, actor: &'a Actor) -> Self {
        Self { registry, actor }
    }

    /// Resolve a filtered field map of `model`, populating association
    /// fields when `depth` is below [`MAX_POPULATE_DEPTH`]
    #[must_use]
    pub fn resolve(&self, fields: FieldConfigMap, model: &ModelMeta, depth: usize) -> ResolvedFieldConfig {
        let resolved = fields
            .into_iter()
            .map(|(name, policy)| {
                let populated = model
                    .attribute(&name)
                    .and_then(|attr| attr.association_target())
                    .and_then(|(target, _)| self.populate(target, depth));
                let mut config = policy.config().cloned().unwrap_or_default();
                strip_reserved(&name, &mut config);
                let field = ResolvedField { config, populated };
                (name, field)
            })
            .collect();
        ResolvedFieldConfig(resolved)
    }

    /// Base-tier policy of `target`, filtered for the actor
    #[must_use]
    pub fn populate(&self, target: &str, depth: usize) -> Option<FieldConfigMap> {
        if depth >= MAX_POPULATE_DEPTH {
            return None;
        }
        let Some(entity) = self.registry.entity(target) else {
            tracing::debug!(target_entity = target, "association target not registered, skipping populate");
            return None;
        };
        let base = FieldPolicyMerger::new(entity).base_fields();
        let mut fields = GroupVisibilityFilter::new(self.actor).apply(base);
        for (name, policy) in &mut fields {
            if let FieldPolicy::Configured(config) = policy {
                strip_reserved(name, config);
            }
        }
        Some(fields)
    }
}

fn strip_reserved(field: &str, config: &mut FieldConfig) {
    if config.strip_reserved() > 0 {
        tracing::debug!(field, "dropped reserved key from field config");
    }
}
