//! Field policy merge: base tier plus action-tier overrides.

use warden_core::{Action, ActionPolicy, Entity, FieldConfigMap, FieldPolicy};

/// Computes an entity's effective field-configuration maps
pub struct FieldPolicyMerger<'a> {
    entity: &'a Entity,
}

impl<'a> FieldPolicyMerger<'a> {
    /// Create a merger for an entity
    #[must_use]
    pub fn new(entity: &'a Entity) -> Self {
        Self { entity }
    }

    /// Base tier: every model attribute implicitly enabled, overlaid by
    /// `config.fields`
    #[must_use]
    pub fn base_fields(&self) -> FieldConfigMap {
        let mut fields: FieldConfigMap = self
            .entity
            .model
            .attributes
            .keys()
            .map(|name| (name.clone(), FieldPolicy::Enabled))
            .collect();
        overlay(&mut fields, &self.entity.config.fields);
        fields
    }

    /// Effective map for an action
    #[must_use]
    pub fn action_fields(&self, action: Action) -> FieldConfigMap {
        let fields = match self.entity.config.action(action) {
            ActionPolicy::Disabled => FieldConfigMap::new(),
            ActionPolicy::DefaultEnabled => self.base_fields(),
            ActionPolicy::Overridden(overrides) => {
                let mut fields = self.base_fields();
                overlay(&mut fields, overrides);
                fields
            }
        };
        tracing::debug!(
            entity = %self.entity.name,
            %action,
            fields = fields.len(),
            "merged action field policy"
        );
        fields
    }
}

/// Layer `overrides` over `fields` key by key.
///
/// `false` removes, an object replaces the whole entry, `true` keeps an
/// existing entry or adds a bare one. Unknown names are added.
pub(crate) fn overlay(fields: &mut FieldConfigMap, overrides: &FieldConfigMap) {
    for (name, policy) in overrides {
        match policy {
            FieldPolicy::Disabled => {
                fields.shift_remove(name);
            }
            FieldPolicy::Enabled => {
                fields.entry(name.clone()).or_insert(FieldPolicy::Enabled);
            }
            FieldPolicy::Configured(_) => {
                fields.insert(name.clone(), policy.clone());
            }
        }
    }
}
