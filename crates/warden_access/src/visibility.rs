//! Group-based field visibility.

use warden_core::{Actor, FieldConfigMap, FieldPolicy};

/// Removes fields the actor's groups are not entitled to see
pub struct GroupVisibilityFilter<'a> {
    actor: &'a Actor,
}

impl<'a> GroupVisibilityFilter<'a> {
    /// Create a filter for an actor
    #[must_use]
    pub fn new(actor: &'a Actor) -> Self {
        Self { actor }
    }

    /// Check if one field is visible to the actor.
    ///
    /// A disabled entry is never visible, administrators included.
    #[must_use]
    pub fn is_visible(&self, policy: &FieldPolicy) -> bool {
        if policy.is_disabled() {
            return false;
        }
        if self.actor.is_administrator {
            return true;
        }
        match policy.groups_access_rights() {
            None => true,
            Some(groups) => self.actor.in_any_group(groups),
        }
    }

    /// Filter a field-configuration map
    #[must_use]
    pub fn apply(&self, fields: FieldConfigMap) -> FieldConfigMap {
        let before = fields.len();
        let visible: FieldConfigMap = fields
            .into_iter()
            .filter(|(name, policy)| {
                let visible = self.is_visible(policy);
                if !visible {
                    tracing::trace!(field = %name, actor = %self.actor.id, "field hidden by group rights");
                }
                visible
            })
            .collect();
        tracing::debug!(
            actor = %self.actor.id,
            administrator = self.actor.is_administrator,
            kept = visible.len(),
            hidden = before - visible.len(),
            "applied group visibility"
        );
        visible
    }
}
