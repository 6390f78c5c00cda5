//! Per-field decision reports.
//!
//! Runs the same merge/filter/sanitize pipeline as the accessor and records
//! why each field ended up visible or not, and whether its value would be
//! disclosed.

use crate::merge::FieldPolicyMerger;
use crate::sanitize::DataSanitizer;
use crate::visibility::GroupVisibilityFilter;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use warden_core::{Action, ActionPolicy, Actor, Entity, FieldPolicy};

/// Why a field is or is not in the resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldOutcome {
    /// Visible to the actor
    Visible,
    /// Visible only because the actor is an administrator
    AdminBypass,
    /// Set to `false` in the action override
    DisabledForAction,
    /// Set to `false` in the base tier and not re-enabled
    DisabledInBase,
    /// Hidden by `groupsAccessRights`
    DeniedByGroups {
        /// Groups that would grant visibility
        required: Vec<String>,
    },
    /// The whole action is disabled
    ActionDisabled,
}

/// Decision for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecision {
    /// Field name
    pub field: String,
    /// Configuration-time outcome
    pub outcome: FieldOutcome,
    /// Whether `process` would emit the field's value
    pub data_exposed: bool,
}

impl FieldDecision {
    /// Check if the field appears in the resolved configuration
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self.outcome, FieldOutcome::Visible | FieldOutcome::AdminBypass)
    }
}

/// Explain every field known to the model, base tier or action override
#[must_use]
pub fn explain(entity: &Entity, action: Action, actor: &Actor) -> Vec<FieldDecision> {
    let merger = FieldPolicyMerger::new(entity);
    let filter = GroupVisibilityFilter::new(actor);
    let effective = merger.action_fields(action);
    let sanitizer = DataSanitizer::new(
        &filter.apply(effective.clone()),
        &filter.apply(merger.base_fields()),
    );

    let action_policy = entity.config.action(action);
    let overrides = match action_policy {
        ActionPolicy::Overridden(fields) => Some(fields),
        ActionPolicy::Disabled | ActionPolicy::DefaultEnabled => None,
    };

    let mut names: IndexSet<&str> = entity.model.attributes.keys().map(String::as_str).collect();
    names.extend(entity.config.fields.keys().map(String::as_str));
    if let Some(overrides) = overrides {
        names.extend(overrides.keys().map(String::as_str));
    }

    names
        .into_iter()
        .map(|name| {
            let disabled_for_action = overrides
                .and_then(|fields| fields.get(name))
                .is_some_and(FieldPolicy::is_disabled);
            let outcome = if matches!(action_policy, ActionPolicy::Disabled) {
                FieldOutcome::ActionDisabled
            } else if disabled_for_action {
                FieldOutcome::DisabledForAction
            } else {
                match effective.get(name) {
                    Some(policy) => classify(policy, actor, &filter),
                    None => FieldOutcome::DisabledInBase,
                }
            };
            FieldDecision {
                field: name.to_string(),
                outcome,
                data_exposed: sanitizer.allows(name),
            }
        })
        .collect()
}

fn classify(policy: &FieldPolicy, actor: &Actor, filter: &GroupVisibilityFilter<'_>) -> FieldOutcome {
    let required = policy.groups_access_rights();
    if !filter.is_visible(policy) {
        return FieldOutcome::DeniedByGroups {
            required: required.map(<[String]>::to_vec).unwrap_or_default(),
        };
    }
    let member = required.is_none_or(|groups| actor.in_any_group(groups));
    if actor.is_administrator && !member {
        FieldOutcome::AdminBypass
    } else {
        FieldOutcome::Visible
    }
}
