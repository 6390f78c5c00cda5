//! Entity configuration: base-tier field policy, per-action overrides and
//! the ownership relation.
//!
//! The JSON shapes are loose (a field entry is `false`, `true` or an object;
//! an action entry is `false`, `true` or `{ "fields": {...} }`). Both are
//! parsed into explicit variants so every consumer matches exhaustively.

use crate::action::Action;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name to field policy, in configuration order
pub type FieldConfigMap = IndexMap<String, FieldPolicy>;

/// Keys the resolved output owns; never taken from configuration
pub const RESERVED_KEYS: &[&str] = &["populated"];

/// Per-field configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display tooltip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Widget/value type override
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Whether the form requires a value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Group names allowed to see the field; `None` means every group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_access_rights: Option<Vec<String>>,
    /// Any further UI settings, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FieldConfig {
    /// Create an empty field config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Reserved keys present in `extra`
    pub fn reserved_keys(&self) -> impl Iterator<Item = &str> {
        RESERVED_KEYS
            .iter()
            .copied()
            .filter(|key| self.extra.contains_key(*key))
    }

    /// Drop reserved keys from `extra`, returning how many were removed
    pub fn strip_reserved(&mut self) -> usize {
        RESERVED_KEYS
            .iter()
            .filter(|key| self.extra.remove(**key).is_some())
            .count()
    }

    /// Restrict visibility to the named groups
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups_access_rights = Some(groups.into_iter().map(Into::into).collect());
        self
    }
}

/// Policy for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFieldPolicy", into = "RawFieldPolicy")]
pub enum FieldPolicy {
    /// `false`: structurally removed
    Disabled,
    /// `true`: enabled with no extra policy
    Enabled,
    /// Enabled with explicit configuration
    Configured(FieldConfig),
}

impl FieldPolicy {
    /// Check if the field is structurally removed
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Get the explicit configuration, if any
    #[must_use]
    pub fn config(&self) -> Option<&FieldConfig> {
        match self {
            Self::Configured(config) => Some(config),
            Self::Disabled | Self::Enabled => None,
        }
    }

    /// Group restriction, if any
    #[must_use]
    pub fn groups_access_rights(&self) -> Option<&[String]> {
        self.config()
            .and_then(|config| config.groups_access_rights.as_deref())
    }
}

impl From<FieldConfig> for FieldPolicy {
    fn from(config: FieldConfig) -> Self {
        Self::Configured(config)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawFieldPolicy {
    Flag(bool),
    Config(FieldConfig),
}

impl From<RawFieldPolicy> for FieldPolicy {
    fn from(raw: RawFieldPolicy) -> Self {
        match raw {
            RawFieldPolicy::Flag(false) => Self::Disabled,
            RawFieldPolicy::Flag(true) => Self::Enabled,
            RawFieldPolicy::Config(config) => Self::Configured(config),
        }
    }
}

impl From<FieldPolicy> for RawFieldPolicy {
    fn from(policy: FieldPolicy) -> Self {
        match policy {
            FieldPolicy::Disabled => Self::Flag(false),
            FieldPolicy::Enabled => Self::Flag(true),
            FieldPolicy::Configured(config) => Self::Config(config),
        }
    }
}

/// Policy for one action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawActionPolicy", into = "RawActionPolicy")]
pub enum ActionPolicy {
    /// `false`: the action exposes no fields
    Disabled,
    /// `true` or absent: the base tier applies unchanged
    #[default]
    DefaultEnabled,
    /// `{ "fields": {...} }`: overrides layered over the base tier
    Overridden(FieldConfigMap),
}

#[derive(Clone, Serialize, Deserialize)]
struct ActionOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<FieldConfigMap>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawActionPolicy {
    Flag(bool),
    Object(ActionOverride),
}

impl From<RawActionPolicy> for ActionPolicy {
    fn from(raw: RawActionPolicy) -> Self {
        match raw {
            RawActionPolicy::Flag(false) => Self::Disabled,
            RawActionPolicy::Flag(true) => Self::DefaultEnabled,
            RawActionPolicy::Object(ActionOverride { fields: Some(fields) }) => {
                Self::Overridden(fields)
            }
            RawActionPolicy::Object(ActionOverride { fields: None }) => Self::DefaultEnabled,
        }
    }
}

impl From<ActionPolicy> for RawActionPolicy {
    fn from(policy: ActionPolicy) -> Self {
        match policy {
            ActionPolicy::Disabled => Self::Flag(false),
            ActionPolicy::DefaultEnabled => Self::Flag(true),
            ActionPolicy::Overridden(fields) => Self::Object(ActionOverride {
                fields: Some(fields),
            }),
        }
    }
}

/// Ownership relation of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserAccessRelation {
    /// `"field"`
    Field(String),
    /// `{ "field": ..., "via": ... }`
    Detailed {
        /// Association on this model
        field: String,
        /// Association on the intermediate entity, for indirect ownership
        #[serde(default, skip_serializing_if = "Option::is_none")]
        via: Option<String>,
    },
}

impl UserAccessRelation {
    /// Association field on this model
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Field(field) | Self::Detailed { field, .. } => field,
        }
    }

    /// Field on the intermediate entity, if the relation is indirect
    #[must_use]
    pub fn via(&self) -> Option<&str> {
        match self {
            Self::Field(_) => None,
            Self::Detailed { via, .. } => via.as_deref(),
        }
    }
}

/// Entity configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    /// Base tier
    #[serde(default)]
    pub fields: FieldConfigMap,
    /// Action tier: add
    #[serde(default)]
    pub add: ActionPolicy,
    /// Action tier: edit
    #[serde(default)]
    pub edit: ActionPolicy,
    /// Action tier: list
    #[serde(default)]
    pub list: ActionPolicy,
    /// Action tier: view
    #[serde(default)]
    pub view: ActionPolicy,
    /// Action tier: remove
    #[serde(default)]
    pub remove: ActionPolicy,
    /// Row ownership relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_access_relation: Option<UserAccessRelation>,
}

impl EntityConfig {
    /// Create an empty configuration (every action default-enabled)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action-tier policy
    #[must_use]
    pub fn action(&self, action: Action) -> &ActionPolicy {
        match action {
            Action::Add => &self.add,
            Action::Edit => &self.edit,
            Action::List => &self.list,
            Action::View => &self.view,
            Action::Remove => &self.remove,
        }
    }

    fn action_mut(&mut self, action: Action) -> &mut ActionPolicy {
        match action {
            Action::Add => &mut self.add,
            Action::Edit => &mut self.edit,
            Action::List => &mut self.list,
            Action::View => &mut self.view,
            Action::Remove => &mut self.remove,
        }
    }

    /// Set a base-tier field policy
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, policy: impl Into<FieldPolicy>) -> Self {
        self.fields.insert(name.into(), policy.into());
        self
    }

    /// Set an action-tier policy
    #[must_use]
    pub fn with_action(mut self, action: Action, policy: ActionPolicy) -> Self {
        *self.action_mut(action) = policy;
        self
    }

    /// Set the ownership relation
    #[must_use]
    pub fn with_user_access_relation(mut self, relation: UserAccessRelation) -> Self {
        self.user_access_relation = Some(relation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_policy_shapes() {
        let map: FieldConfigMap = serde_json::from_value(json!({
            "hidden": false,
            "plain": true,
            "guarded": {"title": "Guarded", "groupsAccessRights": ["admin"]}
        }))
        .unwrap();

        assert_eq!(map["hidden"], FieldPolicy::Disabled);
        assert_eq!(map["plain"], FieldPolicy::Enabled);
        assert_eq!(
            map["guarded"].groups_access_rights(),
            Some(&["admin".to_string()][..])
        );
    }

    #[test]
    fn test_field_config_keeps_extra_keys() {
        let config: FieldConfig =
            serde_json::from_value(json!({"title": "T", "widget": "markdown"})).unwrap();
        assert_eq!(config.extra.get("widget"), Some(&json!("markdown")));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back, json!({"title": "T", "widget": "markdown"}));
    }

    #[test]
    fn test_reserved_keys_are_stripped() {
        let mut config: FieldConfig =
            serde_json::from_value(json!({"title": "T", "populated": {"secret": true}, "widget": "x"}))
                .unwrap();
        assert_eq!(config.reserved_keys().collect::<Vec<_>>(), vec!["populated"]);

        assert_eq!(config.strip_reserved(), 1);
        assert_eq!(config.reserved_keys().count(), 0);
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"title": "T", "widget": "x"})
        );
        assert_eq!(config.strip_reserved(), 0);
    }

    #[test]
    fn test_action_policy_shapes() {
        let config: EntityConfig = serde_json::from_value(json!({
            "add": false,
            "edit": {"fields": {"title": {"required": true}}},
            "list": true,
            "view": {"title": "not a fields key"}
        }))
        .unwrap();

        assert_eq!(config.add, ActionPolicy::Disabled);
        assert!(matches!(config.edit, ActionPolicy::Overridden(ref f) if f.contains_key("title")));
        assert_eq!(config.list, ActionPolicy::DefaultEnabled);
        assert_eq!(config.view, ActionPolicy::DefaultEnabled);
        assert_eq!(config.remove, ActionPolicy::DefaultEnabled);
    }

    #[test]
    fn test_action_lookup() {
        let config = EntityConfig::new().with_action(Action::Remove, ActionPolicy::Disabled);
        assert_eq!(config.action(Action::Remove), &ActionPolicy::Disabled);
        assert_eq!(config.action(Action::Add), &ActionPolicy::DefaultEnabled);
    }

    #[test]
    fn test_user_access_relation_shapes() {
        let short: UserAccessRelation = serde_json::from_value(json!("owner")).unwrap();
        assert_eq!(short.field(), "owner");
        assert_eq!(short.via(), None);

        let detailed: UserAccessRelation =
            serde_json::from_value(json!({"field": "project", "via": "owner"})).unwrap();
        assert_eq!(detailed.field(), "project");
        assert_eq!(detailed.via(), Some("owner"));

        let no_via: UserAccessRelation =
            serde_json::from_value(json!({"field": "userField"})).unwrap();
        assert_eq!(no_via.field(), "userField");
        assert_eq!(no_via.via(), None);
    }

    #[test]
    fn test_action_policy_serializes_back() {
        let mut fields = FieldConfigMap::new();
        fields.insert("title".to_string(), FieldPolicy::Disabled);
        let value = serde_json::to_value(ActionPolicy::Overridden(fields)).unwrap();
        assert_eq!(value, json!({"fields": {"title": false}}));
        assert_eq!(serde_json::to_value(ActionPolicy::Disabled).unwrap(), json!(false));
    }
}
