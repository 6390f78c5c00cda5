//! Shared test fixtures.

use warden_core::{
    Action, ActionPolicy, Actor, AttributeDescriptor, Entity, EntityConfig, FieldConfig,
    FieldConfigMap, FieldPolicy, Group, InMemoryRegistry, ModelMeta, UserAccessRelation,
};

fn overrides(entries: Vec<(&str, FieldPolicy)>) -> ActionPolicy {
    let fields: FieldConfigMap = entries
        .into_iter()
        .map(|(name, policy)| (name.to_string(), policy))
        .collect();
    ActionPolicy::Overridden(fields)
}

fn relation(field: &str) -> UserAccessRelation {
    UserAccessRelation::Field(field.to_string())
}

fn user() -> Entity {
    let model = ModelMeta::new()
        .with_attribute("id", AttributeDescriptor::scalar("number"))
        .with_attribute("login", AttributeDescriptor::scalar("string"))
        .with_attribute("email", AttributeDescriptor::scalar("string"))
        .with_attribute("password", AttributeDescriptor::scalar("string"))
        .with_attribute("manager", AttributeDescriptor::association("user"))
        .with_attribute("groups", AttributeDescriptor::collection("group"));
    let config = EntityConfig::new()
        .with_field("email", FieldConfig::new().with_groups(["admin"]))
        .with_field("password", FieldPolicy::Disabled)
        .with_action(Action::List, overrides(vec![("login", FieldPolicy::Disabled)]));
    Entity::new("user", model, config)
}

fn group() -> Entity {
    let model = ModelMeta::new()
        .with_attribute("id", AttributeDescriptor::scalar("number"))
        .with_attribute("name", AttributeDescriptor::scalar("string"));
    Entity::new("group", model, EntityConfig::new())
}

fn article_model() -> ModelMeta {
    ModelMeta::new()
        .with_attribute("id", AttributeDescriptor::scalar("number"))
        .with_attribute("title", AttributeDescriptor::scalar("string"))
        .with_attribute("guardedField", AttributeDescriptor::scalar("string"))
        .with_attribute("body", AttributeDescriptor::scalar("string"))
        .with_attribute("author", AttributeDescriptor::association("user"))
        .with_attribute("category", AttributeDescriptor::association("category"))
        .with_attribute("userField", AttributeDescriptor::association("user"))
}

/// Base tier restricts `guardedField` to admin/editor; `add` repeats that,
/// `edit` widens it to admin/manager and drops `body`; `remove` is off.
fn article_config() -> EntityConfig {
    EntityConfig::new()
        .with_field("guardedField", FieldConfig::new().with_groups(["admin", "editor"]))
        .with_action(
            Action::Add,
            overrides(vec![(
                "guardedField",
                FieldConfig::new().with_groups(["admin", "editor"]).into(),
            )]),
        )
        .with_action(
            Action::Edit,
            overrides(vec![
                ("guardedField", FieldConfig::new().with_groups(["admin", "manager"]).into()),
                ("body", FieldPolicy::Disabled),
            ]),
        )
        .with_action(Action::Remove, ActionPolicy::Disabled)
}

fn article() -> Entity {
    let config = article_config().with_user_access_relation(UserAccessRelation::Detailed {
        field: "userField".to_string(),
        via: None,
    });
    Entity::new("article", article_model(), config)
}

fn single_owner(name: &str, model: ModelMeta, field: &str) -> Entity {
    Entity::new(name, model, EntityConfig::new().with_user_access_relation(relation(field)))
}

pub(crate) fn registry() -> InMemoryRegistry {
    let team_doc = ModelMeta::new()
        .with_attribute("id", AttributeDescriptor::scalar("number"))
        .with_attribute("title", AttributeDescriptor::scalar("string"))
        .with_attribute("groupField", AttributeDescriptor::association("group"));
    let project = ModelMeta::new()
        .with_attribute("id", AttributeDescriptor::scalar("number"))
        .with_attribute("owner", AttributeDescriptor::association("user"));
    let task = ModelMeta::new()
        .with_attribute("id", AttributeDescriptor::scalar("number"))
        .with_attribute("done", AttributeDescriptor::scalar("boolean"))
        .with_attribute("project", AttributeDescriptor::association("project"));
    let task_config = EntityConfig::new().with_user_access_relation(UserAccessRelation::Detailed {
        field: "project".to_string(),
        via: Some("owner".to_string()),
    });
    let tagged = ModelMeta::new()
        .with_attribute("title", AttributeDescriptor::scalar("string"))
        .with_attribute("tags", AttributeDescriptor::collection("user"));

    InMemoryRegistry::new()
        .with_entity(user())
        .with_entity(group())
        .with_entity(article())
        .with_entity(Entity::new(
            "broken",
            article_model(),
            article_config().with_user_access_relation(relation("invalidField")),
        ))
        .with_entity(single_owner("teamDoc", team_doc, "groupField"))
        .with_entity(Entity::new("project", project, EntityConfig::new()))
        .with_entity(Entity::new("task", task, task_config))
        .with_entity(single_owner("scalarOwned", tagged.clone(), "title"))
        .with_entity(single_owner("collectionOwned", tagged, "tags"))
        .with_entity(single_owner("categorized", article_model(), "category"))
}

pub(crate) fn admin() -> Actor {
    Actor::new(1).administrator().with_group(Group::new(1, "admin"))
}

pub(crate) fn manager() -> Actor {
    Actor::new(2).with_group(Group::new(2, "manager"))
}

pub(crate) fn editor() -> Actor {
    Actor::new(3).with_group(Group::new(3, "editor"))
}

/// Actor with no groups
pub(crate) fn drifter() -> Actor {
    Actor::new(4)
}

pub(crate) fn multi_group() -> Actor {
    Actor::new(5)
        .with_group(Group::new(2, "manager"))
        .with_group(Group::new(3, "editor"))
}
