//! Row ownership: scoping reads and stamping creates.
//!
//! The ownership relation (`userAccessRelation`) must name a single-valued
//! association on the model. With `via`, that association points at an
//! intermediate entity whose `via` association points at the owner.

use crate::error::{AccessError, AccessResult};
use serde_json::{Value, json};
use warden_core::{Actor, AssociationKind, Criteria, Entity, EntityRegistry, OwnerKind, Record};

/// Ownership relation after validation against model metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelation<'a> {
    /// Association field on the entity
    pub field: &'a str,
    /// Association field on the intermediate entity, if indirect
    pub via: Option<&'a str>,
    /// Entity the relation finally points at
    pub target: &'a str,
    /// Whether that entity is the actor or group entity
    pub owner: Option<OwnerKind>,
}

/// Resolves and applies an entity's ownership relation for one actor
pub struct OwnershipResolver<'a> {
    entity: &'a Entity,
    actor: &'a Actor,
    registry: &'a dyn EntityRegistry,
}

impl<'a> OwnershipResolver<'a> {
    /// Create a resolver
    #[must_use]
    pub fn new(entity: &'a Entity, actor: &'a Actor, registry: &'a dyn EntityRegistry) -> Self {
        Self {
            entity,
            actor,
            registry,
        }
    }

    /// Validate and resolve the configured relation.
    ///
    /// Returns `Ok(None)` when the entity has no ownership relation.
    ///
    /// Existence alone is not enough: the field must be a single-valued
    /// (`model`) association. Scalars and collections are rejected, since
    /// an ownership clause or stamp needs exactly one owner id per row.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidOwnershipRelation`] if a named field is
    /// missing or is not a single-valued association, or if the
    /// intermediate entity is not registered
    pub fn resolve(&self) -> AccessResult<Option<ResolvedRelation<'a>>> {
        let entity = self.entity;
        let Some(relation) = &entity.config.user_access_relation else {
            return Ok(None);
        };
        let field = relation.field();
        let target = self.single_association(entity, field, field)?;

        let (via, target) = match relation.via() {
            None => (None, target),
            Some(via) => {
                let intermediate = self.registry.entity(target).ok_or_else(|| {
                    self.invalid(field, format!("intermediate entity `{target}` is not registered"))
                })?;
                (Some(via), self.single_association(intermediate, via, field)?)
            }
        };

        Ok(Some(ResolvedRelation {
            field,
            via,
            target,
            owner: self.registry.ownership().kind_of(target),
        }))
    }

    /// Add an ownership clause to read criteria.
    ///
    /// Criteria are returned unchanged when no relation is configured. An
    /// existing constraint on the ownership field is kept and ANDed with
    /// the clause, never replaced by it.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidOwnershipRelation`] if the relation does
    /// not resolve or does not end at the actor or group entity
    pub fn sanitize_user_relation_access(&self, mut criteria: Criteria) -> AccessResult<Criteria> {
        let Some(relation) = self.resolve().inspect_err(|err| self.log_rejected(err))? else {
            return Ok(criteria);
        };

        let owner_clause = match relation.owner {
            Some(OwnerKind::Actor) => self.actor.id.to_value(),
            Some(OwnerKind::Group) => {
                let ids: Vec<Value> = self.actor.groups.iter().map(|g| g.id.to_value()).collect();
                json!({ "in": ids })
            }
            None => {
                let err = self.invalid(
                    relation.field,
                    format!("`{}` is neither the actor nor the group entity", relation.target),
                );
                self.log_rejected(&err);
                return Err(err);
            }
        };
        let clause = match relation.via {
            Some(via) => json!({ via: owner_clause }),
            None => owner_clause,
        };

        and_into(&mut criteria, relation.field, clause);
        tracing::debug!(
            entity = %self.entity.name,
            field = relation.field,
            actor = %self.actor.id,
            "scoped criteria to owner"
        );
        Ok(criteria)
    }

    /// Set the ownership field on a record about to be created.
    ///
    /// Records are returned unchanged when no relation is configured, when
    /// the relation is indirect, or when it targets neither the actor nor
    /// the group entity. Any caller-supplied value is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidOwnershipRelation`] if the relation does
    /// not resolve, and [`AccessError::OwnershipAmbiguity`] if the record is
    /// group-owned and the actor is not in exactly one group
    pub fn set_user_relation_access(&self, mut record: Record) -> AccessResult<Record> {
        let Some(relation) = self.resolve().inspect_err(|err| self.log_rejected(err))? else {
            return Ok(record);
        };
        if relation.via.is_some() {
            tracing::debug!(
                entity = %self.entity.name,
                field = relation.field,
                "indirect ownership relation, record left as is"
            );
            return Ok(record);
        }

        let owner = match relation.owner {
            Some(OwnerKind::Actor) => self.actor.id.to_value(),
            Some(OwnerKind::Group) => match self.actor.sole_group() {
                Some(group) => group.id.to_value(),
                None => {
                    let err = AccessError::OwnershipAmbiguity {
                        entity: self.entity.name.clone(),
                        field: relation.field.to_string(),
                        group_count: self.actor.groups.len(),
                    };
                    tracing::warn!(actor = %self.actor.id, "{}", err);
                    return Err(err);
                }
            },
            None => return Ok(record),
        };

        record.insert(relation.field.to_string(), owner);
        Ok(record)
    }

    fn single_association(
        &self,
        entity: &'a Entity,
        name: &str,
        relation_field: &str,
    ) -> AccessResult<&'a str> {
        let attr = entity.model.attribute(name).ok_or_else(|| {
            self.invalid(
                relation_field,
                format!("`{}` has no attribute `{}`", entity.name, name),
            )
        })?;
        match attr.association_target() {
            Some((target, AssociationKind::One)) => Ok(target),
            Some((_, AssociationKind::Many)) => Err(self.invalid(
                relation_field,
                format!("`{}.{}` is a collection, not a single association", entity.name, name),
            )),
            None => Err(self.invalid(
                relation_field,
                format!("`{}.{}` is not an association", entity.name, name),
            )),
        }
    }

    fn invalid(&self, field: &str, reason: String) -> AccessError {
        AccessError::InvalidOwnershipRelation {
            entity: self.entity.name.clone(),
            field: field.to_string(),
            reason,
        }
    }

    fn log_rejected(&self, err: &AccessError) {
        tracing::warn!(entity = %self.entity.name, "{}", err);
    }
}

/// AND `clause` into `criteria` under `field`.
fn and_into(criteria: &mut Criteria, field: &str, clause: Value) {
    let Some(existing) = criteria.remove(field) else {
        criteria.insert(field.to_string(), clause);
        return;
    };

    let mut terms = match criteria.remove("and") {
        Some(Value::Array(terms)) => terms,
        Some(other) => vec![other],
        None => Vec::new(),
    };
    terms.push(json!({ field: existing }));
    terms.push(json!({ field: clause }));
    criteria.insert("and".to_string(), Value::Array(terms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn criteria(value: Value) -> Criteria {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_no_relation_is_noop() {
        let registry = testing::registry();
        let manager = testing::manager();
        let group = registry.entity("group").unwrap();
        let resolver = OwnershipResolver::new(group, &manager, &registry);

        assert_eq!(resolver.resolve().unwrap(), None);
        let scoped = resolver
            .sanitize_user_relation_access(criteria(json!({"name": "x"})))
            .unwrap();
        assert_eq!(Value::Object(scoped), json!({"name": "x"}));
    }

    #[test]
    fn test_scope_to_actor() {
        let registry = testing::registry();
        let manager = testing::manager();
        let article = registry.entity("article").unwrap();
        let resolver = OwnershipResolver::new(article, &manager, &registry);

        let scoped = resolver.sanitize_user_relation_access(Criteria::new()).unwrap();
        assert_eq!(Value::Object(scoped), json!({"userField": 2}));
    }

    #[test]
    fn test_scope_invalid_field() {
        let registry = testing::registry();
        let manager = testing::manager();
        let entity = registry.entity("broken").unwrap();
        let resolver = OwnershipResolver::new(entity, &manager, &registry);

        let err = resolver.sanitize_user_relation_access(Criteria::new()).unwrap_err();
        assert!(matches!(
            err,
            AccessError::InvalidOwnershipRelation { ref field, .. } if field == "invalidField"
        ));
    }

    #[test]
    fn test_scope_rejects_scalar_and_collection() {
        let registry = testing::registry();
        let manager = testing::manager();

        for name in ["scalarOwned", "collectionOwned"] {
            let entity = registry.entity(name).unwrap();
            let resolver = OwnershipResolver::new(entity, &manager, &registry);
            assert!(resolver.resolve().is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_scope_rejects_non_owner_target() {
        let registry = testing::registry();
        let manager = testing::manager();
        let entity = registry.entity("categorized").unwrap();
        let resolver = OwnershipResolver::new(entity, &manager, &registry);

        assert!(resolver.resolve().unwrap().unwrap().owner.is_none());
        assert!(resolver.sanitize_user_relation_access(Criteria::new()).is_err());
    }

    #[test]
    fn test_scope_to_groups() {
        let registry = testing::registry();
        let multi = testing::multi_group();
        let entity = registry.entity("teamDoc").unwrap();
        let resolver = OwnershipResolver::new(entity, &multi, &registry);

        let scoped = resolver.sanitize_user_relation_access(Criteria::new()).unwrap();
        assert_eq!(Value::Object(scoped), json!({"groupField": {"in": [2, 3]}}));
    }

    #[test]
    fn test_scope_without_groups_matches_nothing() {
        let registry = testing::registry();
        let drifter = testing::drifter();
        let entity = registry.entity("teamDoc").unwrap();
        let resolver = OwnershipResolver::new(entity, &drifter, &registry);

        let scoped = resolver.sanitize_user_relation_access(Criteria::new()).unwrap();
        assert_eq!(Value::Object(scoped), json!({"groupField": {"in": []}}));
    }

    #[test]
    fn test_scope_via_intermediate() {
        let registry = testing::registry();
        let manager = testing::manager();
        let task = registry.entity("task").unwrap();
        let resolver = OwnershipResolver::new(task, &manager, &registry);

        let relation = resolver.resolve().unwrap().unwrap();
        assert_eq!(relation.via, Some("owner"));
        assert_eq!(relation.target, "user");

        let scoped = resolver
            .sanitize_user_relation_access(criteria(json!({"done": false})))
            .unwrap();
        assert_eq!(
            Value::Object(scoped),
            json!({"done": false, "project": {"owner": 2}})
        );
    }

    #[test]
    fn test_scope_keeps_caller_constraint() {
        let registry = testing::registry();
        let manager = testing::manager();
        let article = registry.entity("article").unwrap();
        let resolver = OwnershipResolver::new(article, &manager, &registry);

        let scoped = resolver
            .sanitize_user_relation_access(criteria(json!({
                "userField": 1,
                "and": [{"title": "x"}]
            })))
            .unwrap();
        assert_eq!(
            Value::Object(scoped),
            json!({"and": [{"title": "x"}, {"userField": 1}, {"userField": 2}]})
        );
    }

    #[test]
    fn test_stamp_actor() {
        let registry = testing::registry();
        let manager = testing::manager();
        let article = registry.entity("article").unwrap();
        let resolver = OwnershipResolver::new(article, &manager, &registry);

        let stamped = resolver
            .set_user_relation_access(criteria(json!({"title": "t", "userField": 99})))
            .unwrap();
        assert_eq!(Value::Object(stamped), json!({"title": "t", "userField": 2}));
    }

    #[test]
    fn test_stamp_sole_group() {
        let registry = testing::registry();
        let manager = testing::manager();
        let entity = registry.entity("teamDoc").unwrap();
        let resolver = OwnershipResolver::new(entity, &manager, &registry);

        let stamped = resolver.set_user_relation_access(Record::new()).unwrap();
        assert_eq!(stamped.get("groupField"), Some(&json!(2)));
    }

    #[test]
    fn test_stamp_group_ambiguity() {
        let registry = testing::registry();
        let entity = registry.entity("teamDoc").unwrap();

        for (actor, count) in [(testing::multi_group(), 2), (testing::drifter(), 0)] {
            let resolver = OwnershipResolver::new(entity, &actor, &registry);
            let err = resolver.set_user_relation_access(Record::new()).unwrap_err();
            assert_eq!(
                err,
                AccessError::OwnershipAmbiguity {
                    entity: "teamDoc".to_string(),
                    field: "groupField".to_string(),
                    group_count: count,
                }
            );
        }
    }

    #[test]
    fn test_stamp_other_target_unchanged() {
        let registry = testing::registry();
        let manager = testing::manager();

        for name in ["categorized", "task"] {
            let entity = registry.entity(name).unwrap();
            let resolver = OwnershipResolver::new(entity, &manager, &registry);
            let record = criteria(json!({"title": "t"}));
            assert_eq!(resolver.set_user_relation_access(record.clone()).unwrap(), record);
        }
    }

    #[test]
    fn test_stamp_invalid_field() {
        let registry = testing::registry();
        let manager = testing::manager();
        let entity = registry.entity("broken").unwrap();
        let resolver = OwnershipResolver::new(entity, &manager, &registry);
        assert!(resolver.set_user_relation_access(Record::new()).is_err());
    }
}
