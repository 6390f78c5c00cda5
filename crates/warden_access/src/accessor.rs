//! The accessor binds one (entity, action, actor) request.

use crate::association::{AssociationPolicyResolver, ResolvedFieldConfig};
use crate::error::AccessResult;
use crate::explain::{self, FieldDecision};
use crate::merge::FieldPolicyMerger;
use crate::ownership::OwnershipResolver;
use crate::sanitize::DataSanitizer;
use crate::visibility::GroupVisibilityFilter;
use warden_core::{Action, Actor, Criteria, Entity, EntityRegistry, FieldConfigMap, Record};

/// Field- and row-level access decisions for one request
///
/// Holds only borrowed, read-only state; build one per request.
pub struct Accessor<'a> {
    entity: &'a Entity,
    action: Action,
    actor: &'a Actor,
    registry: &'a dyn EntityRegistry,
}

impl<'a> Accessor<'a> {
    /// Create an accessor
    #[must_use]
    pub fn new(
        entity: &'a Entity,
        action: Action,
        actor: &'a Actor,
        registry: &'a dyn EntityRegistry,
    ) -> Self {
        Self {
            entity,
            action,
            actor,
            registry,
        }
    }

    /// Get the entity
    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// Get the action
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Get the actor
    #[must_use]
    pub fn actor(&self) -> &'a Actor {
        self.actor
    }

    /// Resolved field configuration for this action, with association
    /// fields populated from their targets' base tiers
    #[must_use]
    pub fn fields_config(&self) -> ResolvedFieldConfig {
        let fields = self.fields_config_without_population();
        let resolved = AssociationPolicyResolver::new(self.registry, self.actor).resolve(
            fields,
            &self.entity.model,
            0,
        );
        tracing::debug!(
            entity = %self.entity.name,
            action = %self.action,
            actor = %self.actor.id,
            fields = resolved.len(),
            "resolved fields config"
        );
        resolved
    }

    /// Action-tier fields visible to the actor, without `populated`
    #[must_use]
    pub fn fields_config_without_population(&self) -> FieldConfigMap {
        let fields = FieldPolicyMerger::new(self.entity).action_fields(self.action);
        GroupVisibilityFilter::new(self.actor).apply(fields)
    }

    /// Base-tier fields visible to the actor
    #[must_use]
    pub fn base_fields(&self) -> FieldConfigMap {
        let fields = FieldPolicyMerger::new(self.entity).base_fields();
        GroupVisibilityFilter::new(self.actor).apply(fields)
    }

    /// Sanitizer for this request
    #[must_use]
    pub fn sanitizer(&self) -> DataSanitizer {
        DataSanitizer::new(&self.fields_config_without_population(), &self.base_fields())
    }

    /// Strip a record down to the fields the actor may read
    #[must_use]
    pub fn process(&self, record: &Record) -> Record {
        self.sanitizer().process(record)
    }

    /// Strip each record, preserving order and length
    #[must_use]
    pub fn process_many(&self, records: &[Record]) -> Vec<Record> {
        let out = self.sanitizer().process_many(records);
        tracing::trace!(entity = %self.entity.name, records = out.len(), "processed records");
        out
    }

    /// Add the ownership clause to read criteria
    ///
    /// # Errors
    ///
    /// Returns [`crate::AccessError::InvalidOwnershipRelation`] if the
    /// entity's ownership relation is misconfigured
    pub fn sanitize_user_relation_access(&self, criteria: Criteria) -> AccessResult<Criteria> {
        self.ownership().sanitize_user_relation_access(criteria)
    }

    /// Stamp the ownership field on a record about to be created
    ///
    /// # Errors
    ///
    /// Returns [`crate::AccessError::InvalidOwnershipRelation`] if the
    /// relation is misconfigured, or [`crate::AccessError::OwnershipAmbiguity`]
    /// if a group-owned record cannot be attributed to a single group
    pub fn set_user_relation_access(&self, record: Record) -> AccessResult<Record> {
        self.ownership().set_user_relation_access(record)
    }

    /// Per-field decisions for this request
    #[must_use]
    pub fn explain(&self) -> Vec<FieldDecision> {
        explain::explain(self.entity, self.action, self.actor)
    }

    fn ownership(&self) -> OwnershipResolver<'a> {
        OwnershipResolver::new(self.entity, self.actor, self.registry)
    }
}

/// Resolved field configuration for (entity, action, actor)
#[must_use]
pub fn get_fields_config(
    entity: &Entity,
    action: Action,
    actor: &Actor,
    registry: &dyn EntityRegistry,
) -> ResolvedFieldConfig {
    Accessor::new(entity, action, actor, registry).fields_config()
}

/// Strip a record down to the fields `actor` may read for `action`
#[must_use]
pub fn process(entity: &Entity, action: Action, actor: &Actor, record: &Record) -> Record {
    request_sanitizer(entity, action, actor).process(record)
}

/// Strip each record down to the fields `actor` may read for `action`
#[must_use]
pub fn process_many(entity: &Entity, action: Action, actor: &Actor, records: &[Record]) -> Vec<Record> {
    request_sanitizer(entity, action, actor).process_many(records)
}

/// Add the ownership clause to read criteria
///
/// # Errors
///
/// See [`Accessor::sanitize_user_relation_access`]
pub fn sanitize_user_relation_access(
    entity: &Entity,
    actor: &Actor,
    registry: &dyn EntityRegistry,
    criteria: Criteria,
) -> AccessResult<Criteria> {
    OwnershipResolver::new(entity, actor, registry).sanitize_user_relation_access(criteria)
}

/// Stamp the ownership field on a record about to be created
///
/// # Errors
///
/// See [`Accessor::set_user_relation_access`]
pub fn set_user_relation_access(
    entity: &Entity,
    actor: &Actor,
    registry: &dyn EntityRegistry,
    record: Record,
) -> AccessResult<Record> {
    OwnershipResolver::new(entity, actor, registry).set_user_relation_access(record)
}

fn request_sanitizer(entity: &Entity, action: Action, actor: &Actor) -> DataSanitizer {
    let merger = FieldPolicyMerger::new(entity);
    let filter = GroupVisibilityFilter::new(actor);
    DataSanitizer::new(
        &filter.apply(merger.action_fields(action)),
        &filter.apply(merger.base_fields()),
    )
}
