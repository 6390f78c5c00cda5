//! WARDEN Access
//!
//! Field- and row-level access control for CRUD controllers.
//!
//! For one (entity, action, actor) request this crate:
//! - merges the entity's base field tier with the action's overrides
//! - hides fields restricted to groups the actor is not in
//! - describes association targets one level deep
//! - strips records down to fields visible in both tiers
//! - scopes read criteria and stamps created records with the owner
//!
//! All inputs are read-only; results are recomputed per call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod association;
pub mod error;
pub mod explain;
pub mod merge;
pub mod ownership;
pub mod sanitize;
pub mod visibility;

#[cfg(test)]
mod testing;

// Re-exports
pub use accessor::{
    Accessor, get_fields_config, process, process_many, sanitize_user_relation_access,
    set_user_relation_access,
};
pub use association::{
    AssociationPolicyResolver, MAX_POPULATE_DEPTH, ResolvedField, ResolvedFieldConfig,
};
pub use error::{AccessError, AccessResult, ErrorKind};
pub use explain::{FieldDecision, FieldOutcome, explain};
pub use merge::FieldPolicyMerger;
pub use ownership::{OwnershipResolver, ResolvedRelation};
pub use sanitize::DataSanitizer;
pub use visibility::GroupVisibilityFilter;
