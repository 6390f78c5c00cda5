//! WARDEN Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! Entity configuration, model metadata and actors are plain serde types
//! loaded once at configuration time and read-only afterwards.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod actor;
pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod ownership;
pub mod registry;

// Re-exports
pub use action::Action;
pub use actor::{Actor, Group};
pub use config::{
    ActionPolicy, EntityConfig, FieldConfig, FieldConfigMap, FieldPolicy, RESERVED_KEYS,
    UserAccessRelation,
};
pub use entity::Entity;
pub use error::{CoreError, CoreResult};
pub use id::RecordId;
pub use model::{AssociationKind, AttributeDescriptor, ModelMeta};
pub use ownership::{OwnerKind, OwnershipModels};
pub use registry::{
    ConfigIssue, EntityDocument, EntityRegistry, InMemoryRegistry, IssueKind, RegistryDocument,
};

/// A raw record as returned by (or handed to) the ORM layer.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Query criteria handed to the ORM layer.
pub type Criteria = serde_json::Map<String, serde_json::Value>;
