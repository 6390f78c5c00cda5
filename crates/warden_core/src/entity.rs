//! An entity: a named model together with its admin configuration.

use crate::config::EntityConfig;
use crate::model::ModelMeta;
use serde::{Deserialize, Serialize};

/// Entity (model metadata plus configuration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name, as referenced by association attributes
    pub name: String,
    /// Model metadata
    pub model: ModelMeta,
    /// Entity configuration
    pub config: EntityConfig,
}

impl Entity {
    /// Create a new entity
    #[must_use]
    pub fn new(name: impl Into<String>, model: ModelMeta, config: EntityConfig) -> Self {
        Self {
            name: name.into(),
            model,
            config,
        }
    }
}
