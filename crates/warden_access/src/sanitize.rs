//! Record sanitizing before records leave the controller.
//!
//! A record key survives only if it is visible in the action tier *and*
//! in the base tier for the same actor. Action overrides shape forms; the
//! base tier is the ceiling on what stored values may reveal.

use std::collections::HashSet;
use warden_core::{FieldConfigMap, Record};

/// Projects records onto the fields an actor may read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSanitizer {
    /// Fields present in both tiers
    allowed: HashSet<String>,
}

impl DataSanitizer {
    /// Create from the group-filtered action-tier and base-tier maps
    #[must_use]
    pub fn new(action_fields: &FieldConfigMap, base_fields: &FieldConfigMap) -> Self {
        let allowed = action_fields
            .keys()
            .filter(|name| base_fields.contains_key(name.as_str()))
            .cloned()
            .collect();
        Self { allowed }
    }

    /// Check if a field's value may be disclosed
    #[must_use]
    pub fn allows(&self, field: &str) -> bool {
        self.allowed.contains(field)
    }

    /// Project one record. Unknown keys (system columns) are dropped.
    #[must_use]
    pub fn process(&self, record: &Record) -> Record {
        record
            .iter()
            .filter(|(key, _)| self.allows(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Project records element-wise, preserving order and length
    #[must_use]
    pub fn process_many(&self, records: &[Record]) -> Vec<Record> {
        records.iter().map(|record| self.process(record)).collect()
    }
}
