//! CRUD actions a field policy is evaluated against.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Controller action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create a record
    Add,
    /// Update a record
    Edit,
    /// List records
    List,
    /// Show a single record
    View,
    /// Delete a record
    Remove,
}

impl Action {
    /// Every action, in configuration order
    pub const ALL: [Action; 5] = [
        Action::Add,
        Action::Edit,
        Action::List,
        Action::View,
        Action::Remove,
    ];

    /// Get the configuration key for this action
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::List => "list",
            Self::View => "view",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownAction {
                name: s.to_string(),
            })
    }
}
