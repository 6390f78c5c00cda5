//! Access errors.
//!
//! Both kinds are raised synchronously, before any query runs, and neither
//! is worth retrying.

/// Access result type
pub type AccessResult<T> = Result<T, AccessError>;

/// Who is at fault for an access error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Deployment or configuration defect (500-class)
    Configuration,
    /// Current actor's state makes the request invalid (4xx-class)
    ActorState,
}

/// Access error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// `userAccessRelation` does not resolve to a usable association
    #[error("invalid ownership relation `{field}` on `{entity}`: {reason}")]
    InvalidOwnershipRelation {
        /// Entity whose configuration is wrong
        entity: String,
        /// Configured relation field
        field: String,
        /// What failed to resolve
        reason: String,
    },

    /// A group-owned record cannot be stamped for this actor
    #[error("cannot assign `{field}` on `{entity}`: actor belongs to {group_count} groups, expected exactly one")]
    OwnershipAmbiguity {
        /// Entity being created
        entity: String,
        /// Ownership relation field
        field: String,
        /// Number of groups the actor belongs to
        group_count: usize,
    },
}

impl AccessError {
    /// Classify the error for response mapping
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOwnershipRelation { .. } => ErrorKind::Configuration,
            Self::OwnershipAmbiguity { .. } => ErrorKind::ActorState,
        }
    }
}
