//! Core error types for WARDEN.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Malformed registry document, actor or record
    #[error("Parse error: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// Entity name not present in the registry
    #[error("Unknown entity: {name}")]
    UnknownEntity {
        /// Requested entity name
        name: String,
    },

    /// Action name outside add/edit/list/view/remove
    #[error("Unknown action: {name}")]
    UnknownAction {
        /// Requested action name
        name: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnknownEntity {
            name: "invoice".to_string(),
        };
        assert_eq!(format!("{}", err), "Unknown entity: invoice");

        let err = CoreError::UnknownAction {
            name: "publish".to_string(),
        };
        assert_eq!(format!("{}", err), "Unknown action: publish");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CoreError = parse.unwrap_err().into();
        assert!(matches!(err, CoreError::Parse { .. }));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_error_equality() {
        let err1 = CoreError::UnknownEntity {
            name: "a".to_string(),
        };
        let err2 = CoreError::UnknownEntity {
            name: "a".to_string(),
        };
        assert_eq!(err1, err2);

        let err3 = CoreError::UnknownAction {
            name: "a".to_string(),
        };
        assert_ne!(err1, err3);
    }
}
