//! Error types for workflow operators.

use thiserror::Error;

use scanprep_core::{InteractionMode, OrientError};

use crate::engine::EngineError;

/// Errors that can occur while running an operator.
#[derive(Debug, Error)]
pub enum OpError {
    /// Operator needs an active object.
    #[error("no active object")]
    NoActiveObject,

    /// Wrong number of selected objects.
    #[error("expected {expected} selected objects, found {found}")]
    SelectionCount { expected: usize, found: usize },

    /// Object has no mesh data.
    #[error("object '{object}' has no mesh")]
    MissingMesh { object: String },

    /// Operator cannot run in the current interaction mode.
    #[error("operator requires {expected} mode, scene is in {found} mode")]
    WrongMode {
        expected: InteractionMode,
        found: InteractionMode,
    },

    /// Parameter outside its valid range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Orient(#[from] OrientError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for operators.
pub type OpResult<T> = std::result::Result<T, OpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OpError::SelectionCount {
            expected: 2,
            found: 1,
        };
        assert_eq!(format!("{err}"), "expected 2 selected objects, found 1");

        let err = OpError::WrongMode {
            expected: InteractionMode::Object,
            found: InteractionMode::Edit,
        };
        assert_eq!(
            format!("{err}"),
            "operator requires object mode, scene is in edit mode"
        );
    }

    #[test]
    fn test_from_orient_error() {
        let err: OpError = OrientError::EmptySelection.into();
        assert!(matches!(err, OpError::Orient(OrientError::EmptySelection)));
        assert_eq!(format!("{err}"), "no vertices are selected");
    }
}
