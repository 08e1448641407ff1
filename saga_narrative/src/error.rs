//! Errors raised by the story engine.

use saga_rules::StateError;

/// How an error should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The story data is inconsistent with itself. Report it; the player
    /// stays on the last valid scene.
    DataIntegrity,
    /// The request does not fit the current state (stale option, wrong
    /// solution ID). Reject it and let the player choose again.
    InvalidInput,
    /// Engine setup or content outside the story graph is broken.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataIntegrity => "data_integrity",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
        }
    }
}

/// Errors that can occur while driving a story.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("scene '{scene}' not found in act {act}")]
    SceneNotFound { act: u32, scene: String },

    #[error("act {0} is not loaded")]
    ActNotFound(u32),

    #[error("puzzle mismatch: current scene holds '{expected}', got '{found}'")]
    PuzzleMismatch { expected: String, found: String },

    #[error("scene '{0}' has no puzzle")]
    NoPuzzle(String),

    #[error("puzzle '{puzzle}' has no solution '{solution}'")]
    UnknownSolution { puzzle: String, solution: String },

    #[error("option '{option}' is not available in scene '{scene}'")]
    OptionUnavailable { scene: String, option: String },

    #[error("scene '{scene}' declares option '{option}' more than once")]
    DuplicateOption { scene: String, option: String },

    #[error("unknown quest: {0}")]
    UnknownQuest(String),

    #[error("story data for act {act} is malformed: {source}")]
    StoryFormat {
        act: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    State(#[from] StateError),
}

impl NarrativeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SceneNotFound { .. }
            | Self::ActNotFound(_)
            | Self::PuzzleMismatch { .. }
            | Self::DuplicateOption { .. }
            | Self::StoryFormat { .. } => ErrorSeverity::DataIntegrity,
            Self::NoPuzzle(_)
            | Self::UnknownSolution { .. }
            | Self::OptionUnavailable { .. }
            | Self::UnknownQuest(_) => ErrorSeverity::InvalidInput,
            Self::Config(_) => ErrorSeverity::Internal,
            Self::State(err) => match err {
                StateError::UnknownNakshatra(_) | StateError::Serialization(_) => {
                    ErrorSeverity::InvalidInput
                }
                // Authored triggers that write typed fields with the wrong shape.
                StateError::TypeMismatch { .. } => ErrorSeverity::DataIntegrity,
            },
        }
    }

    /// True if the error points at a defect in the story data.
    pub fn is_data_integrity(&self) -> bool {
        self.severity() == ErrorSeverity::DataIntegrity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classification() {
        let missing = NarrativeError::SceneNotFound {
            act: 1,
            scene: "NOWHERE".to_string(),
        };
        assert!(missing.is_data_integrity());

        let stale = NarrativeError::OptionUnavailable {
            scene: "EXAMINE_BANYAN".to_string(),
            option: "choice-18".to_string(),
        };
        assert_eq!(stale.severity(), ErrorSeverity::InvalidInput);

        let state: NarrativeError = StateError::TypeMismatch {
            key: "karma".into(),
            expected: "an integer",
        }
        .into();
        assert!(state.is_data_integrity());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }

    #[test]
    fn test_messages() {
        let err = NarrativeError::PuzzleMismatch {
            expected: "BarrierOfNegativity".to_string(),
            found: "BanyanTreeHarmony".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "puzzle mismatch: current scene holds 'BarrierOfNegativity', got 'BanyanTreeHarmony'"
        );
    }
}
