//! Errors raised by the state container.

/// Errors that can occur while reading or writing game state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("unknown nakshatra: {0}")]
    UnknownNakshatra(String),

    #[error("value for '{key}' must be {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("save data could not be processed: {0}")]
    Serialization(#[from] serde_json::Error),
}
