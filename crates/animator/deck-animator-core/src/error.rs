//! Error types for animator construction.

use thiserror::Error;

/// Raised when an animator cannot be built from its actions. Fatal for the
/// slide concerned; hosts treat it as "no animator".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("animator requires at least one action")]
    Empty,
    #[error("duplicate action id '{id}'")]
    DuplicateActionId { id: String },
    #[error("action '{id}': invalid translation '{value}'")]
    InvalidTranslation { id: String, value: String },
    #[error("animator descriptor: {reason}")]
    Descriptor { reason: String },
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Descriptor {
            reason: err.to_string(),
        }
    }
}
