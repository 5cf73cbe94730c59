//! Script loading errors.

use glitchroom_core::error::GameError;

/// Errors raised while loading a game script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The document is not valid YAML or does not match the schema.
    #[error("script parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The script file could not be read.
    #[error("script read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value the game cannot run with.
    #[error("invalid script: {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl ScriptError {
    pub(crate) fn invalid(field: impl Into<String>, reason: &'static str) -> Self {
        Self::Invalid {
            field: field.into(),
            reason,
        }
    }
}

impl From<ScriptError> for GameError {
    fn from(err: ScriptError) -> Self {
        GameError::Content(err.to_string())
    }
}
