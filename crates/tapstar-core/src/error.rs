//! Error Types

use thiserror::Error;

/// Result type alias for game operations
pub type Result<T> = std::result::Result<T, GameError>;

/// Game error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Operation called in a phase that does not allow it (e.g. tapping with no credits).
    /// Logged and ignored, never shown to the player.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GameError {
    /// Whether the presentation layer should show this error to the player
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, GameError::PreconditionViolation(_))
    }
}
