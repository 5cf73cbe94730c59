//! Domain error types.
//!
//! Phase-protocol misuse (skipping a non-skippable phase, reporting a
//! completion twice) is never an error: those calls are inert. This type
//! covers lookups, input decoding and script loading.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum GameError {
    /// No game exists with the given identifier.
    #[error("game not found: {0}")]
    GameNotFound(Uuid),

    /// The script has no module at the given index.
    #[error("module not found: {0}")]
    ModuleNotFound(usize),

    /// Input that a challenge module could not decode or accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A game script that failed to parse or validate.
    #[error("content error: {0}")]
    Content(String),

    /// An infrastructure error (poisoned lock, serialization failure).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
