//! Glitchroom — diagnostic challenge modules.
//!
//! Each module owns its questions, the player's answers and the grading
//! rule. Input arrives as JSON tagged by `action`; views are rendered back to
//! JSON for the presentation layer.

pub mod ai_basics;
pub mod ethics;
pub mod patterns;
pub mod privacy;
pub mod prompting;

use glitchroom_core::capability::Challenge;
use glitchroom_core::error::GameError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Script keys of every bundled challenge.
pub const KINDS: [&str; 5] = [
    ai_basics::KIND,
    prompting::KIND,
    privacy::KIND,
    patterns::KIND,
    ethics::KIND,
];

/// Builds a fresh challenge for a script key.
#[must_use]
pub fn build(kind: &str) -> Option<Box<dyn Challenge>> {
    let challenge: Box<dyn Challenge> = match kind {
        ai_basics::KIND => Box::new(ai_basics::AiBasicsQuiz::new()),
        prompting::KIND => Box::new(prompting::PromptingChallenge::new()),
        privacy::KIND => Box::new(privacy::PrivacyPuzzle::new()),
        patterns::KIND => Box::new(patterns::PatternStudy::new()),
        ethics::KIND => Box::new(ethics::EthicsEvaluation::new()),
        _ => return None,
    };
    Some(challenge)
}

pub(crate) fn decode<T: DeserializeOwned>(input: serde_json::Value) -> Result<T, GameError> {
    serde_json::from_value(input).map_err(|e| GameError::InvalidInput(e.to_string()))
}

pub(crate) fn render<T: Serialize>(view: &T) -> serde_json::Value {
    serde_json::to_value(view).unwrap_or(serde_json::Value::Null)
}

pub(crate) fn rejected(reason: impl Into<String>) -> GameError {
    GameError::InvalidInput(reason.into())
}
