//! Challenge doubles: a trivially solvable `Challenge` and a context that
//! records what a challenge asked of it.

use std::time::Duration;

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ScriptedInput {
    Say { text: String },
    Solve,
}

/// A challenge that completes on `{"action": "solve"}` and echoes
/// `{"action": "say", "text": ...}` as a message.
#[derive(Debug, Default)]
pub struct ScriptedChallenge {
    inputs: usize,
}

impl ScriptedChallenge {
    /// Creates a fresh scripted challenge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Challenge for ScriptedChallenge {
    fn kind(&self) -> &'static str {
        "scripted"
    }

    fn view(&self) -> serde_json::Value {
        serde_json::json!({ "inputs": self.inputs })
    }

    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError> {
        let input: ScriptedInput =
            serde_json::from_value(input).map_err(|e| GameError::InvalidInput(e.to_string()))?;
        self.inputs += 1;
        match input {
            ScriptedInput::Say { text } => ctx.say(&text),
            ScriptedInput::Solve => ctx.report_completion(),
        }
        Ok(())
    }
}

/// A `ChallengeContext` that records posted messages and completion reports.
#[derive(Debug)]
pub struct RecordingContext {
    /// Messages in the order they were posted, with their decay.
    pub messages: Vec<(String, Duration)>,
    /// How many times `report_completion` was called.
    pub completions: usize,
    ttl: Duration,
}

impl RecordingContext {
    /// Creates an empty recorder with a five second default decay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            completions: 0,
            ttl: Duration::from_secs(5),
        }
    }

    /// Returns the most recently posted message text.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(|(text, _)| text.as_str())
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeContext for RecordingContext {
    fn post_message(&mut self, text: &str, ttl: Duration) {
        self.messages.push((text.to_owned(), ttl));
    }

    fn default_ttl(&self) -> Duration {
        self.ttl
    }

    fn report_completion(&mut self) {
        self.completions += 1;
    }
}
