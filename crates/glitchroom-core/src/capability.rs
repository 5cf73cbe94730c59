//! The contract a challenge module satisfies to be hosted by a game.
//!
//! A challenge owns its question/answer state and grading logic. The host
//! hands it a [`ChallengeContext`] on every input; the challenge talks back
//! only through that context.

use std::time::Duration;

use crate::error::GameError;

/// Callbacks a challenge may invoke while handling input.
pub trait ChallengeContext {
    /// Posts a narrative message that decays after `ttl`.
    fn post_message(&mut self, text: &str, ttl: Duration);

    /// The decay used for ordinary in-module messages.
    fn default_ttl(&self) -> Duration;

    /// Signals that the user met the challenge's success criterion.
    ///
    /// Calling this more than once is harmless.
    fn report_completion(&mut self);

    /// Posts a message with the default decay.
    fn say(&mut self, text: &str) {
        let ttl = self.default_ttl();
        self.post_message(text, ttl);
    }
}

/// A self-contained challenge module.
pub trait Challenge: Send + std::fmt::Debug {
    /// The script key this challenge is registered under.
    fn kind(&self) -> &'static str;

    /// Renders the current challenge state for the presentation layer.
    fn view(&self) -> serde_json::Value;

    /// Applies one user action.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidInput` if `input` does not decode into an
    /// action this challenge understands or names an unknown option.
    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError>;
}
