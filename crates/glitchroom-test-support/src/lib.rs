//! Shared test doubles and utilities for the Glitchroom diagnostic quiz.

mod challenge;
mod clock;

pub use challenge::{RecordingContext, ScriptedChallenge};
pub use clock::{ManualClock, test_epoch};
