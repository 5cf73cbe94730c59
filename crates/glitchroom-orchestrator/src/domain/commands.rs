//! Commands accepted by a game.

use glitchroom_core::command::Command;
use uuid::Uuid;

use super::phase::TransitionState;

/// Command to start a game from `Idle`.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game to start.
    pub game_id: Uuid,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "orchestrator.start_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to cut the current wait short.
#[derive(Debug, Clone)]
pub struct SkipWait {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game to advance.
    pub game_id: Uuid,
    /// The phase the caller saw; when set and no longer current, the skip
    /// is ignored.
    pub expected_phase: Option<TransitionState>,
}

impl Command for SkipWait {
    fn command_type(&self) -> &'static str {
        "orchestrator.skip_wait"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to deliver a user action to a module's challenge.
#[derive(Debug, Clone)]
pub struct SubmitInput {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game the module belongs to.
    pub game_id: Uuid,
    /// The module the input is meant for.
    pub module: usize,
    /// Challenge-specific action payload.
    pub input: serde_json::Value,
}

impl Command for SubmitInput {
    fn command_type(&self) -> &'static str {
        "orchestrator.submit_input"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
