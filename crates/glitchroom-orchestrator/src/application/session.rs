//! A single game: its controller and the challenges it hosts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use glitchroom_core::error::GameError;
use uuid::Uuid;

use crate::application::module_host::{ChallengeFactory, ModuleHost};
use crate::domain::controller::TransitionController;
use crate::domain::script::GameScript;

/// One player's game.
#[derive(Debug)]
pub struct GameSession {
    /// Game identifier.
    pub id: Uuid,
    /// The phase state machine.
    pub controller: TransitionController,
    /// The module challenges.
    pub host: ModuleHost,
}

impl GameSession {
    /// Creates an idle game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Content` if the script names an unknown challenge.
    pub fn new(
        id: Uuid,
        script: Arc<GameScript>,
        factory: ChallengeFactory,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        let host = ModuleHost::build(&script, factory)?;
        Ok(Self {
            id,
            controller: TransitionController::new(script, now),
            host,
        })
    }
}
