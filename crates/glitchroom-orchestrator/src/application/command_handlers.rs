//! Command handlers for a game session.
//!
//! Every handler first fires the timers that fell due since the session was
//! last touched, then applies the command at the current instant.

use glitchroom_core::clock::Clock;
use glitchroom_core::command::Command;
use glitchroom_core::error::GameError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::session::GameSession;
use crate::domain::commands::{SkipWait, StartGame, SubmitInput};
use crate::domain::events::GameEvent;

/// Result of a handled command.
#[derive(Debug)]
pub struct GameCommandResult {
    /// The game the command was applied to.
    pub game_id: Uuid,
    /// Whether the command changed anything; inert commands are `false`.
    pub accepted: bool,
    /// Journal entries produced while handling, timer fires included.
    pub events: Vec<GameEvent>,
}

/// Fires every timer due at the clock's current time. Returns how many
/// fired.
pub fn fire_due_timers(session: &mut GameSession, clock: &dyn Clock) -> usize {
    let fired = session.controller.advance_to(clock.now());
    if fired > 0 {
        debug!(game_id = %session.id, fired, "due timers fired");
    }
    fired
}

fn ensure_target(session: &GameSession, game_id: Uuid) -> Result<(), GameError> {
    if session.id == game_id {
        Ok(())
    } else {
        Err(GameError::GameNotFound(game_id))
    }
}

fn run(
    session: &mut GameSession,
    clock: &dyn Clock,
    command: &dyn Command,
    apply: impl FnOnce(&mut GameSession) -> Result<bool, GameError>,
) -> Result<GameCommandResult, GameError> {
    let journal_start = session.controller.events().len();
    fire_due_timers(session, clock);

    let accepted = apply(session)?;
    info!(
        game_id = %session.id,
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        accepted,
        phase = session.controller.current_phase().name(),
        "command handled"
    );

    Ok(GameCommandResult {
        game_id: session.id,
        accepted,
        events: session.controller.events()[journal_start..].to_vec(),
    })
}

/// Handles `StartGame`.
///
/// # Errors
///
/// Returns `GameError::GameNotFound` if the command targets another game.
pub fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    session: &mut GameSession,
) -> Result<GameCommandResult, GameError> {
    ensure_target(session, command.game_id)?;
    run(session, clock, command, |session| {
        Ok(session.controller.start())
    })
}

/// Handles `SkipWait`. A skip whose `expected_phase` no longer matches the
/// current phase is ignored.
///
/// # Errors
///
/// Returns `GameError::GameNotFound` if the command targets another game.
pub fn handle_skip_wait(
    command: &SkipWait,
    clock: &dyn Clock,
    session: &mut GameSession,
) -> Result<GameCommandResult, GameError> {
    ensure_target(session, command.game_id)?;
    run(session, clock, command, |session| {
        let current = session.controller.current_phase();
        if let Some(expected) = command.expected_phase
            && expected != current
        {
            debug!(
                expected = expected.name(),
                current = current.name(),
                "skip ignored for stale phase"
            );
            return Ok(false);
        }
        Ok(session.controller.skip())
    })
}

/// Handles `SubmitInput`.
///
/// # Errors
///
/// Returns `GameError::GameNotFound` if the command targets another game,
/// `GameError::ModuleNotFound` for an unknown module and
/// `GameError::InvalidInput` if the challenge rejects the input.
pub fn handle_submit_input(
    command: &SubmitInput,
    clock: &dyn Clock,
    session: &mut GameSession,
) -> Result<GameCommandResult, GameError> {
    ensure_target(session, command.game_id)?;
    run(session, clock, command, |session| {
        session
            .host
            .submit(&mut session.controller, command.module, command.input.clone())
    })
}
