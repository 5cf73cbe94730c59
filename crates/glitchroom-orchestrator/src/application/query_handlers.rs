//! Query handlers for a game session.
//!
//! Views are projections of the session after due timers have fired; they
//! never change phase on their own.

use glitchroom_core::clock::Clock;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::fire_due_timers;
use crate::application::session::GameSession;
use crate::domain::events::GameEvent;
use crate::domain::messages::MessageView;
use crate::domain::phase::TransitionState;
use crate::domain::script::SummaryEntry;

/// Where a module stands in the player's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// The module has been completed.
    Completed,
    /// The current phase belongs to this module.
    Active,
    /// Not reached yet.
    Locked,
}

/// Progress entry for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleProgress {
    /// Module position.
    pub index: usize,
    /// Module title.
    pub title: String,
    /// Status.
    pub status: ModuleStatus,
}

/// Progress across all modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    /// Number of completed modules.
    pub completed: usize,
    /// Number of modules in the script.
    pub total: usize,
    /// One entry per module, in order.
    pub modules: Vec<ModuleProgress>,
}

/// The module currently accepting input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveModuleView {
    /// Module position.
    pub index: usize,
    /// Module title.
    pub title: String,
    /// Challenge key.
    pub challenge: String,
    /// Challenge-rendered state.
    pub state: serde_json::Value,
}

/// Read-only view of a game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Script title.
    pub title: String,
    /// Hash of the script the game runs.
    pub version_hash: String,
    /// Current phase.
    pub phase: TransitionState,
    /// Whether a skip would be honoured.
    pub skippable: bool,
    /// Displayed messages, oldest first.
    pub messages: Vec<MessageView>,
    /// Module progress.
    pub progress: ProgressView,
    /// Present while a module is active.
    pub active_module: Option<ActiveModuleView>,
    /// Present once every module is done.
    pub summary: Option<Vec<SummaryEntry>>,
}

/// Projects the session as it stands, without touching the clock.
#[must_use]
pub fn build_view(session: &GameSession) -> GameView {
    let controller = &session.controller;
    let script = controller.script();
    let phase = controller.current_phase();

    let modules = script
        .modules
        .iter()
        .map(|module| {
            let status = if controller.is_completed(module.index) {
                ModuleStatus::Completed
            } else if phase.module_index() == Some(module.index) {
                ModuleStatus::Active
            } else {
                ModuleStatus::Locked
            };
            ModuleProgress {
                index: module.index,
                title: module.title.clone(),
                status,
            }
        })
        .collect();

    let active_module = match phase {
        TransitionState::ModuleActive(index) => {
            script.module(index).and_then(|module| {
                session.host.view(index).map(|state| ActiveModuleView {
                    index,
                    title: module.title.clone(),
                    challenge: module.challenge.clone(),
                    state,
                })
            })
        }
        _ => None,
    };

    GameView {
        game_id: session.id,
        title: script.title.clone(),
        version_hash: script.version_hash.clone(),
        phase,
        skippable: controller.is_skippable(),
        messages: controller.visible_messages(),
        progress: ProgressView {
            completed: controller.completed().len(),
            total: script.module_count(),
            modules,
        },
        active_module,
        summary: (phase == TransitionState::AllDone).then(|| script.summary.clone()),
    }
}

/// Fires due timers, then returns the game's view.
pub fn get_game_view(session: &mut GameSession, clock: &dyn Clock) -> GameView {
    fire_due_timers(session, clock);
    build_view(session)
}

/// Fires due timers, then returns journal entries with a sequence number
/// above `after`.
pub fn get_game_events(
    session: &mut GameSession,
    clock: &dyn Clock,
    after: Option<u64>,
) -> Vec<GameEvent> {
    fire_due_timers(session, clock);
    let after = after.unwrap_or(0);
    session
        .controller
        .events()
        .iter()
        .filter(|event| event.metadata.sequence_number > after)
        .cloned()
        .collect()
}
