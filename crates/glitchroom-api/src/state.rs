//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use glitchroom_core::clock::{Clock, deadline_after};
use glitchroom_core::error::GameError;
use glitchroom_orchestrator::application::command_handlers::fire_due_timers;
use glitchroom_orchestrator::application::module_host::ChallengeFactory;
use glitchroom_orchestrator::application::session::GameSession;
use glitchroom_orchestrator::domain::script::GameScript;
use tracing::info;
use uuid::Uuid;

/// How long a game may go without a request before it is evicted.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// A hosted game and the last time a request touched it.
struct Entry {
    session: GameSession,
    last_active: DateTime<Utc>,
}

type Games = HashMap<Uuid, Entry>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for every game.
    pub clock: Arc<dyn Clock>,
    /// The script new games are built from.
    pub script: Arc<GameScript>,
    /// Resolves module challenge keys.
    pub factory: ChallengeFactory,
    idle_ttl: Duration,
    games: Arc<Mutex<Games>>,
}

impl AppState {
    /// Create new application state with no games.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, script: Arc<GameScript>, factory: ChallengeFactory) -> Self {
        Self {
            clock,
            script,
            factory,
            idle_ttl: DEFAULT_IDLE_TTL,
            games: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Sets how long an untouched game is kept before the ticker evicts it.
    #[must_use]
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Games>, GameError> {
        self.games
            .lock()
            .map_err(|e| GameError::Infrastructure(format!("game registry lock poisoned: {e}")))
    }

    /// Creates an idle game and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Content` if the script names an unknown challenge
    /// and `GameError::Infrastructure` if the registry lock is poisoned.
    pub fn create_game(&self) -> Result<Uuid, GameError> {
        let id = Uuid::new_v4();
        let now = self.clock.now();
        let session = GameSession::new(id, Arc::clone(&self.script), self.factory, now)?;
        self.lock()?.insert(
            id,
            Entry {
                session,
                last_active: now,
            },
        );
        info!(game_id = %id, "game created");
        Ok(id)
    }

    /// Runs `f` against one game while holding the registry lock. Counts as
    /// activity for idle eviction.
    ///
    /// # Errors
    ///
    /// Returns `GameError::GameNotFound` for an unknown id,
    /// `GameError::Infrastructure` if the lock is poisoned, or whatever `f`
    /// returns.
    pub fn with_game<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut games = self.lock()?;
        let entry = games.get_mut(&id).ok_or(GameError::GameNotFound(id))?;
        entry.last_active = self.clock.now();
        f(&mut entry.session)
    }

    /// Drops a game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::GameNotFound` for an unknown id and
    /// `GameError::Infrastructure` if the lock is poisoned.
    pub fn remove_game(&self, id: Uuid) -> Result<(), GameError> {
        if self.lock()?.remove(&id).is_none() {
            return Err(GameError::GameNotFound(id));
        }
        info!(game_id = %id, "game removed");
        Ok(())
    }

    /// Evicts games idle for longer than the idle TTL, then fires due
    /// timers in the rest. Returns how many timers fired.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if the lock is poisoned.
    pub fn tick_all(&self) -> Result<usize, GameError> {
        let now = self.clock.now();
        let mut games = self.lock()?;
        let before = games.len();
        games.retain(|_, entry| deadline_after(entry.last_active, self.idle_ttl) > now);
        let evicted = before - games.len();
        if evicted > 0 {
            info!(evicted, remaining = games.len(), "evicted idle games");
        }
        Ok(games
            .values_mut()
            .map(|entry| fire_due_timers(&mut entry.session, self.clock.as_ref()))
            .sum())
    }

    /// Number of live games.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if the lock is poisoned.
    pub fn game_count(&self) -> Result<usize, GameError> {
        Ok(self.lock()?.len())
    }
}
