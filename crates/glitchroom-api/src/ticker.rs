//! Background task that fires due timers without waiting for a request.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::state::AppState;

/// Spawns a task that fires due timers in every game once per `period`.
pub fn spawn(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match state.tick_all() {
                Ok(0) => {}
                Ok(fired) => debug!(fired, "background tick fired timers"),
                Err(e) => {
                    error!(error = %e, "background tick failed; stopping ticker");
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glitchroom_core::capability::Challenge;
    use glitchroom_core::clock::Clock;
    use glitchroom_orchestrator::domain::phase::TransitionState;
    use glitchroom_test_support::{ManualClock, ScriptedChallenge};

    use super::*;

    fn scripted(_kind: &str) -> Option<Box<dyn Challenge>> {
        Some(Box::new(ScriptedChallenge::new()))
    }

    #[tokio::test]
    async fn test_ticker_advances_games_without_requests() {
        // Arrange
        let clock = Arc::new(ManualClock::default());
        let script = Arc::new(glitchroom_content::default_script().unwrap());
        let shared: Arc<dyn Clock> = clock.clone();
        let state = AppState::new(shared, script, scripted);
        let id = state.create_game().unwrap();
        state
            .with_game(id, |session| Ok(session.controller.start()))
            .unwrap();
        clock.advance(Duration::from_secs(30));

        // Act
        let handle = spawn(state.clone(), Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        // Assert
        let phase = state
            .with_game(id, |session| Ok(session.controller.current_phase()))
            .unwrap();
        assert_eq!(phase, TransitionState::IntroducingModule(0));
    }
}
