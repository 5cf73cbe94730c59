//! Module host: routes user input to the active challenge and relays the
//! challenge's callbacks to the controller.

use std::time::Duration;

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use tracing::debug;

use crate::domain::controller::TransitionController;
use crate::domain::phase::TransitionState;
use crate::domain::script::GameScript;

/// Builds the challenge registered under a script key.
pub type ChallengeFactory = fn(&str) -> Option<Box<dyn Challenge>>;

/// The challenges of one game, one per module.
#[derive(Debug)]
pub struct ModuleHost {
    challenges: Vec<Box<dyn Challenge>>,
}

impl ModuleHost {
    /// Instantiates the challenge of every module in `script`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Content` if a module names a challenge the
    /// factory does not know.
    pub fn build(script: &GameScript, factory: ChallengeFactory) -> Result<Self, GameError> {
        let challenges = script
            .modules
            .iter()
            .map(|module| {
                factory(&module.challenge).ok_or_else(|| {
                    GameError::Content(format!(
                        "module {} uses unknown challenge '{}'",
                        module.index, module.challenge
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { challenges })
    }

    /// Renders a module's challenge.
    #[must_use]
    pub fn view(&self, module: usize) -> Option<serde_json::Value> {
        self.challenges.get(module).map(|challenge| challenge.view())
    }

    /// Delivers `input` to `module`'s challenge. Input for a module that is
    /// not active is ignored and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ModuleNotFound` for an index outside the script and
    /// `GameError::InvalidInput` if the challenge rejects the input.
    pub fn submit(
        &mut self,
        controller: &mut TransitionController,
        module: usize,
        input: serde_json::Value,
    ) -> Result<bool, GameError> {
        let challenge = self
            .challenges
            .get_mut(module)
            .ok_or(GameError::ModuleNotFound(module))?;
        if controller.current_phase() != TransitionState::ModuleActive(module) {
            debug!(
                module,
                phase = controller.current_phase().name(),
                "input ignored for inactive module"
            );
            return Ok(false);
        }

        let mut ctx = HostContext { controller, module };
        challenge.handle(input, &mut ctx)?;
        Ok(true)
    }
}

/// The context a challenge sees while its module is active.
struct HostContext<'a> {
    controller: &'a mut TransitionController,
    module: usize,
}

impl ChallengeContext for HostContext<'_> {
    fn post_message(&mut self, text: &str, ttl: Duration) {
        self.controller.post_message(text, ttl);
    }

    fn default_ttl(&self) -> Duration {
        self.controller.script().timings.message_ttl
    }

    fn report_completion(&mut self) {
        let grace = self.controller.script().timings.completion_grace;
        self.controller.schedule_completion(self.module, grace);
    }
}
