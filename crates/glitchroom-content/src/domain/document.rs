//! The on-disk shape of a game script.

use std::time::Duration;

use glitchroom_orchestrator::domain::script::{
    GameScript, ModuleDescriptor, SummaryEntry, Timings,
};
use serde::Deserialize;

use super::error::ScriptError;

/// Top-level script document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptDocument {
    /// Display title of the game.
    pub title: String,
    /// Message shown while the game welcomes the player.
    pub welcome: String,
    /// Waits and decays; omitted fields take the defaults.
    #[serde(default)]
    pub timings: TimingsDocument,
    /// Modules in play order.
    pub modules: Vec<ModuleDocument>,
    /// Entries shown once the game is over.
    #[serde(default)]
    pub summary: Vec<SummaryDocument>,
}

/// Durations in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingsDocument {
    /// How long the welcome message holds before the first intro.
    pub welcome_wait_ms: u64,
    /// How long a module intro holds before the module opens.
    pub intro_wait_ms: u64,
    /// How long a completion message holds before the next intro.
    pub completion_wait_ms: u64,
    /// Default decay for messages posted by challenges.
    pub message_ttl_ms: u64,
    /// Delay between a challenge succeeding and the module completing.
    pub completion_grace_ms: u64,
}

impl Default for TimingsDocument {
    fn default() -> Self {
        let defaults = Timings::default();
        Self {
            welcome_wait_ms: millis(defaults.welcome_wait),
            intro_wait_ms: millis(defaults.intro_wait),
            completion_wait_ms: millis(defaults.completion_wait),
            message_ttl_ms: millis(defaults.message_ttl),
            completion_grace_ms: millis(defaults.completion_grace),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// One module entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDocument {
    /// Title shown in the progress list.
    pub title: String,
    /// Message shown before the module opens.
    pub intro: String,
    /// Message shown once the module is complete.
    pub completion: String,
    /// Challenge key, resolved when a game is built.
    pub challenge: String,
}

/// One summary entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryDocument {
    /// Short heading.
    pub title: String,
    /// What the player learned.
    pub description: String,
}

fn require_text(field: impl Into<String>, value: &str) -> Result<String, ScriptError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScriptError::invalid(field, "must not be blank"));
    }
    Ok(trimmed.to_owned())
}

fn require_wait(field: &str, ms: u64) -> Result<Duration, ScriptError> {
    if ms == 0 {
        return Err(ScriptError::invalid(field, "must be greater than zero"));
    }
    Ok(Duration::from_millis(ms))
}

impl TimingsDocument {
    /// Converts to runtime timings. The three phase waits and the message
    /// decay must be positive; the completion grace may be zero.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::Invalid` naming the first zero wait.
    pub fn into_timings(self) -> Result<Timings, ScriptError> {
        Ok(Timings {
            welcome_wait: require_wait("timings.welcome_wait_ms", self.welcome_wait_ms)?,
            intro_wait: require_wait("timings.intro_wait_ms", self.intro_wait_ms)?,
            completion_wait: require_wait("timings.completion_wait_ms", self.completion_wait_ms)?,
            message_ttl: require_wait("timings.message_ttl_ms", self.message_ttl_ms)?,
            completion_grace: Duration::from_millis(self.completion_grace_ms),
        })
    }
}

impl ScriptDocument {
    /// Validates the document and builds the runtime script.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::Invalid` for an empty module list, blank texts
    /// or zero waits.
    pub fn into_script(self, version_hash: String) -> Result<GameScript, ScriptError> {
        let title = require_text("title", &self.title)?;
        let welcome_text = require_text("welcome", &self.welcome)?;
        let timings = self.timings.into_timings()?;

        if self.modules.is_empty() {
            return Err(ScriptError::invalid("modules", "must list at least one module"));
        }
        let modules = self
            .modules
            .into_iter()
            .enumerate()
            .map(|(index, module)| {
                Ok(ModuleDescriptor {
                    index,
                    title: require_text(format!("modules[{index}].title"), &module.title)?,
                    intro_text: require_text(format!("modules[{index}].intro"), &module.intro)?,
                    completion_text: require_text(
                        format!("modules[{index}].completion"),
                        &module.completion,
                    )?,
                    challenge: require_text(
                        format!("modules[{index}].challenge"),
                        &module.challenge,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;

        let summary = self
            .summary
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Ok(SummaryEntry {
                    title: require_text(format!("summary[{index}].title"), &entry.title)?,
                    description: require_text(
                        format!("summary[{index}].description"),
                        &entry.description,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;

        Ok(GameScript {
            title,
            welcome_text,
            timings,
            modules,
            summary,
            version_hash,
        })
    }
}
