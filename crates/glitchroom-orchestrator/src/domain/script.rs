//! The static game script: narrative texts, timings and module order.

use std::time::Duration;

use serde::Serialize;

/// Wait and decay durations used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long the welcome message holds before the first intro.
    pub welcome_wait: Duration,
    /// How long a module intro holds before the module activates.
    pub intro_wait: Duration,
    /// How long a completion message holds before the next module.
    pub completion_wait: Duration,
    /// Decay of messages posted by modules.
    pub message_ttl: Duration,
    /// Delay between a module's success and its completion report.
    pub completion_grace: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            welcome_wait: Duration::from_secs(30),
            intro_wait: Duration::from_secs(20),
            completion_wait: Duration::from_secs(15),
            message_ttl: Duration::from_secs(5),
            completion_grace: Duration::from_secs(2),
        }
    }
}

/// One module of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Position in the module order.
    pub index: usize,
    /// Display title.
    pub title: String,
    /// Message shown while the module is introduced.
    pub intro_text: String,
    /// Message shown once the module is complete.
    pub completion_text: String,
    /// Key of the challenge that runs this module.
    pub challenge: String,
}

/// One "what you've learned" entry shown when the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    /// Short heading.
    pub title: String,
    /// One or two sentences.
    pub description: String,
}

/// A validated game script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScript {
    /// Game title.
    pub title: String,
    /// Message shown when the game starts.
    pub welcome_text: String,
    /// Wait and decay durations.
    pub timings: Timings,
    /// Modules in play order; `modules[i].index == i`.
    pub modules: Vec<ModuleDescriptor>,
    /// End-of-game summary.
    pub summary: Vec<SummaryEntry>,
    /// SHA-256 of the script source, hex encoded.
    pub version_hash: String,
}

impl GameScript {
    /// Looks up a module by index.
    #[must_use]
    pub fn module(&self, index: usize) -> Option<&ModuleDescriptor> {
        self.modules.get(index)
    }

    /// Number of modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
