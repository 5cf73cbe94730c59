//! The macro-phases a game moves through.

use serde::{Deserialize, Serialize};

/// The phase a game is in. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", content = "module", rename_all = "snake_case")]
pub enum TransitionState {
    /// The game has not been started.
    Idle,
    /// The welcome message is showing.
    Welcoming,
    /// The intro of the given module is showing.
    IntroducingModule(usize),
    /// The given module is accepting input.
    ModuleActive(usize),
    /// The completion message of the given module is showing.
    Completing(usize),
    /// Every module is complete.
    AllDone,
}

impl TransitionState {
    /// Whether the user may cut the current wait short.
    #[must_use]
    pub fn is_skippable(self) -> bool {
        matches!(
            self,
            Self::Welcoming | Self::IntroducingModule(_) | Self::Completing(_)
        )
    }

    /// The module this phase belongs to, if any.
    #[must_use]
    pub fn module_index(self) -> Option<usize> {
        match self {
            Self::IntroducingModule(index) | Self::ModuleActive(index) | Self::Completing(index) => {
                Some(index)
            }
            Self::Idle | Self::Welcoming | Self::AllDone => None,
        }
    }

    /// Returns the snake-case phase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Welcoming => "welcoming",
            Self::IntroducingModule(_) => "introducing_module",
            Self::ModuleActive(_) => "module_active",
            Self::Completing(_) => "completing",
            Self::AllDone => "all_done",
        }
    }
}

/// What caused a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// The game was started.
    Started,
    /// The user skipped the wait.
    Skipped,
    /// The follow-up timer fired.
    Elapsed,
    /// The active module reported completion.
    ModuleCompleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skippable_phases() {
        assert!(TransitionState::Welcoming.is_skippable());
        assert!(TransitionState::IntroducingModule(2).is_skippable());
        assert!(TransitionState::Completing(0).is_skippable());

        assert!(!TransitionState::Idle.is_skippable());
        assert!(!TransitionState::ModuleActive(0).is_skippable());
        assert!(!TransitionState::AllDone.is_skippable());
    }

    #[test]
    fn test_serializes_as_tagged_phase() {
        let json = serde_json::to_value(TransitionState::ModuleActive(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "phase": "module_active", "module": 3 }));

        let json = serde_json::to_value(TransitionState::Welcoming).unwrap();
        assert_eq!(json, serde_json::json!({ "phase": "welcoming" }));
    }

    #[test]
    fn test_deserializes_expected_phase() {
        let phase: TransitionState =
            serde_json::from_value(serde_json::json!({ "phase": "completing", "module": 1 }))
                .unwrap();
        assert_eq!(phase, TransitionState::Completing(1));
    }
}
