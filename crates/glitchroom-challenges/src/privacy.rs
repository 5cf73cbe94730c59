//! Data privacy puzzle: find ten data points, then sort them into private and
//! public.

use std::collections::{BTreeMap, BTreeSet};

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{decode, rejected, render};

/// Script key.
pub const KIND: &str = "privacy";

const ALL_FOUND: &str = "All data points found! Now categorize them by privacy level.";
const SORTED: &str = "Perfect! You understand data privacy principles.";
const MISSORTED: &str = "Some data points are incorrectly categorized. Think about what information could be misused if exposed!";

struct Clue {
    id: u8,
    label: &'static str,
    location: &'static str,
    private: bool,
}

static CLUES: [Clue; 10] = [
    Clue { id: 1, label: "Email Address", location: "Behind the digital display panel", private: false },
    Clue { id: 2, label: "Password", location: "Under the conference table scanner", private: true },
    Clue { id: 3, label: "Home Address", location: "Inside the AI processing unit", private: true },
    Clue { id: 4, label: "Age", location: "Within the security lockbox", private: false },
    Clue { id: 5, label: "Credit Card Number", location: "Hidden in the data storage compartment", private: true },
    Clue { id: 6, label: "Name", location: "Embedded in the wall interface", private: false },
    Clue { id: 7, label: "Medical Records", location: "Concealed in the smart device hub", private: true },
    Clue { id: 8, label: "Personal Phone Number", location: "Tucked behind the holographic projector", private: true },
    Clue { id: 9, label: "Music Preferences", location: "Inside the biometric reader", private: false },
    Clue { id: 10, label: "Job Title", location: "Within the network access point", private: false },
];

fn clue(id: u8) -> Result<&'static Clue, GameError> {
    CLUES
        .iter()
        .find(|clue| clue.id == id)
        .ok_or_else(|| rejected(format!("unknown clue {id}")))
}

/// Puzzle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Clues are being revealed.
    Hunt,
    /// Clues are being classified.
    Sort,
    /// Every clue is correctly classified.
    Complete,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum PrivacyInput {
    Reveal { clue: u8 },
    Classify { clue: u8, private: bool },
    Verify,
}

#[derive(Debug, Serialize)]
struct ClueView {
    id: u8,
    location: &'static str,
    label: Option<&'static str>,
    placement: Option<&'static str>,
    locked: bool,
}

#[derive(Debug, Serialize)]
struct PrivacyView {
    stage: Stage,
    found: usize,
    total: usize,
    clues: Vec<ClueView>,
}

/// The puzzle state.
#[derive(Debug)]
pub struct PrivacyPuzzle {
    stage: Stage,
    found: BTreeSet<u8>,
    /// Clue id to "is private" placement.
    placements: BTreeMap<u8, bool>,
    locked: BTreeSet<u8>,
}

impl PrivacyPuzzle {
    /// A puzzle with every clue still hidden.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::Hunt,
            found: BTreeSet::new(),
            placements: BTreeMap::new(),
            locked: BTreeSet::new(),
        }
    }

    fn reveal(&mut self, id: u8, ctx: &mut dyn ChallengeContext) -> Result<(), GameError> {
        if self.stage != Stage::Hunt {
            return Err(rejected("every clue is already revealed"));
        }
        let clue = clue(id)?;
        if !self.found.insert(id) {
            return Ok(());
        }
        ctx.say(&format!("Data point discovered: {}", clue.label));
        if self.found.len() == CLUES.len() {
            self.stage = Stage::Sort;
            ctx.say(ALL_FOUND);
        }
        Ok(())
    }

    /// Toggles a placement. A correct placement locks the clue.
    fn classify(&mut self, id: u8, private: bool) -> Result<(), GameError> {
        if self.stage != Stage::Sort {
            return Err(rejected("clues can only be classified once all are found"));
        }
        let clue = clue(id)?;
        if self.locked.contains(&id) {
            return Ok(());
        }
        if self.placements.get(&id) == Some(&private) {
            self.placements.remove(&id);
            return Ok(());
        }
        self.placements.insert(id, private);
        if clue.private == private {
            self.locked.insert(id);
        }
        Ok(())
    }

    fn verify(&mut self, ctx: &mut dyn ChallengeContext) -> Result<(), GameError> {
        if self.stage != Stage::Sort {
            return Err(rejected("nothing to verify yet"));
        }
        let all_correct = CLUES
            .iter()
            .all(|clue| self.placements.get(&clue.id) == Some(&clue.private));
        debug!(sorted = self.placements.len(), all_correct, "privacy sort verified");
        if all_correct {
            self.stage = Stage::Complete;
            ctx.say(SORTED);
            ctx.report_completion();
        } else {
            ctx.say(MISSORTED);
        }
        Ok(())
    }
}

impl Default for PrivacyPuzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Challenge for PrivacyPuzzle {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn view(&self) -> serde_json::Value {
        render(&PrivacyView {
            stage: self.stage,
            found: self.found.len(),
            total: CLUES.len(),
            clues: CLUES
                .iter()
                .map(|clue| ClueView {
                    id: clue.id,
                    location: clue.location,
                    label: self.found.contains(&clue.id).then_some(clue.label),
                    placement: self
                        .placements
                        .get(&clue.id)
                        .map(|&private| if private { "private" } else { "public" }),
                    locked: self.locked.contains(&clue.id),
                })
                .collect(),
        })
    }

    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError> {
        match decode(input)? {
            PrivacyInput::Reveal { clue } => self.reveal(clue, ctx),
            PrivacyInput::Classify { clue, private } => self.classify(clue, private),
            PrivacyInput::Verify => self.verify(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use glitchroom_test_support::RecordingContext;
    use serde_json::json;

    use super::*;

    fn act(puzzle: &mut PrivacyPuzzle, ctx: &mut RecordingContext, input: serde_json::Value) {
        puzzle.handle(input, ctx).unwrap();
    }

    fn reveal_all(puzzle: &mut PrivacyPuzzle, ctx: &mut RecordingContext) {
        for clue in &CLUES {
            act(puzzle, ctx, json!({ "action": "reveal", "clue": clue.id }));
        }
    }

    #[test]
    fn test_revealing_every_clue_enters_sort_stage() {
        // Arrange
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();

        // Act
        reveal_all(&mut puzzle, &mut ctx);

        // Assert
        assert_eq!(puzzle.stage, Stage::Sort);
        assert_eq!(ctx.messages[0].0, "Data point discovered: Email Address");
        assert_eq!(ctx.messages.len(), 11);
        assert_eq!(ctx.last_message(), Some(ALL_FOUND));
    }

    #[test]
    fn test_revealing_twice_posts_once() {
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();

        act(&mut puzzle, &mut ctx, json!({ "action": "reveal", "clue": 2 }));
        act(&mut puzzle, &mut ctx, json!({ "action": "reveal", "clue": 2 }));

        assert_eq!(ctx.messages.len(), 1);
        assert_eq!(puzzle.view()["found"], 1);
        assert_eq!(puzzle.view()["clues"][0]["label"], serde_json::Value::Null);
        assert_eq!(puzzle.view()["clues"][1]["label"], "Password");
    }

    #[test]
    fn test_classify_before_all_found_is_rejected() {
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();

        let result = puzzle.handle(
            json!({ "action": "classify", "clue": 1, "private": false }),
            &mut ctx,
        );

        assert!(matches!(result, Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn test_correct_placement_locks_and_wrong_placement_toggles() {
        // Arrange
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();
        reveal_all(&mut puzzle, &mut ctx);

        // Act
        act(&mut puzzle, &mut ctx, json!({ "action": "classify", "clue": 2, "private": true }));
        act(&mut puzzle, &mut ctx, json!({ "action": "classify", "clue": 2, "private": false }));
        act(&mut puzzle, &mut ctx, json!({ "action": "classify", "clue": 1, "private": true }));
        let wrong = puzzle.placements.get(&1).copied();
        act(&mut puzzle, &mut ctx, json!({ "action": "classify", "clue": 1, "private": true }));

        // Assert
        assert_eq!(puzzle.placements.get(&2), Some(&true));
        assert!(puzzle.locked.contains(&2));
        assert_eq!(wrong, Some(true));
        assert!(!puzzle.locked.contains(&1));
        assert_eq!(puzzle.placements.get(&1), None);
    }

    #[test]
    fn test_verify_with_missing_placements_posts_missort_message() {
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();
        reveal_all(&mut puzzle, &mut ctx);
        act(&mut puzzle, &mut ctx, json!({ "action": "classify", "clue": 2, "private": true }));

        act(&mut puzzle, &mut ctx, json!({ "action": "verify" }));

        assert_eq!(ctx.last_message(), Some(MISSORTED));
        assert_eq!(ctx.completions, 0);
        assert_eq!(puzzle.stage, Stage::Sort);
    }

    #[test]
    fn test_verify_with_all_correct_completes() {
        // Arrange
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();
        reveal_all(&mut puzzle, &mut ctx);
        for clue in &CLUES {
            act(
                &mut puzzle,
                &mut ctx,
                json!({ "action": "classify", "clue": clue.id, "private": clue.private }),
            );
        }

        // Act
        act(&mut puzzle, &mut ctx, json!({ "action": "verify" }));

        // Assert
        assert_eq!(puzzle.stage, Stage::Complete);
        assert_eq!(ctx.completions, 1);
        assert_eq!(ctx.last_message(), Some(SORTED));
        assert_eq!(puzzle.view()["stage"], "complete");
    }

    #[test]
    fn test_unknown_clue_is_rejected() {
        let mut puzzle = PrivacyPuzzle::new();
        let mut ctx = RecordingContext::new();

        let result = puzzle.handle(json!({ "action": "reveal", "clue": 11 }), &mut ctx);

        assert!(matches!(result, Err(GameError::InvalidInput(_))));
    }
}
