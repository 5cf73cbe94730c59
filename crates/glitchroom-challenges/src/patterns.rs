//! Pattern study: four single-choice steps on pattern matching versus
//! understanding.

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use serde::{Deserialize, Serialize};

use crate::{decode, rejected, render};

/// Script key.
pub const KIND: &str = "patterns";

const FINISHED: &str = "Excellent! You understand that AI processes patterns, not meaning.";
const WRONG: &str = "Think about how AI works with patterns rather than true understanding. Try again!";

struct Choice {
    id: &'static str,
    text: &'static str,
}

struct Step {
    title: &'static str,
    question: &'static str,
    options: &'static [Choice],
    answer: &'static str,
    explanation: &'static str,
}

static STEPS: [Step; 4] = [
    Step {
        title: "Pattern Recognition Challenge",
        question: "Look at this sequence: red, blue, red, blue, red, blue. What comes next?",
        options: &[
            Choice { id: "a", text: "Red Circle" },
            Choice { id: "b", text: "Blue Circle" },
            Choice { id: "c", text: "Yellow Circle" },
            Choice { id: "d", text: "Green Circle" },
        ],
        answer: "a",
        explanation: "You recognized the alternating pattern! This is exactly how AI works - it finds patterns in data.",
    },
    Step {
        title: "AI Training Simulation",
        question: "An AI was trained on these examples:\n'The cat sat on the mat' -> Happy\n'The dog ran in the park' -> Happy\n'The bird flew away' -> Sad\n\nWhat would it predict for 'The fish swam away'?",
        options: &[
            Choice { id: "a", text: "Happy - because it mentions an animal" },
            Choice { id: "b", text: "Sad - because it contains the word \"away\"" },
            Choice { id: "c", text: "Happy - because fish are nice" },
            Choice { id: "d", text: "It would understand the fish is free" },
        ],
        answer: "b",
        explanation: "Correct! The AI found the pattern that sentences with 'away' are classified as 'Sad'. It doesn't understand freedom or emotions - just word patterns.",
    },
    Step {
        title: "The Understanding Test",
        question: "A human child and an AI both correctly identify 1000 pictures of cats. What's the key difference?",
        options: &[
            Choice { id: "a", text: "The child is slower at processing" },
            Choice { id: "b", text: "The AI is more accurate" },
            Choice { id: "c", text: "The child understands what \"cat\" means, the AI just matches patterns" },
            Choice { id: "d", text: "There is no difference" },
        ],
        answer: "c",
        explanation: "Exactly! The child knows a cat is a living, breathing animal with feelings. The AI just learned that certain pixel patterns = 'cat' label.",
    },
    Step {
        title: "The Consciousness Question",
        question: "When an AI says 'I understand' or 'I think', what is actually happening?",
        options: &[
            Choice { id: "a", text: "The AI is genuinely thinking like humans do" },
            Choice { id: "b", text: "The AI has developed consciousness" },
            Choice { id: "c", text: "The AI is reproducing language patterns it learned from training data" },
            Choice { id: "d", text: "The AI is pretending to understand" },
        ],
        answer: "c",
        explanation: "Perfect! AI generates human-like responses by predicting what words should come next based on patterns, not because it actually thinks or understands.",
    },
];

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum PatternInput {
    Choose { option: String },
    Submit,
}

#[derive(Debug, Serialize)]
struct ChoiceView {
    id: &'static str,
    text: &'static str,
}

#[derive(Debug, Serialize)]
struct PatternView {
    step: usize,
    total: usize,
    title: &'static str,
    question: &'static str,
    options: Vec<ChoiceView>,
    selected: Option<String>,
    finished: bool,
}

/// The study state.
#[derive(Debug, Default)]
pub struct PatternStudy {
    current: usize,
    selected: Option<String>,
    finished: bool,
}

impl PatternStudy {
    /// A study on its first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Challenge for PatternStudy {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn view(&self) -> serde_json::Value {
        let step = &STEPS[self.current];
        render(&PatternView {
            step: self.current,
            total: STEPS.len(),
            title: step.title,
            question: step.question,
            options: step
                .options
                .iter()
                .map(|choice| ChoiceView {
                    id: choice.id,
                    text: choice.text,
                })
                .collect(),
            selected: self.selected.clone(),
            finished: self.finished,
        })
    }

    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError> {
        if self.finished {
            return Err(rejected("the study is finished"));
        }
        let step = &STEPS[self.current];
        match decode(input)? {
            PatternInput::Choose { option } => {
                if !step.options.iter().any(|choice| choice.id == option) {
                    return Err(rejected(format!("unknown option '{option}'")));
                }
                self.selected = Some(option);
            }
            PatternInput::Submit => {
                let Some(selected) = self.selected.as_deref() else {
                    return Err(rejected("choose an option first"));
                };
                if selected != step.answer {
                    ctx.say(WRONG);
                    return Ok(());
                }
                ctx.say(step.explanation);
                self.selected = None;
                if self.current + 1 < STEPS.len() {
                    self.current += 1;
                } else {
                    self.finished = true;
                    ctx.say(FINISHED);
                    ctx.report_completion();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glitchroom_test_support::RecordingContext;
    use serde_json::json;

    use super::*;

    fn answer(study: &mut PatternStudy, ctx: &mut RecordingContext, option: &str) {
        study
            .handle(json!({ "action": "choose", "option": option }), ctx)
            .unwrap();
        study.handle(json!({ "action": "submit" }), ctx).unwrap();
    }

    #[test]
    fn test_correct_answer_posts_explanation_and_advances() {
        // Arrange
        let mut study = PatternStudy::new();
        let mut ctx = RecordingContext::new();

        // Act
        answer(&mut study, &mut ctx, "a");

        // Assert
        assert_eq!(ctx.last_message(), Some(STEPS[0].explanation));
        let view = study.view();
        assert_eq!(view["step"], 1);
        assert!(view["selected"].is_null());
    }

    #[test]
    fn test_wrong_answer_stays_on_step() {
        let mut study = PatternStudy::new();
        let mut ctx = RecordingContext::new();

        answer(&mut study, &mut ctx, "b");

        assert_eq!(ctx.last_message(), Some(WRONG));
        assert_eq!(study.view()["step"], 0);
        assert_eq!(study.view()["selected"], "b");
    }

    #[test]
    fn test_all_steps_complete_the_study() {
        // Arrange
        let mut study = PatternStudy::new();
        let mut ctx = RecordingContext::new();

        // Act
        for step in &STEPS {
            answer(&mut study, &mut ctx, step.answer);
        }

        // Assert
        assert_eq!(ctx.completions, 1);
        assert_eq!(ctx.last_message(), Some(FINISHED));
        assert_eq!(study.view()["finished"], true);
    }

    #[test]
    fn test_submit_without_choice_is_rejected() {
        let mut study = PatternStudy::new();
        let mut ctx = RecordingContext::new();

        let result = study.handle(json!({ "action": "submit" }), &mut ctx);

        assert!(matches!(result, Err(GameError::InvalidInput(_))));
        assert!(ctx.messages.is_empty());
    }
}
