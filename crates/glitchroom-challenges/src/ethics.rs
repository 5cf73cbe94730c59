//! Responsible AI evaluation: five scenarios, scored at the end.

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{decode, rejected, render};

/// Script key.
pub const KIND: &str = "ethics";

/// Responsible choices needed to pass.
pub const PASS_MARK: usize = 4;

const PASSED: &str = "Outstanding! You understand responsible AI principles.";

struct Choice {
    id: &'static str,
    text: &'static str,
    responsible: bool,
    feedback: &'static str,
}

struct Scenario {
    title: &'static str,
    situation: &'static str,
    question: &'static str,
    choices: &'static [Choice],
}

static SCENARIOS: [Scenario; 5] = [
    Scenario {
        title: "Healthcare AI Assistant",
        situation: "A hospital wants to use AI to help diagnose patients faster. The AI has been trained on medical data and shows 95% accuracy in tests.",
        question: "What's the most responsible approach?",
        choices: &[
            Choice {
                id: "a",
                text: "Replace doctors with AI since it's more accurate",
                responsible: false,
                feedback: "AI should assist, not replace human medical professionals who provide critical judgment and empathy.",
            },
            Choice {
                id: "b",
                text: "Use AI as a diagnostic aid while doctors make final decisions",
                responsible: true,
                feedback: "Perfect! AI can enhance human capabilities while keeping humans in control of critical decisions.",
            },
            Choice {
                id: "c",
                text: "Only use AI for minor cases to save money",
                responsible: false,
                feedback: "This approach doesn't consider patient safety or the value of human oversight in all medical situations.",
            },
        ],
    },
    Scenario {
        title: "Educational AI Tutor",
        situation: "A school district wants to implement AI tutoring systems that adapt to each student's learning pace and style.",
        question: "What ethical considerations are most important?",
        choices: &[
            Choice {
                id: "a",
                text: "Collect detailed data on student behavior to improve AI performance",
                responsible: false,
                feedback: "Student privacy must be protected. Collect only necessary data with proper consent and security.",
            },
            Choice {
                id: "b",
                text: "Ensure the AI doesn't replace human teachers and protects student privacy",
                responsible: true,
                feedback: "Excellent! AI should enhance education while preserving human connection and protecting sensitive data.",
            },
            Choice {
                id: "c",
                text: "Use AI to automatically grade and rank all students",
                responsible: false,
                feedback: "Automated ranking could introduce bias and reduce education to mere test scores.",
            },
        ],
    },
    Scenario {
        title: "Autonomous Vehicle Decision",
        situation: "An AI-powered car must make a split-second decision in an unavoidable accident scenario.",
        question: "How should we approach this ethical dilemma?",
        choices: &[
            Choice {
                id: "a",
                text: "Program the AI to always protect the passenger at any cost",
                responsible: false,
                feedback: "This could lead to unfair outcomes and doesn't consider the broader ethical implications.",
            },
            Choice {
                id: "b",
                text: "Have transparent public discussions about these decisions before deployment",
                responsible: true,
                feedback: "Right! Ethical AI decisions should involve public input and transparent decision-making processes.",
            },
            Choice {
                id: "c",
                text: "Let the AI learn these decisions from accident data",
                responsible: false,
                feedback: "Life-and-death decisions shouldn't be left to pattern matching from historical data.",
            },
        ],
    },
    Scenario {
        title: "AI Hiring Assistant",
        situation: "A company wants to use AI to screen job applications and rank candidates to speed up hiring.",
        question: "What's the biggest risk to address?",
        choices: &[
            Choice {
                id: "a",
                text: "The AI might be slower than human recruiters",
                responsible: false,
                feedback: "Speed isn't the main concern - fairness and bias prevention are much more important.",
            },
            Choice {
                id: "b",
                text: "The AI could perpetuate historical hiring biases against certain groups",
                responsible: true,
                feedback: "Correct! AI can amplify existing biases in training data, leading to unfair discrimination.",
            },
            Choice {
                id: "c",
                text: "Candidates might not like interacting with AI",
                responsible: false,
                feedback: "While user experience matters, preventing discrimination is the critical ethical issue here.",
            },
        ],
    },
    Scenario {
        title: "AI Environmental Monitor",
        situation: "An AI system monitors environmental data and could predict natural disasters, but it sometimes gives false alarms.",
        question: "How should authorities handle this?",
        choices: &[
            Choice {
                id: "a",
                text: "Ignore AI warnings to avoid unnecessary panic",
                responsible: false,
                feedback: "Ignoring warnings could lead to preventable disasters and loss of life.",
            },
            Choice {
                id: "b",
                text: "Always evacuate immediately when AI predicts danger",
                responsible: false,
                feedback: "This could lead to 'alert fatigue' and waste resources on false alarms.",
            },
            Choice {
                id: "c",
                text: "Use AI predictions as one factor in human decision-making processes",
                responsible: true,
                feedback: "Perfect! AI should inform human judgment, not replace it in critical safety decisions.",
            },
        ],
    },
];

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum EthicsInput {
    Choose { choice: String },
    Submit,
}

#[derive(Debug, Serialize)]
struct ChoiceView {
    id: &'static str,
    text: &'static str,
}

#[derive(Debug, Serialize)]
struct EthicsView {
    scenario: usize,
    total: usize,
    title: &'static str,
    situation: &'static str,
    question: &'static str,
    choices: Vec<ChoiceView>,
    selected: Option<String>,
    score: usize,
    passed: bool,
}

/// The evaluation state.
#[derive(Debug, Default)]
pub struct EthicsEvaluation {
    current: usize,
    selected: Option<String>,
    score: usize,
    passed: bool,
}

impl EthicsEvaluation {
    /// An evaluation on its first scenario with no score.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn submit(&mut self, ctx: &mut dyn ChallengeContext) -> Result<(), GameError> {
        let scenario = &SCENARIOS[self.current];
        let Some(choice) = self
            .selected
            .as_deref()
            .and_then(|id| scenario.choices.iter().find(|choice| choice.id == id))
        else {
            return Err(rejected("choose an answer first"));
        };

        if choice.responsible {
            self.score += 1;
        }
        ctx.say(choice.feedback);
        self.selected = None;
        if self.current + 1 < SCENARIOS.len() {
            self.current += 1;
            return Ok(());
        }

        debug!(score = self.score, "ethics evaluation scored");
        if self.score >= PASS_MARK {
            self.passed = true;
            ctx.say(PASSED);
            ctx.report_completion();
        } else {
            ctx.say(&format!(
                "You got {}/{} correct. Review the principles and try again!",
                self.score,
                SCENARIOS.len()
            ));
            *self = Self::new();
        }
        Ok(())
    }
}

impl Challenge for EthicsEvaluation {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn view(&self) -> serde_json::Value {
        let scenario = &SCENARIOS[self.current];
        render(&EthicsView {
            scenario: self.current,
            total: SCENARIOS.len(),
            title: scenario.title,
            situation: scenario.situation,
            question: scenario.question,
            choices: scenario
                .choices
                .iter()
                .map(|choice| ChoiceView {
                    id: choice.id,
                    text: choice.text,
                })
                .collect(),
            selected: self.selected.clone(),
            score: self.score,
            passed: self.passed,
        })
    }

    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError> {
        if self.passed {
            return Err(rejected("the evaluation is already passed"));
        }
        match decode(input)? {
            EthicsInput::Choose { choice } => {
                let scenario = &SCENARIOS[self.current];
                if !scenario.choices.iter().any(|known| known.id == choice) {
                    return Err(rejected(format!("unknown choice '{choice}'")));
                }
                self.selected = Some(choice);
                Ok(())
            }
            EthicsInput::Submit => self.submit(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use glitchroom_test_support::RecordingContext;
    use serde_json::json;

    use super::*;

    fn answer(evaluation: &mut EthicsEvaluation, ctx: &mut RecordingContext, choice: &str) {
        evaluation
            .handle(json!({ "action": "choose", "choice": choice }), ctx)
            .unwrap();
        evaluation.handle(json!({ "action": "submit" }), ctx).unwrap();
    }

    fn responsible_choice(index: usize) -> &'static str {
        SCENARIOS[index]
            .choices
            .iter()
            .find(|choice| choice.responsible)
            .unwrap()
            .id
    }

    #[test]
    fn test_submit_posts_feedback_and_advances() {
        // Arrange
        let mut evaluation = EthicsEvaluation::new();
        let mut ctx = RecordingContext::new();

        // Act
        answer(&mut evaluation, &mut ctx, "a");

        // Assert
        assert_eq!(ctx.last_message(), Some(SCENARIOS[0].choices[0].feedback));
        let view = evaluation.view();
        assert_eq!(view["scenario"], 1);
        assert_eq!(view["score"], 0);
    }

    #[test]
    fn test_four_responsible_choices_pass() {
        // Arrange
        let mut evaluation = EthicsEvaluation::new();
        let mut ctx = RecordingContext::new();

        // Act
        answer(&mut evaluation, &mut ctx, "a");
        for index in 1..SCENARIOS.len() {
            answer(&mut evaluation, &mut ctx, responsible_choice(index));
        }

        // Assert
        assert_eq!(ctx.completions, 1);
        assert_eq!(ctx.last_message(), Some(PASSED));
        assert_eq!(evaluation.view()["passed"], true);
        assert_eq!(evaluation.view()["score"], 4);
    }

    #[test]
    fn test_low_score_resets_with_score_message() {
        // Arrange
        let mut evaluation = EthicsEvaluation::new();
        let mut ctx = RecordingContext::new();

        // Act
        answer(&mut evaluation, &mut ctx, "a");
        answer(&mut evaluation, &mut ctx, "a");
        for index in 2..SCENARIOS.len() {
            answer(&mut evaluation, &mut ctx, responsible_choice(index));
        }

        // Assert
        assert_eq!(ctx.completions, 0);
        assert_eq!(
            ctx.last_message(),
            Some("You got 3/5 correct. Review the principles and try again!")
        );
        let view = evaluation.view();
        assert_eq!(view["scenario"], 0);
        assert_eq!(view["score"], 0);
    }

    #[test]
    fn test_unknown_choice_and_empty_submit_are_rejected() {
        let mut evaluation = EthicsEvaluation::new();
        let mut ctx = RecordingContext::new();

        let unknown = evaluation.handle(json!({ "action": "choose", "choice": "z" }), &mut ctx);
        let empty = evaluation.handle(json!({ "action": "submit" }), &mut ctx);

        assert!(matches!(unknown, Err(GameError::InvalidInput(_))));
        assert!(matches!(empty, Err(GameError::InvalidInput(_))));
    }
}
