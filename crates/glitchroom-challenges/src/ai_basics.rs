//! AI capabilities quiz: three questions, some multi-select, graded once all
//! are answered.

use std::collections::BTreeSet;

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{decode, rejected, render};

/// Script key.
pub const KIND: &str = "ai_basics";

/// Correct answers needed to pass.
pub const PASS_MARK: usize = 2;

const PASSED: &str = "Excellent! You understand AI capabilities and limitations.";
const FAILED: &str = "Review the concepts and try again. Understanding AI basics is crucial!";

struct QuizOption {
    id: &'static str,
    text: &'static str,
    correct: bool,
}

struct Question {
    prompt: &'static str,
    options: &'static [QuizOption],
    multi_select: bool,
}

impl Question {
    fn option(&self, id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Right when every correct option and no wrong one is selected.
    fn is_right(&self, selected: &BTreeSet<String>) -> bool {
        if selected.is_empty() {
            return false;
        }
        self.options
            .iter()
            .all(|option| option.correct == selected.contains(option.id))
    }
}

static QUESTIONS: [Question; 3] = [
    Question {
        prompt: "Which of these tasks can AI currently perform well?",
        options: &[
            QuizOption { id: "a", text: "Recognize objects in images", correct: true },
            QuizOption { id: "b", text: "Experience emotions like humans", correct: false },
            QuizOption { id: "c", text: "Analyze large datasets for patterns", correct: true },
            QuizOption { id: "d", text: "Make perfect predictions about the future", correct: false },
        ],
        multi_select: true,
    },
    Question {
        prompt: "What is a major limitation of current AI systems?",
        options: &[
            QuizOption { id: "a", text: "They can process information faster than humans", correct: false },
            QuizOption { id: "b", text: "They lack true understanding and consciousness", correct: true },
            QuizOption { id: "c", text: "They can work 24/7 without breaks", correct: false },
            QuizOption { id: "d", text: "They can store vast amounts of data", correct: false },
        ],
        multi_select: false,
    },
    Question {
        prompt: "Which scenarios show appropriate AI use?",
        options: &[
            QuizOption { id: "a", text: "Assisting doctors in medical diagnosis", correct: true },
            QuizOption { id: "b", text: "Making final legal judgments without human oversight", correct: false },
            QuizOption { id: "c", text: "Making all important life decisions for people", correct: false },
            QuizOption { id: "d", text: "Helping with writing and editing tasks", correct: true },
        ],
        multi_select: true,
    },
];

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum QuizInput {
    Select { option: String },
    Next,
    Previous,
    Analyze,
    Retry,
}

#[derive(Debug, Serialize)]
struct OptionView {
    id: &'static str,
    text: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct ResultView {
    score: usize,
    total: usize,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct QuizView {
    question: usize,
    total: usize,
    prompt: &'static str,
    multi_select: bool,
    options: Vec<OptionView>,
    can_analyze: bool,
    result: Option<ResultView>,
}

/// The quiz state.
#[derive(Debug)]
pub struct AiBasicsQuiz {
    current: usize,
    selections: Vec<BTreeSet<String>>,
    score: Option<usize>,
}

impl AiBasicsQuiz {
    /// A quiz on its first question with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: 0,
            selections: vec![BTreeSet::new(); QUESTIONS.len()],
            score: None,
        }
    }

    fn all_answered(&self) -> bool {
        self.selections.iter().all(|selected| !selected.is_empty())
    }

    fn grade(&self) -> usize {
        QUESTIONS
            .iter()
            .zip(&self.selections)
            .filter(|(question, selected)| question.is_right(selected))
            .count()
    }

    fn select(&mut self, option: String) -> Result<(), GameError> {
        let question = &QUESTIONS[self.current];
        if question.option(&option).is_none() {
            return Err(rejected(format!("unknown option '{option}'")));
        }
        let selected = &mut self.selections[self.current];
        if question.multi_select {
            if !selected.remove(&option) {
                selected.insert(option);
            }
        } else {
            selected.clear();
            selected.insert(option);
        }
        Ok(())
    }
}

impl Default for AiBasicsQuiz {
    fn default() -> Self {
        Self::new()
    }
}

impl Challenge for AiBasicsQuiz {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn view(&self) -> serde_json::Value {
        let question = &QUESTIONS[self.current];
        let selected = &self.selections[self.current];
        render(&QuizView {
            question: self.current,
            total: QUESTIONS.len(),
            prompt: question.prompt,
            multi_select: question.multi_select,
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    id: option.id,
                    text: option.text,
                    selected: selected.contains(option.id),
                })
                .collect(),
            can_analyze: self.score.is_none() && self.all_answered(),
            result: self.score.map(|score| ResultView {
                score,
                total: QUESTIONS.len(),
                passed: score >= PASS_MARK,
            }),
        })
    }

    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError> {
        let input: QuizInput = decode(input)?;
        if self.score.is_some() && !matches!(input, QuizInput::Retry) {
            return Err(rejected("results are showing; retry first"));
        }

        match input {
            QuizInput::Select { option } => self.select(option)?,
            QuizInput::Next => {
                if self.selections[self.current].is_empty() {
                    return Err(rejected("answer the current question first"));
                }
                if self.current + 1 >= QUESTIONS.len() {
                    return Err(rejected("already on the last question"));
                }
                self.current += 1;
            }
            QuizInput::Previous => {
                if self.current == 0 {
                    return Err(rejected("already on the first question"));
                }
                self.current -= 1;
            }
            QuizInput::Analyze => {
                if !self.all_answered() {
                    return Err(rejected("every question needs an answer"));
                }
                let score = self.grade();
                self.score = Some(score);
                debug!(score, "quiz analyzed");
                if score >= PASS_MARK {
                    ctx.say(PASSED);
                    ctx.report_completion();
                } else {
                    ctx.say(FAILED);
                }
            }
            QuizInput::Retry => {
                match self.score {
                    None => return Err(rejected("nothing to retry")),
                    Some(score) if score >= PASS_MARK => {
                        return Err(rejected("the quiz is already passed"));
                    }
                    Some(_) => {}
                }
                *self = Self::new();
            }
        }
        Ok(())
    }
}
