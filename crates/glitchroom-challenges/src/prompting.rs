//! Prompt-rewriting challenge: the player fixes two vague prompts.

use glitchroom_core::capability::{Challenge, ChallengeContext};
use glitchroom_core::error::GameError;
use serde::{Deserialize, Serialize};

use crate::{decode, rejected, render};

/// Script key.
pub const KIND: &str = "prompting";

/// Failed attempts after which the hint shows.
const HINT_AFTER: usize = 3;

/// Inputs this short only match by containing a whole accepted prompt.
const MIN_WORD_MATCH_LEN: usize = 10;

const ACCEPTED: &str = "Perfect! That's a much clearer prompt that would get better results.";
const UNCLEAR: &str = "That prompt might still be unclear. Try being more specific!";
const HINT_UNLOCKED: &str = "Try being more specific about what you want. Check the hint below!";

struct Scenario {
    response: &'static str,
    request: &'static str,
    issue: &'static str,
    accepted_prompts: &'static [&'static str],
    hint: &'static str,
    explanation: &'static str,
}

static SCENARIOS: [Scenario; 2] = [
    Scenario {
        response: "AI Response: 'I found many results about fruit.'",
        request: "The user asked: 'Tell me about Apple'",
        issue: "The AI misunderstood and gave information about the fruit instead of the company.",
        accepted_prompts: &[
            "tell me about apple inc",
            "apple company information",
            "apple inc the technology company",
            "information about apple corporation",
            "apple the tech company",
        ],
        hint: "Be more specific about which 'Apple' you mean. Add context like 'company' or 'Inc.'",
        explanation: "Adding context helps AI distinguish between different meanings of the same word.",
    },
    Scenario {
        response: "AI Response: 'Here's a 500-word essay about dogs in general.'",
        request: "The user asked: 'Write about dogs'",
        issue: "Too vague - the AI provided generic information instead of what the user actually wanted.",
        accepted_prompts: &[
            "write a 200 word guide on dog training tips",
            "explain how to care for a new puppy",
            "list the best dog breeds for families with children",
            "write about dog nutrition and feeding schedules",
            "describe different dog training methods",
        ],
        hint: "Be specific about what aspect of dogs you want to know about and the format you prefer.",
        explanation: "Specific prompts with clear requirements produce much better, targeted responses.",
    },
];

/// Whether `input` is an acceptable rewrite for one of `accepted`.
///
/// The input is lowercased and trimmed. It matches if it contains an accepted
/// prompt verbatim, or if it is longer than ten characters and contains every
/// word of some accepted prompt.
#[must_use]
pub fn matches_prompt(input: &str, accepted: &[&str]) -> bool {
    let input = input.trim().to_lowercase();
    if accepted.iter().any(|prompt| input.contains(prompt)) {
        return true;
    }
    input.chars().count() > MIN_WORD_MATCH_LEN
        && accepted
            .iter()
            .any(|prompt| prompt.split(' ').all(|word| input.contains(word)))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum PromptInput {
    Submit { text: String },
}

#[derive(Debug, Serialize)]
struct PromptView {
    scenario: usize,
    total: usize,
    response: &'static str,
    request: &'static str,
    issue: &'static str,
    attempts: usize,
    hint: Option<&'static str>,
    explanation: Option<&'static str>,
    solved: bool,
}

/// The challenge state.
#[derive(Debug, Default)]
pub struct PromptingChallenge {
    current: usize,
    attempts: usize,
    hint_visible: bool,
    solved: bool,
}

impl PromptingChallenge {
    /// A challenge on its first scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Challenge for PromptingChallenge {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn view(&self) -> serde_json::Value {
        let scenario = &SCENARIOS[self.current];
        render(&PromptView {
            scenario: self.current,
            total: SCENARIOS.len(),
            response: scenario.response,
            request: scenario.request,
            issue: scenario.issue,
            attempts: self.attempts,
            hint: self.hint_visible.then_some(scenario.hint),
            explanation: self.solved.then_some(scenario.explanation),
            solved: self.solved,
        })
    }

    fn handle(
        &mut self,
        input: serde_json::Value,
        ctx: &mut dyn ChallengeContext,
    ) -> Result<(), GameError> {
        let PromptInput::Submit { text } = decode(input)?;
        if self.solved {
            return Err(rejected("every scenario is already solved"));
        }

        let scenario = &SCENARIOS[self.current];
        self.attempts += 1;
        if !matches_prompt(&text, scenario.accepted_prompts) {
            if self.attempts >= HINT_AFTER {
                self.hint_visible = true;
                ctx.say(HINT_UNLOCKED);
            } else {
                ctx.say(UNCLEAR);
            }
            return Ok(());
        }

        ctx.say(ACCEPTED);
        if self.current + 1 < SCENARIOS.len() {
            self.current += 1;
            self.attempts = 0;
            self.hint_visible = false;
        } else {
            self.solved = true;
            ctx.report_completion();
        }
        Ok(())
    }
}
