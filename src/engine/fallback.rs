// Deterministic offline behaviour used when no model reply is available
//
// Question sequencing is fully determined by the question index; only the
// acknowledgment phrase in front of a question varies.

use rand::seq::SliceRandom;

use super::types::PhaseState;
use crate::coaching::{self, ModuleType};

pub const ACKNOWLEDGMENTS: [&str; 6] = [
    "Got it.",
    "That makes sense.",
    "I see.",
    "Helpful context.",
    "Thanks for sharing that.",
    "Understood.",
];

pub const READY_TO_DRAFT: &str =
    "Perfect! I have everything I need. Let me pull together a draft based on what you've shared...";

pub const TURN_ERROR_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

/// Chooses the short acknowledgment placed before the next question.
pub trait AcknowledgmentPicker: Send + Sync {
    fn pick(&self) -> &'static str;
}

/// Uniform random choice from [`ACKNOWLEDGMENTS`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAcknowledgment;

impl AcknowledgmentPicker for RandomAcknowledgment {
    fn pick(&self) -> &'static str {
        ACKNOWLEDGMENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(ACKNOWLEDGMENTS[0])
    }
}

/// Always the same phrase.
#[derive(Debug, Clone, Copy)]
pub struct FixedAcknowledgment(pub &'static str);

impl AcknowledgmentPicker for FixedAcknowledgment {
    fn pick(&self) -> &'static str {
        self.0
    }
}

/// Next offline turn after the question at `answered_index` was answered.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackTurn {
    pub text: String,
    /// The question list is used up; the session moves to Draft.
    pub exhausted: bool,
}

pub fn next_question_turn(
    module: ModuleType,
    answered_index: usize,
    acknowledgment: &str,
) -> FallbackTurn {
    match coaching::question_list(module).get(answered_index + 1) {
        Some(question) => FallbackTurn {
            text: format!("{acknowledgment}\n\n{question}"),
            exhausted: false,
        },
        None => FallbackTurn {
            text: format!("{acknowledgment}\n\n{READY_TO_DRAFT}"),
            exhausted: true,
        },
    }
}

/// Reply to the warm-up turn: moves straight to the first question.
pub fn opening_question_turn(module: ModuleType, acknowledgment: &str) -> String {
    match coaching::question_list(module).first() {
        Some(question) => format!("{acknowledgment}\n\n{question}"),
        None => format!("{acknowledgment}\n\n{READY_TO_DRAFT}"),
    }
}

/// Reply to a message sent while the draft is under review.
pub fn draft_review_reply(module: ModuleType) -> String {
    format!(
        "Thanks, noted. {}\n\nWhen you're happy with the draft, complete the module to generate \
         your report.",
        coaching::reflection_prompt(module)
    )
}

/// Draft built from the captured answers alone.
pub fn draft_from_answers(module: ModuleType, state: &PhaseState) -> String {
    let questions = coaching::question_list(module);

    let summary = state
        .ordered_answers()
        .map(|(key, answer)| match questions.get(key.index()) {
            Some(question) => format!("**Question {}: {}**\n{}", key.index() + 1, question, answer),
            None => format!("**Answer {}**\n{}", key.index() + 1, answer),
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Here's a draft based on our conversation. Please review it and let me know what you'd \
         like to adjust:\n\n\
         ---\n\n\
         **Draft Summary:**\n\n\
         {summary}\n\n\
         ---\n\n\
         This is a basic summary of your answers. For a more comprehensive draft, configure an \
         Anthropic API key (ANTHROPIC_API_KEY).\n\n\
         What would you like to change or refine?"
    )
}
