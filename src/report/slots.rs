// Answer slots
// Which captured answers feed which report field
//
// Answers are keyed by capture position (q0, q1, ...). Each slot lists the
// keys it reads, in priority order; the first one present wins. Reordering
// the question lists changes what lands in each slot.

use super::types::NOT_SPECIFIED;
use crate::engine::{AnswerKey, PhaseState};

pub trait AnswerSlot: Copy {
    /// Answer keys feeding this slot, highest priority first.
    fn sources(self) -> &'static [usize];

    /// The slot's answer, or [`NOT_SPECIFIED`].
    fn resolve(self, state: &PhaseState) -> String {
        self.sources()
            .iter()
            .find_map(|&i| state.answers.get(&AnswerKey(i)))
            .cloned()
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorySlot {
    FounderWhy,
    Audience,
    Gathering,
}

impl AnswerSlot for StorySlot {
    fn sources(self) -> &'static [usize] {
        match self {
            StorySlot::FounderWhy => &[0, 1, 2],
            StorySlot::Audience => &[3, 4, 5],
            StorySlot::Gathering => &[6],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionSlot {
    Offer,
    Delivery,
    Journey,
}

impl AnswerSlot for SolutionSlot {
    fn sources(self) -> &'static [usize] {
        match self {
            SolutionSlot::Offer => &[0, 1, 2],
            SolutionSlot::Delivery => &[3, 4, 5],
            SolutionSlot::Journey => &[6, 7, 8],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessSlot {
    Outcome,
    Metrics,
    Plan,
}

impl AnswerSlot for SuccessSlot {
    fn sources(self) -> &'static [usize] {
        match self {
            SuccessSlot::Outcome => &[0, 1, 2],
            SuccessSlot::Metrics => &[3, 4, 5],
            SuccessSlot::Plan => &[6, 7],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(usize, &str)]) -> PhaseState {
        let mut state = PhaseState::default();
        for (i, text) in pairs {
            state.answers.insert(AnswerKey(*i), text.to_string());
        }
        state
    }

    #[test]
    fn test_first_present_key_wins() {
        let s = state(&[(1, "second"), (2, "third")]);
        assert_eq!(StorySlot::FounderWhy.resolve(&s), "second");

        let s = state(&[(0, "first"), (1, "second")]);
        assert_eq!(StorySlot::FounderWhy.resolve(&s), "first");
    }

    #[test]
    fn test_missing_slot_is_not_specified() {
        let s = state(&[(0, "only")]);
        assert_eq!(StorySlot::Gathering.resolve(&s), NOT_SPECIFIED);
        assert_eq!(SuccessSlot::Plan.resolve(&s), NOT_SPECIFIED);
    }

    #[test]
    fn test_success_plan_ignores_q8() {
        let s = state(&[(8, "beyond")]);
        assert_eq!(SuccessSlot::Plan.resolve(&s), NOT_SPECIFIED);
        assert_eq!(SolutionSlot::Journey.resolve(&s), "beyond");
    }
}
