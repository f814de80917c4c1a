// Report synthesis from captured answers, and action-plan compilation
//
// Both operations are pure and make no model calls. Content depends only on
// the module and the answer map, so generating twice yields the same content.

use chrono::Utc;
use std::collections::HashSet;

use super::slots::{AnswerSlot, SolutionSlot, StorySlot, SuccessSlot};
use super::types::*;
use crate::coaching::ModuleType;
use crate::engine::{Conversation, PhaseState};
use crate::errors::CoachError;

const STOP_WORDS: [&str; 18] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were",
];

const MAX_KEYWORDS: usize = 10;

/// Build the module report for a finished session.
pub fn generate_report(conversation: &Conversation) -> Report {
    Report {
        id: report_id(&conversation.id),
        module_type: conversation.module_type,
        project_id: conversation.project_id.clone(),
        content: report_content(conversation.module_type, &conversation.phase_state),
        generated_at: Utc::now(),
    }
}

/// One report per conversation: regenerating overwrites the same record.
pub fn report_id(conversation_id: &str) -> String {
    format!("report_{conversation_id}")
}

pub fn report_content(module: ModuleType, state: &PhaseState) -> ReportContent {
    match module {
        ModuleType::Story => ReportContent::Story(story_content(state)),
        ModuleType::Solution => ReportContent::Solution(solution_content(state)),
        ModuleType::Success => ReportContent::Success(success_content(state)),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn story_content(state: &PhaseState) -> StoryContent {
    let why = StorySlot::FounderWhy.resolve(state);
    let who = StorySlot::Audience.resolve(state);
    let where_found = StorySlot::Gathering.resolve(state);

    StoryContent {
        brand_story: format!(
            "You started this business because {why}. You serve {who}. They're struggling with \
             challenges and dreaming of transformation. You believe in making a real difference, \
             and this drives everything you do."
        ),
        ideal_client_profile: ClientProfile {
            name: "Ideal Client".to_string(),
            demographics: "Based on your description".to_string(),
            situation: who.clone(),
            gathering_places: where_found.clone(),
            pains: strings(&["Challenges they face", "Frustrations in their current situation"]),
            desires: strings(&["What they wish were true", "Their ideal future state"]),
        },
        story_keywords: extract_keywords(&[why.as_str(), who.as_str(), where_found.as_str()]),
        founder_why: why,
    }
}

fn solution_content(state: &PhaseState) -> SolutionContent {
    let offer = SolutionSlot::Offer.resolve(state);
    let delivery = SolutionSlot::Delivery.resolve(state);
    let journey = SolutionSlot::Journey.resolve(state);

    let step = |name: &str, description: &str| NamedStep {
        name: name.to_string(),
        description: description.to_string(),
    };
    let stage = |stage: &str, description: String| JourneyStage {
        stage: stage.to_string(),
        description,
    };

    SolutionContent {
        value_proposition:
            "We help [WHO] get [DESIRED RESULT] by [YOUR APPROACH], so they can [DEEPER BENEFIT]."
                .to_string(),
        offer_overview: OfferOverview {
            name: "Your Main Offer".to_string(),
            format: "Service/Program/Course".to_string(),
            whos_it_for: "Your ideal client".to_string(),
            main_promise: offer,
        },
        delivery_framework: DeliveryFramework {
            approach: delivery,
            steps: vec![
                step("Step 1: Discover", "Initial engagement and understanding"),
                step("Step 2: Diagnose", "Identify core needs and challenges"),
                step("Step 3: Do the work", "Main delivery and transformation"),
                step("Step 4: Support", "Ongoing support and follow-up"),
            ],
        },
        customer_journey: CustomerJourney {
            stages: vec![
                stage("AWARE", journey),
                stage("CURIOUS", "Initial interest and engagement".to_string()),
                stage("COMMITTED", "Decision to work with you".to_string()),
                stage("EXPERIENCING", "Active participation".to_string()),
                stage("ADVOCATING", "Sharing results and referring others".to_string()),
            ],
        },
        suggested_next_moves: strings(&[
            "Create a simple landing page",
            "Outline onboarding email sequence",
            "Define your first quick win",
        ]),
    }
}

fn success_content(state: &PhaseState) -> SuccessContent {
    let outcome = SuccessSlot::Outcome.resolve(state);
    let metrics = SuccessSlot::Metrics.resolve(state);
    let plan = SuccessSlot::Plan.resolve(state);

    let metric = |metric: &str, description: String| SuccessMetric {
        metric: metric.to_string(),
        description,
    };

    SuccessContent {
        home_run_outcome: format!("For your ideal client, a home run looks like: {outcome}"),
        tangible_outcomes: strings(&["Revenue increase", "Time saved", "Growth metrics"]),
        intangible_outcomes: strings(&["Increased confidence", "Reduced stress", "Greater clarity"]),
        success_metrics: vec![
            metric("Your measure of success", metrics),
            metric("Client satisfaction", "Measured through feedback".to_string()),
            metric("Business growth", "Track monthly progress".to_string()),
            metric("Personal fulfillment", "Assess work-life balance".to_string()),
        ],
        proof_plan: ProofPlan {
            testimonial_questions: strings(&[
                "What was your biggest challenge before working together?",
                "What changed after completing the program?",
                "What would you tell someone considering this?",
            ]),
            case_study_template: "Before → After → What changed → Why it mattered".to_string(),
        },
        action_plan: ProjectPlan {
            ninety_day_focus: plan,
            projects: vec![Project {
                name: "Launch beta offer".to_string(),
                why_it_matters: "Get real feedback and initial clients".to_string(),
                tasks: strings(&["Define offer details", "Create landing page", "Set launch date"]),
                target_date: "90 days from now".to_string(),
            }],
        },
    }
}

/// Lower-cased, whitespace-split words longer than three characters that
/// are not stop words; first-seen order, at most ten.
pub fn extract_keywords(texts: &[&str]) -> Vec<String> {
    let joined = texts.join(" ").to_lowercase();
    let mut seen = HashSet::new();

    joined
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !STOP_WORDS.contains(word))
        .filter(|word| seen.insert(word.to_string()))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Merge one report per module into the project's action plan.
///
/// Reports must be passed in Story, Solution, Success order and belong to
/// `project_id`; anything else is `IncompleteInput` and nothing is built.
pub fn compile_action_plan(
    story: &Report,
    solution: &Report,
    success: &Report,
    project_id: &str,
) -> Result<ActionPlan, CoachError> {
    let (story_content, solution_content, success_content) =
        match (&story.content, &solution.content, &success.content) {
            (
                ReportContent::Story(story_content),
                ReportContent::Solution(solution_content),
                ReportContent::Success(success_content),
            ) if story.module_type == ModuleType::Story
                && solution.module_type == ModuleType::Solution
                && success.module_type == ModuleType::Success =>
            {
                (story_content, solution_content, success_content)
            }
            _ => {
                return Err(CoachError::IncompleteInput(format!(
                    "expected story, solution, success; got {}, {}, {}",
                    story.module_type, solution.module_type, success.module_type
                )))
            }
        };

    if let Some(stray) = [story, solution, success]
        .into_iter()
        .find(|r| r.project_id != project_id)
    {
        return Err(CoachError::IncompleteInput(format!(
            "{} report {} belongs to project {}, not {}",
            stray.module_type, stray.id, stray.project_id, project_id
        )));
    }

    Ok(ActionPlan {
        id: format!("plan_{}", uuid::Uuid::new_v4().simple()),
        project_id: project_id.to_string(),
        cover: Cover {
            business_name: "Your Business".to_string(),
            tagline: solution_content.value_proposition.clone(),
            overview: "This Business Action Plan combines your Story, Solution, and Success \
                       modules into one comprehensive document you can use to guide your business \
                       forward."
                .to_string(),
        },
        story: story_content.clone(),
        solution: solution_content.clone(),
        success: success_content.clone(),
        action_plan: PlanActions {
            projects: success_content.action_plan.projects.clone(),
            immediate_next_steps: strings(&[
                "Review your Brand Story and update your website",
                "Finalize your offer details and pricing",
                "Set up tracking for your success metrics",
                "Begin implementing your 90-day action plan",
            ]),
        },
        generated_at: Utc::now(),
    })
}

/// Order-independent variant: exactly one report per module, in any order.
pub fn compile_action_plan_from(
    reports: &[Report],
    project_id: &str,
) -> Result<ActionPlan, CoachError> {
    let mut by_module: [Option<&Report>; 3] = [None, None, None];

    for report in reports {
        let slot = &mut by_module[module_position(report.content.module_type())];
        if report.content.module_type() != report.module_type {
            return Err(CoachError::IncompleteInput(format!(
                "report {} is labelled {} but holds {} content",
                report.id,
                report.module_type,
                report.content.module_type()
            )));
        }
        if slot.replace(report).is_some() {
            return Err(CoachError::IncompleteInput(format!(
                "duplicate {} report",
                report.module_type
            )));
        }
    }

    match by_module {
        [Some(story), Some(solution), Some(success)] => {
            compile_action_plan(story, solution, success, project_id)
        }
        _ => {
            let missing: Vec<&str> = ModuleType::ALL
                .iter()
                .zip(by_module.iter())
                .filter(|(_, r)| r.is_none())
                .map(|(m, _)| m.as_str())
                .collect();
            Err(CoachError::IncompleteInput(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

fn module_position(module: ModuleType) -> usize {
    match module {
        ModuleType::Story => 0,
        ModuleType::Solution => 1,
        ModuleType::Success => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnswerKey;

    fn state(answers: &[&str]) -> PhaseState {
        let mut state = PhaseState::default();
        for (i, a) in answers.iter().enumerate() {
            state.answers.insert(AnswerKey(i), a.to_string());
        }
        state
    }

    #[test]
    fn test_keywords_drop_short_and_stop_words() {
        let keywords = extract_keywords(&["The family business and the FAMILY farm", "with love"]);
        assert_eq!(keywords, vec!["family", "business", "farm", "love"]);
    }

    #[test]
    fn test_keywords_capped_at_ten() {
        let text = "alpha bravo charlie delta echoes foxtrot golf hotel india juliet kilo lima";
        let keywords = extract_keywords(&[text]);
        assert_eq!(keywords.len(), 10);
        assert_eq!(keywords[0], "alpha");
        assert_eq!(keywords[9], "juliet");
        assert!(!keywords.contains(&"kilo".to_string()));
    }

    #[test]
    fn test_story_content_uses_slots() {
        let answers = [
            "my grandmother taught me",
            "",
            "",
            "busy parents",
            "",
            "",
            "school pickup lines",
        ];
        let ReportContent::Story(content) = report_content(ModuleType::Story, &state(&answers))
        else {
            panic!("expected story content");
        };
        assert_eq!(content.founder_why, "my grandmother taught me");
        assert_eq!(content.ideal_client_profile.situation, "busy parents");
        assert_eq!(content.ideal_client_profile.gathering_places, "school pickup lines");
        assert!(content.brand_story.contains("because my grandmother taught me"));
        assert!(content.story_keywords.contains(&"grandmother".to_string()));
    }

    #[test]
    fn test_empty_answers_fill_not_specified() {
        let ReportContent::Success(content) =
            report_content(ModuleType::Success, &PhaseState::default())
        else {
            panic!("expected success content");
        };
        assert!(content.home_run_outcome.ends_with(NOT_SPECIFIED));
        assert_eq!(content.action_plan.ninety_day_focus, NOT_SPECIFIED);
    }

    #[test]
    fn test_content_is_deterministic() {
        let s = state(&["a reason", "b", "c", "d", "e", "f", "g", "h", "i"]);
        for module in ModuleType::ALL {
            assert_eq!(report_content(module, &s), report_content(module, &s));
        }
    }
}
