// Report and action-plan schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coaching::ModuleType;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Generated once when a module is completed; never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub module_type: ModuleType,
    pub project_id: String,
    pub content: ReportContent,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "lowercase")]
pub enum ReportContent {
    Story(StoryContent),
    Solution(SolutionContent),
    Success(SuccessContent),
}

impl ReportContent {
    /// Module whose schema this content follows.
    pub fn module_type(&self) -> ModuleType {
        match self {
            ReportContent::Story(_) => ModuleType::Story,
            ReportContent::Solution(_) => ModuleType::Solution,
            ReportContent::Success(_) => ModuleType::Success,
        }
    }
}

// ---- Story ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryContent {
    pub founder_why: String,
    pub brand_story: String,
    pub ideal_client_profile: ClientProfile,
    pub story_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    pub demographics: String,
    pub situation: String,
    /// Where the ideal client can be found
    pub gathering_places: String,
    pub pains: Vec<String>,
    pub desires: Vec<String>,
}

// ---- Solution ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionContent {
    pub value_proposition: String,
    pub offer_overview: OfferOverview,
    pub delivery_framework: DeliveryFramework,
    pub customer_journey: CustomerJourney,
    pub suggested_next_moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferOverview {
    pub name: String,
    pub format: String,
    pub whos_it_for: String,
    pub main_promise: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFramework {
    /// The founder's own description of how the work gets delivered
    pub approach: String,
    pub steps: Vec<NamedStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedStep {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerJourney {
    pub stages: Vec<JourneyStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyStage {
    pub stage: String,
    pub description: String,
}

// ---- Success ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessContent {
    pub home_run_outcome: String,
    pub tangible_outcomes: Vec<String>,
    pub intangible_outcomes: Vec<String>,
    pub success_metrics: Vec<SuccessMetric>,
    pub proof_plan: ProofPlan,
    pub action_plan: ProjectPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessMetric {
    pub metric: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofPlan {
    pub testimonial_questions: Vec<String>,
    pub case_study_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub ninety_day_focus: String,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub why_it_matters: String,
    pub tasks: Vec<String>,
    pub target_date: String,
}

// ---- Action plan ----

/// Story + Solution + Success for one project, merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub id: String,
    pub project_id: String,
    pub cover: Cover,
    pub story: StoryContent,
    pub solution: SolutionContent,
    pub success: SuccessContent,
    pub action_plan: PlanActions,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    pub business_name: String,
    pub tagline: String,
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanActions {
    pub projects: Vec<Project>,
    pub immediate_next_steps: Vec<String>,
}
