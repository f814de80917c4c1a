// Report synthesizer
// Module reports and the combined action plan

pub mod service;
pub mod slots;
pub mod synthesizer;
pub mod types;

pub use service::ActionPlanService;
pub use slots::{AnswerSlot, SolutionSlot, StorySlot, SuccessSlot};
pub use synthesizer::{
    compile_action_plan, compile_action_plan_from, extract_keywords, generate_report,
    report_content, report_id,
};
pub use types::{
    ActionPlan, ClientProfile, Cover, CustomerJourney, DeliveryFramework, JourneyStage, NamedStep,
    OfferOverview, PlanActions, Project, ProjectPlan, ProofPlan, Report, ReportContent,
    SolutionContent, StoryContent, SuccessContent, SuccessMetric, NOT_SPECIFIED,
};
