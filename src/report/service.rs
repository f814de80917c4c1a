// Project-level report queries and the lazily compiled action plan

use tracing::{debug, info};

use super::synthesizer::compile_action_plan;
use super::types::{ActionPlan, Report};
use crate::coaching::ModuleType;
use crate::errors::CoachError;
use crate::storage::{FieldFilter, Stores};

pub struct ActionPlanService {
    stores: Stores,
}

impl ActionPlanService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Every report of a project, newest first.
    pub async fn reports_for_project(&self, project_id: &str) -> Result<Vec<Report>, CoachError> {
        Ok(self
            .stores
            .reports
            .scan_by_field(&[FieldFilter::project(project_id)])
            .await?)
    }

    /// The project's action plan.
    ///
    /// Returns the stored plan if one exists. Otherwise, once a report exists
    /// for every module, compiles one from the newest report of each and
    /// stores it. `None` while any module is still missing.
    ///
    /// A stored plan is never recompiled, even if newer reports arrive.
    pub async fn plan_for_project(
        &self,
        project_id: &str,
    ) -> Result<Option<ActionPlan>, CoachError> {
        let existing = self
            .stores
            .plans
            .scan_by_field(&[FieldFilter::project(project_id)])
            .await?;
        // Oldest stored plan wins if a race ever wrote two
        if let Some(plan) = existing.into_iter().last() {
            debug!(project_id, plan_id = %plan.id, "Using stored action plan");
            return Ok(Some(plan));
        }

        let reports = self.reports_for_project(project_id).await?;
        let newest = |module: ModuleType| reports.iter().find(|r| r.module_type == module);

        let (Some(story), Some(solution), Some(success)) = (
            newest(ModuleType::Story),
            newest(ModuleType::Solution),
            newest(ModuleType::Success),
        ) else {
            debug!(project_id, "Action plan not available until all modules are complete");
            return Ok(None);
        };

        let plan = compile_action_plan(story, solution, success, project_id)?;
        self.stores.plans.put(&plan).await?;
        info!(project_id, plan_id = %plan.id, "Compiled action plan");
        Ok(Some(plan))
    }
}
