//! Plan storage port trait.

use crate::domain::error::PropplanError;
use crate::domain::plan::{Plan, RiskProfile};
use chrono::{DateTime, Utc};

/// Row-level summary returned by listings; the full plan is loaded on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub id: String,
    pub challenge_name: String,
    pub account_size: f64,
    pub risk_profile: RiskProfile,
    pub created_at: DateTime<Utc>,
}

pub trait PlanStorePort {
    /// Insert or update. Assigns id and timestamps on insert; bumps
    /// `updated_at` on update. The returned plan carries the assigned fields.
    fn save_plan(&self, plan: &Plan, owner_id: &str) -> Result<Plan, PropplanError>;

    fn load_plan(&self, id: &str) -> Result<Plan, PropplanError>;

    /// Newest first.
    fn list_plans(&self, owner_id: &str) -> Result<Vec<PlanSummary>, PropplanError>;

    fn delete_plan(&self, id: &str, owner_id: &str) -> Result<(), PropplanError>;
}
