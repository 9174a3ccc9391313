//! Derived risk figures for a plan.

use super::plan::Plan;

/// Snapshot of the figures derived from a [`Plan`].
///
/// Recomputed in full whenever the plan changes; never stored independently of
/// the plan it came from. All amounts are carried at full f64 precision;
/// rounding happens only at display boundaries (report/export adapters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanMetrics {
    pub risk_pct: f64,
    pub reward_pct: f64,
    pub risk_amount: f64,
    pub target_amount: f64,
    pub expected_step_profit: f64,
    pub max_daily_loss: f64,
    pub max_total_loss: f64,
}

impl PlanMetrics {
    /// Pure, total derivation. Never fails: an unresolvable risk profile is
    /// impossible by construction (the profile is a closed enum, and string
    /// resolution at the storage boundary already fell back to Midfielder).
    pub fn derive(plan: &Plan) -> Self {
        let risk_pct = plan.risk_profile.risk_pct();
        let reward_pct = plan.risk_profile.reward_pct();

        PlanMetrics {
            risk_pct,
            reward_pct,
            risk_amount: plan.account_size * (risk_pct / 100.0),
            target_amount: plan.account_size * (reward_pct / 100.0),
            expected_step_profit: plan.account_size * (plan.profit_target_pct / 100.0),
            max_daily_loss: plan.account_size * (plan.daily_drawdown_pct / 100.0),
            max_total_loss: plan.account_size * (plan.overall_drawdown_pct / 100.0),
        }
    }

    /// Winning trades needed to reach one step's profit target.
    pub fn trades_to_pass(&self) -> Option<u32> {
        if self.target_amount <= 0.0 {
            return None;
        }
        Some((self.expected_step_profit / self.target_amount).ceil() as u32)
    }
}
