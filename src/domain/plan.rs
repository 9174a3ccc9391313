//! Challenge plan configuration and risk profile tiers.

use chrono::{DateTime, Utc};

/// Named risk tier. Each tier fixes the per-trade risk and reward as a
/// percentage of account size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskProfile {
    Striker,
    Midfielder,
    Defender,
}

impl RiskProfile {
    pub fn risk_pct(&self) -> f64 {
        match self {
            RiskProfile::Striker => 2.0,
            RiskProfile::Midfielder => 1.2,
            RiskProfile::Defender => 0.5,
        }
    }

    pub fn reward_pct(&self) -> f64 {
        match self {
            RiskProfile::Striker => 4.0,
            RiskProfile::Midfielder => 2.4,
            RiskProfile::Defender => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskProfile::Striker => "Striker",
            RiskProfile::Midfielder => "Midfielder",
            RiskProfile::Defender => "Defender",
        }
    }

    pub fn from_name(name: &str) -> Option<RiskProfile> {
        match name.trim() {
            "Striker" => Some(RiskProfile::Striker),
            "Midfielder" => Some(RiskProfile::Midfielder),
            "Defender" => Some(RiskProfile::Defender),
            _ => None,
        }
    }

    /// Resolve a stored profile name, falling back to [`RiskProfile::Midfielder`]
    /// for anything unrecognised. Metric derivation must stay total even when a
    /// row carries a bad profile string.
    pub fn resolve(name: &str) -> RiskProfile {
        RiskProfile::from_name(name).unwrap_or(RiskProfile::Midfielder)
    }

    pub fn all() -> [RiskProfile; 3] {
        [
            RiskProfile::Striker,
            RiskProfile::Midfielder,
            RiskProfile::Defender,
        ]
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// User-configured ruleset for one evaluation challenge.
///
/// `id`, `owner_id` and the timestamps are assigned by the plan store on save;
/// an unsaved plan carries `None` for all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: Option<String>,
    pub owner_id: Option<String>,
    pub challenge_name: String,
    pub account_size: f64,
    pub number_of_steps: u32,
    pub profit_target_pct: f64,
    pub min_trading_days: u32,
    pub daily_drawdown_pct: f64,
    pub overall_drawdown_pct: f64,
    pub consistency_rule: String,
    pub risk_profile: RiskProfile,
    pub notes: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Plan {
    fn default() -> Self {
        Plan {
            id: None,
            owner_id: None,
            challenge_name: "My Prop Challenge".to_string(),
            account_size: 100_000.0,
            number_of_steps: 2,
            profit_target_pct: 10.0,
            min_trading_days: 5,
            daily_drawdown_pct: 5.0,
            overall_drawdown_pct: 10.0,
            consistency_rule: "No major consistency rule".to_string(),
            risk_profile: RiskProfile::Midfielder,
            notes: String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}
