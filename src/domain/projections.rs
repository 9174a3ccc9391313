//! Scenario projections computed from a metrics snapshot.
//!
//! Every figure here is independent: a zero denominator makes that one figure
//! `None` without touching the others. `None` is the explicit "undefined"
//! result; infinities and NaNs never leak out of this module.

use super::metrics::PlanMetrics;
use super::plan::Plan;

/// Trial win rates for the scenario sweep.
pub const SCENARIO_WIN_RATES: [f64; 4] = [0.30, 0.40, 0.50, 0.60];

/// Reference win rates for the break-even risk/reward table.
pub const BREAK_EVEN_WIN_RATES: [f64; 3] = [0.40, 0.50, 0.60];

/// Baseline win probability for the expected-value figure.
pub const BASELINE_WIN_PROB: f64 = 0.5;

/// Consecutive losses assumed by the recovery-cycle figure.
pub const LOSS_CHAIN_LENGTH: u32 = 3;

/// Break-even RR at the 50% baseline, the reference the current system's RR is
/// judged against.
const BASELINE_BREAK_EVEN_RR: f64 = 1.0;

/// Projected outcome at one trial win rate.
///
/// `losses` is always `total − wins` where `wins` is round-half-up, so the
/// split sums to the total trade count for every rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub win_rate: f64,
    pub wins: u32,
    pub losses: u32,
    pub profit: f64,
}

/// Required reward multiple to break even at one reference win rate.
/// `required_rr` is `None` at a 100% win rate, where the ratio is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakEvenEntry {
    pub win_rate: f64,
    pub required_rr: Option<f64>,
}

/// Sign of the per-trade expected value, exposed as data for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvSign {
    Positive,
    Negative,
    Zero,
}

/// Where the plan's RR sits relative to the 50% break-even requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrComparison {
    AboveBreakEven,
    BelowBreakEven,
    AtBreakEven,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projections {
    /// floor(max_daily_loss / risk_amount); None when risk_amount is zero.
    pub max_trades_per_day: Option<u32>,
    /// max_trades_per_day × min_trading_days; undefined with the cap.
    pub total_trades: Option<u32>,
    /// One entry per [`SCENARIO_WIN_RATES`]; undefined with the cap.
    pub scenarios: Option<Vec<Scenario>>,
    /// 0.5 × target − 0.5 × risk. Always defined.
    pub expected_value: f64,
    pub ev_sign: EvSign,
    /// One entry per [`BREAK_EVEN_WIN_RATES`].
    pub break_even: Vec<BreakEvenEntry>,
    /// reward_pct / risk_pct; None when risk_pct is zero.
    pub current_rr: Option<f64>,
    pub rr_comparison: Option<RrComparison>,
    /// risk_amount × LOSS_CHAIN_LENGTH. Always defined.
    pub loss_chain_amount: f64,
    /// ceil(loss_chain_amount / target_amount); None when target is zero.
    pub wins_to_recover: Option<u32>,
}

impl Projections {
    pub fn derive(plan: &Plan, metrics: &PlanMetrics) -> Self {
        let max_trades_per_day = daily_trade_cap(metrics);
        let total_trades = max_trades_per_day.map(|cap| cap * plan.min_trading_days);
        let scenarios = total_trades.map(|total| {
            SCENARIO_WIN_RATES
                .iter()
                .map(|&rate| simulate_scenario(total, rate, metrics))
                .collect()
        });

        let expected_value = BASELINE_WIN_PROB * metrics.target_amount
            - (1.0 - BASELINE_WIN_PROB) * metrics.risk_amount;
        let ev_sign = if expected_value > 0.0 {
            EvSign::Positive
        } else if expected_value < 0.0 {
            EvSign::Negative
        } else {
            EvSign::Zero
        };

        let break_even = BREAK_EVEN_WIN_RATES
            .iter()
            .map(|&rate| BreakEvenEntry {
                win_rate: rate,
                required_rr: break_even_rr(rate),
            })
            .collect();

        let current_rr = if metrics.risk_pct == 0.0 {
            None
        } else {
            Some(metrics.reward_pct / metrics.risk_pct)
        };
        let rr_comparison = current_rr.map(|rr| {
            if rr > BASELINE_BREAK_EVEN_RR {
                RrComparison::AboveBreakEven
            } else if rr < BASELINE_BREAK_EVEN_RR {
                RrComparison::BelowBreakEven
            } else {
                RrComparison::AtBreakEven
            }
        });

        let loss_chain_amount = metrics.risk_amount * LOSS_CHAIN_LENGTH as f64;
        let wins_to_recover = if metrics.target_amount == 0.0 {
            None
        } else {
            Some((loss_chain_amount / metrics.target_amount).ceil() as u32)
        };

        Projections {
            max_trades_per_day,
            total_trades,
            scenarios,
            expected_value,
            ev_sign,
            break_even,
            current_rr,
            rr_comparison,
            loss_chain_amount,
            wins_to_recover,
        }
    }
}

/// How many trades fit inside the daily loss limit. Undefined when a trade
/// risks nothing, since the cap would be infinite.
pub fn daily_trade_cap(metrics: &PlanMetrics) -> Option<u32> {
    if metrics.risk_amount == 0.0 {
        return None;
    }
    Some((metrics.max_daily_loss / metrics.risk_amount).floor() as u32)
}

/// Break-even reward multiple for a win rate: r / (1 − r).
/// Undefined at r == 1 (no losses to offset).
pub fn break_even_rr(win_rate: f64) -> Option<f64> {
    if win_rate >= 1.0 {
        return None;
    }
    Some(win_rate / (1.0 - win_rate))
}

fn simulate_scenario(total_trades: u32, win_rate: f64, metrics: &PlanMetrics) -> Scenario {
    // Round-half-up on wins; losses by subtraction so the split always sums
    // back to total_trades.
    let wins = (total_trades as f64 * win_rate).round() as u32;
    let losses = total_trades - wins;
    let profit =
        wins as f64 * metrics.target_amount - losses as f64 * metrics.risk_amount;

    Scenario {
        win_rate,
        wins,
        losses,
        profit,
    }
}
