//! Plain-text plan report adapter.
//!
//! This is the display boundary: every amount is rounded to cents here and
//! nowhere earlier. Figures the projection engine left undefined print as
//! `undefined`.

use crate::domain::error::PropplanError;
use crate::domain::projections::{EvSign, RrComparison, LOSS_CHAIN_LENGTH};
use crate::ports::report_port::{ReportContext, ReportPort};

pub struct TextReportAdapter;

fn currency(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded < 0.0 {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${rounded:.2}")
    }
}

fn count(value: Option<u32>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("1:{v:.2}"),
        None => "undefined".to_string(),
    }
}

impl ReportPort for TextReportAdapter {
    fn render(&self, ctx: &ReportContext<'_>) -> Result<String, PropplanError> {
        let plan = ctx.plan;
        let metrics = ctx.metrics;
        let projections = ctx.projections;

        let mut out = String::new();
        let mut line = |s: String| {
            out.push_str(&s);
            out.push('\n');
        };

        line(format!("=== {} ===", plan.challenge_name));
        line(format!("Profile:            {}", plan.risk_profile));
        line(format!("Account Size:       {}", currency(plan.account_size)));
        line(format!(
            "Risk Per Trade:     {}% ({})",
            metrics.risk_pct,
            currency(metrics.risk_amount)
        ));
        line(format!(
            "Reward Target:      {}% ({})",
            metrics.reward_pct,
            currency(metrics.target_amount)
        ));
        line(format!(
            "Daily Loss Limit:   {}% ({})",
            plan.daily_drawdown_pct,
            currency(metrics.max_daily_loss)
        ));
        line(format!(
            "Total Loss Limit:   {}% ({})",
            plan.overall_drawdown_pct,
            currency(metrics.max_total_loss)
        ));
        line(format!(
            "Step Target:        {} over {} step(s), min {} day(s)",
            currency(metrics.expected_step_profit),
            plan.number_of_steps,
            plan.min_trading_days
        ));
        line(format!(
            "Est. Wins to Pass:  {}",
            count(metrics.trades_to_pass())
        ));

        line(String::new());
        line("--- Projections ---".to_string());
        line(format!(
            "Safe Daily Trade Limit: {} trades",
            count(projections.max_trades_per_day)
        ));

        match &projections.scenarios {
            Some(scenarios) => {
                line(format!(
                    "Scenario sweep over {} trades:",
                    count(projections.total_trades)
                ));
                for s in scenarios {
                    line(format!(
                        "  {:>3.0}% win rate: {:>3}W - {:>3}L  {}",
                        s.win_rate * 100.0,
                        s.wins,
                        s.losses,
                        currency(s.profit)
                    ));
                }
            }
            None => line("Scenario sweep: undefined (zero risk per trade)".to_string()),
        }

        line(format!(
            "Expected Value per Trade: {} ({})",
            currency(projections.expected_value),
            match projections.ev_sign {
                EvSign::Positive => "positive",
                EvSign::Negative => "negative",
                EvSign::Zero => "zero",
            }
        ));

        line("Required RR to break even:".to_string());
        for entry in &projections.break_even {
            line(format!(
                "  at {:.0}% win rate: {}",
                entry.win_rate * 100.0,
                ratio(entry.required_rr)
            ));
        }
        line(format!(
            "Your current system: {}{}",
            ratio(projections.current_rr),
            match projections.rr_comparison {
                Some(RrComparison::AboveBreakEven) => " (above break-even)",
                Some(RrComparison::BelowBreakEven) => " (below break-even)",
                Some(RrComparison::AtBreakEven) => " (at break-even)",
                None => "",
            }
        ));

        line(format!(
            "{} consecutive losses cost {}; {} win(s) to recover",
            LOSS_CHAIN_LENGTH,
            currency(projections.loss_chain_amount),
            count(projections.wins_to_recover)
        ));

        if let Some(curve) = ctx.equity_curve {
            line(String::new());
            line("--- Equity Curve ---".to_string());
            for point in curve {
                line(format!("  #{:<3} {}", point.index, currency(point.balance)));
            }
        }

        Ok(out)
    }
}
