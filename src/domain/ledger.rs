//! Trade ledger and running-equity tracking.

use chrono::{DateTime, Utc};

use super::error::PropplanError;
use super::metrics::PlanMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeResult {
    Win,
    Loss,
    BreakEven,
}

impl TradeResult {
    /// Storage token, matching the journal schema (`WIN` / `LOSS` / `BE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Win => "WIN",
            TradeResult::Loss => "LOSS",
            TradeResult::BreakEven => "BE",
        }
    }

    pub fn from_str(value: &str) -> Option<TradeResult> {
        match value {
            "WIN" => Some(TradeResult::Win),
            "LOSS" => Some(TradeResult::Loss),
            "BE" => Some(TradeResult::BreakEven),
            _ => None,
        }
    }
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One realized outcome, immutable once committed.
///
/// `profit_loss` was frozen from the plan's metrics at logging time; later
/// plan edits never touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub id: String,
    pub plan_id: String,
    pub result: TradeResult,
    pub profit_loss: f64,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// A trade about to be submitted: id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    pub result: TradeResult,
    pub profit_loss: f64,
    pub note: String,
}

impl NewTrade {
    /// Freeze the signed P/L from the current metrics snapshot: +target for a
    /// win, −risk for a loss, zero for break-even. A LOSS without a note is
    /// rejected; a WIN or BE note is optional.
    pub fn build(
        result: TradeResult,
        note: &str,
        metrics: &PlanMetrics,
    ) -> Result<NewTrade, PropplanError> {
        if result == TradeResult::Loss && note.trim().is_empty() {
            return Err(PropplanError::input(
                "note",
                "a note explaining the loss is required",
            ));
        }

        let profit_loss = match result {
            TradeResult::Win => metrics.target_amount,
            TradeResult::Loss => -metrics.risk_amount,
            TradeResult::BreakEven => 0.0,
        };

        Ok(NewTrade {
            result,
            profit_loss,
            note: note.to_string(),
        })
    }
}

/// One point of the equity curve: index 0 is the untouched starting balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub index: usize,
    pub balance: f64,
}

/// Running balance after every trade, oldest first.
///
/// Trade stores return trades newest-first for display; the curve re-sorts a copy
/// by `created_at` ascending (stable, so same-timestamp trades keep their
/// insertion order) before folding. The input slice's order is irrelevant.
pub fn equity_curve(starting_balance: f64, trades: &[Trade]) -> Vec<EquityPoint> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.created_at);

    let mut points = Vec::with_capacity(ordered.len() + 1);
    points.push(EquityPoint {
        index: 0,
        balance: starting_balance,
    });

    let mut running = starting_balance;
    for (i, trade) in ordered.iter().enumerate() {
        running += trade.profit_loss;
        points.push(EquityPoint {
            index: i + 1,
            balance: running,
        });
    }

    points
}

/// Fold-from-scratch balance. Recomputing on the full trade set always yields
/// the same value; no incremental state exists to drift.
pub fn current_balance(starting_balance: f64, trades: &[Trade]) -> f64 {
    starting_balance + trades.iter().map(|t| t.profit_loss).sum::<f64>()
}
