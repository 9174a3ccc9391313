//! Trade submission state machine.
//!
//! Idle → Composing(result, note) → Submitting → committed (back to Idle) or
//! failed (back to Composing with the note preserved). One submission at a
//! time per plan: `begin_submit` refuses while another is in flight.

use super::error::PropplanError;
use super::ledger::{NewTrade, TradeResult};
use super::metrics::PlanMetrics;

#[derive(Debug, Clone, PartialEq)]
pub enum LogState {
    Idle,
    Composing { result: TradeResult, note: String },
    Submitting { result: TradeResult, note: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeLog {
    state: LogState,
}

impl TradeLog {
    pub fn new() -> Self {
        TradeLog {
            state: LogState::Idle,
        }
    }

    pub fn state(&self) -> &LogState {
        &self.state
    }

    /// Start composing a trade. Selecting a result while already composing
    /// keeps the note (switching WIN to LOSS mid-entry is common).
    pub fn select(&mut self, result: TradeResult) {
        let note = match &self.state {
            LogState::Composing { note, .. } => note.clone(),
            _ => String::new(),
        };
        self.state = LogState::Composing { result, note };
    }

    pub fn set_note(&mut self, text: &str) {
        if let LogState::Composing { result, .. } = &self.state {
            self.state = LogState::Composing {
                result: *result,
                note: text.to_string(),
            };
        }
    }

    /// Discard the draft and return to Idle. No effect mid-submission.
    pub fn cancel(&mut self) {
        if matches!(self.state, LogState::Composing { .. }) {
            self.state = LogState::Idle;
        }
    }

    /// Move to Submitting and freeze the P/L from the current metrics.
    ///
    /// Blocked while a LOSS note is empty (stays Composing), when nothing is
    /// being composed, and while a previous submission is still in flight.
    pub fn begin_submit(&mut self, metrics: &PlanMetrics) -> Result<NewTrade, PropplanError> {
        match &self.state {
            LogState::Idle => Err(PropplanError::input(
                "trade",
                "select a result before submitting",
            )),
            LogState::Submitting { .. } => Err(PropplanError::input(
                "trade",
                "a submission is already in flight",
            )),
            LogState::Composing { result, note } => {
                let new_trade = NewTrade::build(*result, note, metrics)?;
                self.state = LogState::Submitting {
                    result: *result,
                    note: note.clone(),
                };
                Ok(new_trade)
            }
        }
    }

    /// The store accepted the trade: back to Idle, draft cleared.
    pub fn commit(&mut self) {
        if matches!(self.state, LogState::Submitting { .. }) {
            self.state = LogState::Idle;
        }
    }

    /// The store rejected the trade: back to Composing with the note intact so
    /// the entry can be retried without retyping.
    pub fn fail(&mut self) {
        if let LogState::Submitting { result, note } = &self.state {
            self.state = LogState::Composing {
                result: *result,
                note: note.clone(),
            };
        }
    }
}

impl Default for TradeLog {
    fn default() -> Self {
        TradeLog::new()
    }
}
