#![allow(dead_code)]

//! Shared mock ports for integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use propplan::domain::error::PropplanError;
use propplan::domain::ledger::{NewTrade, Trade};
use propplan::domain::plan::Plan;
use propplan::ports::identity_port::IdentityPort;
use propplan::ports::plan_store::{PlanStorePort, PlanSummary};
use propplan::ports::trade_store::TradeStorePort;
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// In-memory plan store keyed by owner, mirroring the sqlite adapter's
/// ownership rules without a database.
pub struct MockPlanStore {
    plans: RefCell<Vec<Plan>>,
    fail_saves: Cell<bool>,
}

impl MockPlanStore {
    pub fn new() -> Self {
        Self {
            plans: RefCell::new(Vec::new()),
            fail_saves: Cell::new(false),
        }
    }

    pub fn failing_saves(self) -> Self {
        self.fail_saves.set(true);
        self
    }

    pub fn with_plan(self, plan: Plan) -> Self {
        self.plans.borrow_mut().push(plan);
        self
    }

    pub fn plan_count(&self) -> usize {
        self.plans.borrow().len()
    }
}

impl PlanStorePort for MockPlanStore {
    fn save_plan(&self, plan: &Plan, owner_id: &str) -> Result<Plan, PropplanError> {
        if self.fail_saves.get() {
            return Err(PropplanError::Database {
                reason: "mock store configured to fail".to_string(),
            });
        }

        let mut plans = self.plans.borrow_mut();
        let now = Utc::now();

        match &plan.id {
            Some(id) => {
                let stored = plans
                    .iter_mut()
                    .find(|p| p.id.as_deref() == Some(id))
                    .ok_or_else(|| PropplanError::not_found("plan", id))?;
                if stored.owner_id.as_deref() != Some(owner_id) {
                    return Err(PropplanError::Authorization {
                        reason: format!("plan {id} does not belong to {owner_id}"),
                    });
                }
                let mut updated = plan.clone();
                updated.owner_id = stored.owner_id.clone();
                updated.created_at = stored.created_at;
                updated.updated_at = Some(now);
                *stored = updated.clone();
                Ok(updated)
            }
            None => {
                let mut saved = plan.clone();
                saved.id = Some(Uuid::new_v4().to_string());
                saved.owner_id = Some(owner_id.to_string());
                saved.created_at = Some(now);
                saved.updated_at = Some(now);
                plans.push(saved.clone());
                Ok(saved)
            }
        }
    }

    fn load_plan(&self, id: &str) -> Result<Plan, PropplanError> {
        self.plans
            .borrow()
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| PropplanError::not_found("plan", id))
    }

    fn list_plans(&self, owner_id: &str) -> Result<Vec<PlanSummary>, PropplanError> {
        let mut summaries: Vec<PlanSummary> = self
            .plans
            .borrow()
            .iter()
            .filter(|p| p.owner_id.as_deref() == Some(owner_id))
            .map(|p| PlanSummary {
                id: p.id.clone().unwrap_or_default(),
                challenge_name: p.challenge_name.clone(),
                account_size: p.account_size,
                risk_profile: p.risk_profile,
                created_at: p.created_at.unwrap_or_else(Utc::now),
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    fn delete_plan(&self, id: &str, owner_id: &str) -> Result<(), PropplanError> {
        let mut plans = self.plans.borrow_mut();
        let index = plans
            .iter()
            .position(|p| p.id.as_deref() == Some(id))
            .ok_or_else(|| PropplanError::not_found("plan", id))?;
        if plans[index].owner_id.as_deref() != Some(owner_id) {
            return Err(PropplanError::Authorization {
                reason: format!("plan {id} does not belong to {owner_id}"),
            });
        }
        plans.remove(index);
        Ok(())
    }
}

/// Append-only trade store; `fail_next` lets a test exercise the retry path.
pub struct MockTradeStore {
    trades: RefCell<Vec<Trade>>,
    fail_next: Cell<bool>,
    sequence: Cell<i64>,
}

impl MockTradeStore {
    pub fn new() -> Self {
        Self {
            trades: RefCell::new(Vec::new()),
            fail_next: Cell::new(false),
            sequence: Cell::new(0),
        }
    }

    pub fn fail_next_append(&self) {
        self.fail_next.set(true);
    }

    pub fn trade_count(&self) -> usize {
        self.trades.borrow().len()
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        // Deterministic, strictly increasing timestamps.
        let seq = self.sequence.get();
        self.sequence.set(seq + 1);
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap() + Duration::seconds(seq)
    }
}

impl TradeStorePort for MockTradeStore {
    fn append_trade(&self, plan_id: &str, new_trade: &NewTrade) -> Result<Trade, PropplanError> {
        if self.fail_next.replace(false) {
            return Err(PropplanError::Database {
                reason: "mock store configured to fail".to_string(),
            });
        }

        let trade = Trade {
            id: Uuid::new_v4().to_string(),
            plan_id: plan_id.to_string(),
            result: new_trade.result,
            profit_loss: new_trade.profit_loss,
            note: new_trade.note.clone(),
            created_at: self.next_timestamp(),
        };
        self.trades.borrow_mut().push(trade.clone());
        Ok(trade)
    }

    fn list_trades(&self, plan_id: &str) -> Result<Vec<Trade>, PropplanError> {
        let mut trades: Vec<Trade> = self
            .trades
            .borrow()
            .iter()
            .filter(|t| t.plan_id == plan_id)
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trades)
    }
}

pub struct FixedIdentity {
    owner: Option<String>,
}

impl FixedIdentity {
    pub fn logged_in(owner: &str) -> Self {
        Self {
            owner: Some(owner.to_string()),
        }
    }

    pub fn anonymous() -> Self {
        Self { owner: None }
    }
}

impl IdentityPort for FixedIdentity {
    fn current_owner(&self) -> Option<String> {
        self.owner.clone()
    }
}
