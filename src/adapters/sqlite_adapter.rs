//! SQLite storage adapter for plans and trades.

use crate::domain::error::PropplanError;
use crate::domain::ledger::{NewTrade, Trade, TradeResult};
use crate::domain::plan::{Plan, RiskProfile};
use crate::ports::config_port::ConfigPort;
use crate::ports::plan_store::{PlanStorePort, PlanSummary};
use crate::ports::trade_store::TradeStorePort;
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use uuid::Uuid;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn db_err(e: impl std::fmt::Display) -> PropplanError {
    PropplanError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: impl std::fmt::Display) -> PropplanError {
    PropplanError::DatabaseQuery {
        reason: e.to_string(),
    }
}

/// Ids are opaque to the engine but this boundary only accepts canonical
/// hyphenated UUID strings, the format it assigns.
fn check_id(kind: &str, id: &str) -> Result<(), PropplanError> {
    if id.len() == 36 && Uuid::parse_str(id).is_ok() {
        Ok(())
    } else {
        Err(PropplanError::input(
            "id",
            &format!("{kind} id must be a canonical UUID string"),
        ))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, PropplanError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PropplanError::Database {
            reason: format!("invalid stored timestamp {value}: {e}"),
        })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PropplanError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| PropplanError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(db_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, PropplanError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;
        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), PropplanError> {
        let conn = self.pool.get().map_err(db_err)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                challenge_name TEXT NOT NULL,
                account_size REAL NOT NULL,
                number_of_steps INTEGER NOT NULL,
                profit_target_pct REAL NOT NULL,
                min_trading_days INTEGER NOT NULL,
                daily_drawdown_pct REAL NOT NULL,
                overall_drawdown_pct REAL NOT NULL,
                consistency_rule TEXT NOT NULL,
                risk_profile TEXT NOT NULL,
                notes TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_plans_owner ON plans(owner_id);
            CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                plan_id TEXT NOT NULL REFERENCES plans(id),
                result TEXT NOT NULL,
                profit_loss REAL NOT NULL,
                note TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_trades_plan ON trades(plan_id, created_at);",
        )
        .map_err(query_err)?;

        Ok(())
    }

    fn plan_owner(&self, id: &str) -> Result<String, PropplanError> {
        let conn = self.pool.get().map_err(db_err)?;
        conn.query_row("SELECT owner_id FROM plans WHERE id = ?1", params![id], |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => PropplanError::not_found("plan", id),
            other => query_err(other),
        })
    }
}

fn row_to_plan(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Plan, String, String)> {
    let profile_name: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;

    Ok((
        Plan {
            id: Some(row.get(0)?),
            owner_id: Some(row.get(1)?),
            challenge_name: row.get(2)?,
            account_size: row.get(3)?,
            number_of_steps: row.get::<_, i64>(4)? as u32,
            profit_target_pct: row.get(5)?,
            min_trading_days: row.get::<_, i64>(6)? as u32,
            daily_drawdown_pct: row.get(7)?,
            overall_drawdown_pct: row.get(8)?,
            consistency_rule: row.get(9)?,
            // Documented fallback: a bad stored name resolves to Midfielder.
            risk_profile: RiskProfile::resolve(&profile_name),
            notes: row.get(11)?,
            created_at: None,
            updated_at: None,
        },
        created_at,
        updated_at,
    ))
}

impl PlanStorePort for SqliteAdapter {
    fn save_plan(&self, plan: &Plan, owner_id: &str) -> Result<Plan, PropplanError> {
        let now = Utc::now();

        match &plan.id {
            Some(id) => {
                check_id("plan", id)?;
                let row_owner = self.plan_owner(id)?;
                if row_owner != owner_id {
                    return Err(PropplanError::Authorization {
                        reason: format!("plan {id} belongs to another owner"),
                    });
                }

                let conn = self.pool.get().map_err(db_err)?;
                conn.execute(
                    "UPDATE plans SET challenge_name = ?1, account_size = ?2,
                        number_of_steps = ?3, profit_target_pct = ?4,
                        min_trading_days = ?5, daily_drawdown_pct = ?6,
                        overall_drawdown_pct = ?7, consistency_rule = ?8,
                        risk_profile = ?9, notes = ?10, updated_at = ?11
                     WHERE id = ?12",
                    params![
                        plan.challenge_name,
                        plan.account_size,
                        plan.number_of_steps as i64,
                        plan.profit_target_pct,
                        plan.min_trading_days as i64,
                        plan.daily_drawdown_pct,
                        plan.overall_drawdown_pct,
                        plan.consistency_rule,
                        plan.risk_profile.name(),
                        plan.notes,
                        now.to_rfc3339(),
                        id,
                    ],
                )
                .map_err(query_err)?;

                let mut saved = plan.clone();
                saved.owner_id = Some(row_owner);
                saved.updated_at = Some(now);
                Ok(saved)
            }
            None => {
                let id = Uuid::new_v4().to_string();
                let conn = self.pool.get().map_err(db_err)?;
                conn.execute(
                    "INSERT INTO plans (id, owner_id, challenge_name, account_size,
                        number_of_steps, profit_target_pct, min_trading_days,
                        daily_drawdown_pct, overall_drawdown_pct, consistency_rule,
                        risk_profile, notes, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    params![
                        id,
                        owner_id,
                        plan.challenge_name,
                        plan.account_size,
                        plan.number_of_steps as i64,
                        plan.profit_target_pct,
                        plan.min_trading_days as i64,
                        plan.daily_drawdown_pct,
                        plan.overall_drawdown_pct,
                        plan.consistency_rule,
                        plan.risk_profile.name(),
                        plan.notes,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )
                .map_err(query_err)?;

                let mut saved = plan.clone();
                saved.id = Some(id);
                saved.owner_id = Some(owner_id.to_string());
                saved.created_at = Some(now);
                saved.updated_at = Some(now);
                Ok(saved)
            }
        }
    }

    fn load_plan(&self, id: &str) -> Result<Plan, PropplanError> {
        check_id("plan", id)?;
        let conn = self.pool.get().map_err(db_err)?;

        let row = conn
            .query_row(
                "SELECT id, owner_id, challenge_name, account_size, number_of_steps,
                        profit_target_pct, min_trading_days, daily_drawdown_pct,
                        overall_drawdown_pct, consistency_rule, risk_profile, notes,
                        created_at, updated_at
                 FROM plans WHERE id = ?1",
                params![id],
                row_to_plan,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => PropplanError::not_found("plan", id),
                other => query_err(other),
            })?;

        let (mut plan, created_at, updated_at) = row;
        plan.created_at = Some(parse_timestamp(&created_at)?);
        plan.updated_at = Some(parse_timestamp(&updated_at)?);
        Ok(plan)
    }

    fn list_plans(&self, owner_id: &str) -> Result<Vec<PlanSummary>, PropplanError> {
        let conn = self.pool.get().map_err(db_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, challenge_name, account_size, risk_profile, created_at
                 FROM plans WHERE owner_id = ?1 ORDER BY created_at DESC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![owner_id], |row| {
                let profile: String = row.get(3)?;
                let created: String = row.get(4)?;
                Ok((
                    PlanSummary {
                        id: row.get(0)?,
                        challenge_name: row.get(1)?,
                        account_size: row.get(2)?,
                        risk_profile: RiskProfile::resolve(&profile),
                        created_at: Utc::now(),
                    },
                    created,
                ))
            })
            .map_err(query_err)?;

        let mut summaries = Vec::new();
        for row in rows {
            let (mut summary, created) = row.map_err(query_err)?;
            summary.created_at = parse_timestamp(&created)?;
            summaries.push(summary);
        }
        Ok(summaries)
    }

    fn delete_plan(&self, id: &str, owner_id: &str) -> Result<(), PropplanError> {
        check_id("plan", id)?;
        let row_owner = self.plan_owner(id)?;
        if row_owner != owner_id {
            return Err(PropplanError::Authorization {
                reason: format!("plan {id} belongs to another owner"),
            });
        }

        let mut conn = self.pool.get().map_err(db_err)?;
        let tx = conn.transaction().map_err(query_err)?;
        tx.execute("DELETE FROM trades WHERE plan_id = ?1", params![id])
            .map_err(query_err)?;
        tx.execute("DELETE FROM plans WHERE id = ?1", params![id])
            .map_err(query_err)?;
        tx.commit().map_err(query_err)?;
        Ok(())
    }
}

impl TradeStorePort for SqliteAdapter {
    fn append_trade(&self, plan_id: &str, new_trade: &NewTrade) -> Result<Trade, PropplanError> {
        check_id("plan", plan_id)?;
        // Surfaces NotFound before the insert can dangle.
        self.plan_owner(plan_id)?;

        let conn = self.pool.get().map_err(db_err)?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO trades (id, plan_id, result, profit_loss, note, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                plan_id,
                new_trade.result.as_str(),
                new_trade.profit_loss,
                new_trade.note,
                now.to_rfc3339(),
            ],
        )
        .map_err(query_err)?;

        Ok(Trade {
            id,
            plan_id: plan_id.to_string(),
            result: new_trade.result,
            profit_loss: new_trade.profit_loss,
            note: new_trade.note.clone(),
            created_at: now,
        })
    }

    fn list_trades(&self, plan_id: &str) -> Result<Vec<Trade>, PropplanError> {
        check_id("plan", plan_id)?;
        let conn = self.pool.get().map_err(db_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, plan_id, result, profit_loss, note, created_at
                 FROM trades WHERE plan_id = ?1 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![plan_id], |row| {
                let result_str: String = row.get(2)?;
                let created: String = row.get(5)?;
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    result_str,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    created,
                ))
            })
            .map_err(query_err)?;

        let mut trades = Vec::new();
        for row in rows {
            let (id, plan_id, result_str, profit_loss, note, created) = row.map_err(query_err)?;
            let result = TradeResult::from_str(&result_str).ok_or_else(|| {
                PropplanError::Database {
                    reason: format!("invalid stored trade result {result_str}"),
                }
            })?;
            trades.push(Trade {
                id,
                plan_id,
                result,
                profit_loss,
                note,
                created_at: parse_timestamp(&created)?,
            });
        }
        Ok(trades)
    }
}
