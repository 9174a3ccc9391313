//! End-to-end tests wiring the domain engine to adapters and mock ports.

mod common;

use common::{FixedIdentity, MockPlanStore, MockTradeStore};
use propplan::adapters::file_config_adapter::FileConfigAdapter;
use propplan::adapters::text_report_adapter::TextReportAdapter;
use propplan::cli::build_plan;
use propplan::domain::error::PropplanError;
use propplan::domain::ledger::{current_balance, equity_curve, TradeResult};
use propplan::domain::metrics::PlanMetrics;
use propplan::domain::plan::{Plan, RiskProfile};
use propplan::domain::plan_validation::validate_plan;
use propplan::domain::projections::Projections;
use propplan::domain::trade_log::TradeLog;
use propplan::ports::identity_port::require_owner;
use propplan::ports::plan_store::PlanStorePort;
use propplan::ports::report_port::{ReportContext, ReportPort};
use propplan::ports::trade_store::TradeStorePort;

mod config_to_report {
    use super::*;

    #[test]
    fn config_file_drives_a_full_report() {
        let config = FileConfigAdapter::from_string(
            r#"
[plan]
challenge_name = FTMO 100k
account_size = 100000
number_of_steps = 2
profit_target_pct = 10
min_trading_days = 5
daily_drawdown_pct = 5
overall_drawdown_pct = 10
risk_profile = Striker
"#,
        )
        .unwrap();

        let plan = build_plan(&config);
        validate_plan(&plan).unwrap();

        let metrics = PlanMetrics::derive(&plan);
        let projections = Projections::derive(&plan, &metrics);

        // Striker on 100k: risk $2000, target $4000, daily limit $5000.
        assert!((metrics.risk_amount - 2000.0).abs() < 1e-9);
        assert!((metrics.target_amount - 4000.0).abs() < 1e-9);
        assert_eq!(projections.max_trades_per_day, Some(2));

        let report = TextReportAdapter
            .render(&ReportContext {
                plan: &plan,
                metrics: &metrics,
                projections: &projections,
                equity_curve: None,
            })
            .unwrap();
        assert!(report.contains("FTMO 100k"));
        assert!(report.contains("Striker"));
        assert!(report.contains("$2000.00"));
    }

    #[test]
    fn invalid_config_is_rejected_before_derivation() {
        let config =
            FileConfigAdapter::from_string("[plan]\naccount_size = -5000\n").unwrap();
        let plan = build_plan(&config);
        let err = validate_plan(&plan).unwrap_err();
        assert!(matches!(err, PropplanError::Input { field, .. } if field == "account_size"));
    }
}

mod journal_flow {
    use super::*;

    fn midfielder_plan() -> (Plan, PlanMetrics) {
        let plan = Plan::default();
        let metrics = PlanMetrics::derive(&plan);
        (plan, metrics)
    }

    #[test]
    fn logged_trades_fold_into_the_worked_equity_curve() {
        let (plan, metrics) = midfielder_plan();
        let store = MockTradeStore::new();

        // WIN, LOSS, WIN at the frozen Midfielder amounts.
        for (result, note) in [
            (TradeResult::Win, ""),
            (TradeResult::Loss, "stopped out on news"),
            (TradeResult::Win, ""),
        ] {
            let mut log = TradeLog::new();
            log.select(result);
            log.set_note(note);
            let new_trade = log.begin_submit(&metrics).unwrap();
            store.append_trade("plan-1", &new_trade).unwrap();
            log.commit();
        }

        let trades = store.list_trades("plan-1").unwrap();
        assert_eq!(trades.len(), 3);
        // Store returns newest first.
        assert!(trades[0].created_at > trades[2].created_at);

        let curve = equity_curve(plan.account_size, &trades);
        let balances: Vec<f64> = curve.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![100_000.0, 102_400.0, 101_200.0, 103_600.0]);

        approx::assert_relative_eq!(
            current_balance(plan.account_size, &trades),
            103_600.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn store_failure_keeps_the_draft_for_retry() {
        let (_, metrics) = midfielder_plan();
        let store = MockTradeStore::new();
        store.fail_next_append();

        let mut log = TradeLog::new();
        log.select(TradeResult::Loss);
        log.set_note("chased the entry");
        let new_trade = log.begin_submit(&metrics).unwrap();

        assert!(store.append_trade("plan-1", &new_trade).is_err());
        log.fail();
        assert_eq!(store.trade_count(), 0);

        // Retry without retyping: the note survived the failure.
        let retried = log.begin_submit(&metrics).unwrap();
        assert_eq!(retried.note, "chased the entry");
        store.append_trade("plan-1", &retried).unwrap();
        log.commit();
        assert_eq!(store.trade_count(), 1);
    }

    #[test]
    fn frozen_amounts_ignore_later_plan_edits() {
        let (mut plan, metrics) = midfielder_plan();
        let store = MockTradeStore::new();

        let mut log = TradeLog::new();
        log.select(TradeResult::Win);
        let new_trade = log.begin_submit(&metrics).unwrap();
        store.append_trade("plan-1", &new_trade).unwrap();
        log.commit();

        // Doubling the account afterwards must not rewrite history.
        plan.account_size *= 2.0;
        let trades = store.list_trades("plan-1").unwrap();
        assert!((trades[0].profit_loss - 2400.0).abs() < 1e-9);
    }
}

mod ownership {
    use super::*;

    #[test]
    fn plans_are_scoped_to_their_owner() {
        let store = MockPlanStore::new();

        let saved = store.save_plan(&Plan::default(), "alice").unwrap();
        let id = saved.id.clone().unwrap();

        let mut bobs = Plan::default();
        bobs.challenge_name = "Bob's 50k".to_string();
        store.save_plan(&bobs, "bob").unwrap();

        let alices = store.list_plans("alice").unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].challenge_name, "My Prop Challenge");

        // Bob cannot delete Alice's plan.
        let err = store.delete_plan(&id, "bob").unwrap_err();
        assert!(matches!(err, PropplanError::Authorization { .. }));
        assert_eq!(store.plan_count(), 2);

        store.delete_plan(&id, "alice").unwrap();
        assert_eq!(store.plan_count(), 1);
    }

    #[test]
    fn update_requires_the_owning_identity() {
        let store = MockPlanStore::new();
        let saved = store.save_plan(&Plan::default(), "alice").unwrap();

        let mut edited = saved.clone();
        edited.challenge_name = "hijacked".to_string();
        let err = store.save_plan(&edited, "mallory").unwrap_err();
        assert!(matches!(err, PropplanError::Authorization { .. }));
    }

    #[test]
    fn anonymous_identity_cannot_mutate() {
        let identity = FixedIdentity::anonymous();
        let err = require_owner(&identity).unwrap_err();
        assert!(matches!(err, PropplanError::Authorization { .. }));

        let identity = FixedIdentity::logged_in("alice");
        assert_eq!(require_owner(&identity).unwrap(), "alice");
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_end_to_end {
    use super::*;
    use propplan::adapters::csv_journal_adapter::CsvJournalAdapter;
    use propplan::adapters::sqlite_adapter::SqliteAdapter;

    #[test]
    fn save_log_and_export_against_a_real_database() {
        let store = SqliteAdapter::in_memory().unwrap();
        store.initialize_schema().unwrap();

        let mut plan = Plan::default();
        plan.risk_profile = RiskProfile::Defender;
        let saved = store.save_plan(&plan, "alice").unwrap();
        let id = saved.id.clone().unwrap();

        let metrics = PlanMetrics::derive(&saved);

        for result in [TradeResult::Win, TradeResult::BreakEven] {
            let mut log = TradeLog::new();
            log.select(result);
            let new_trade = log.begin_submit(&metrics).unwrap();
            store.append_trade(&id, &new_trade).unwrap();
            log.commit();
        }

        let loaded = store.load_plan(&id).unwrap();
        assert_eq!(loaded.risk_profile, RiskProfile::Defender);

        let trades = store.list_trades(&id).unwrap();
        assert_eq!(trades.len(), 2);

        // Defender on 100k wins $1000; the BE trade leaves the balance alone.
        let csv = CsvJournalAdapter
            .export_string(loaded.account_size, &trades)
            .unwrap();
        assert!(csv.contains("WIN,1000.00,101000.00"));
        assert!(csv.contains("BE,0.00,101000.00"));

        let curve = equity_curve(loaded.account_size, &trades);
        let projections = Projections::derive(&loaded, &metrics);
        let report = TextReportAdapter
            .render(&ReportContext {
                plan: &loaded,
                metrics: &metrics,
                projections: &projections,
                equity_curve: Some(&curve),
            })
            .unwrap();
        assert!(report.contains("--- Equity Curve ---"));
        assert!(report.contains("$101000.00"));
    }

    #[test]
    fn journal_of_an_unknown_plan_is_refused() {
        let store = SqliteAdapter::in_memory().unwrap();
        store.initialize_schema().unwrap();

        let metrics = PlanMetrics::derive(&Plan::default());
        let mut log = TradeLog::new();
        log.select(TradeResult::Win);
        let new_trade = log.begin_submit(&metrics).unwrap();

        let missing = "00000000-0000-0000-0000-000000000000";
        let err = store.append_trade(missing, &new_trade).unwrap_err();
        assert!(matches!(err, PropplanError::NotFound { .. }));
    }
}

mod properties {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use propplan::domain::ledger::Trade;

    fn arb_profile() -> impl Strategy<Value = RiskProfile> {
        prop_oneof![
            Just(RiskProfile::Striker),
            Just(RiskProfile::Midfielder),
            Just(RiskProfile::Defender),
        ]
    }

    fn arb_plan() -> impl Strategy<Value = Plan> {
        (1000.0f64..5_000_000.0, 1u32..5, 1.0f64..20.0, arb_profile()).prop_map(
            |(account_size, steps, target, profile)| {
                let mut plan = Plan::default();
                plan.account_size = account_size;
                plan.number_of_steps = steps;
                plan.profit_target_pct = target;
                plan.risk_profile = profile;
                plan
            },
        )
    }

    proptest! {
        #[test]
        fn metrics_are_never_negative(plan in arb_plan()) {
            let metrics = PlanMetrics::derive(&plan);
            prop_assert!(metrics.risk_amount >= 0.0);
            prop_assert!(metrics.target_amount >= 0.0);
            prop_assert!(metrics.expected_step_profit >= 0.0);
            prop_assert!(metrics.max_daily_loss >= 0.0);
            prop_assert!(metrics.max_total_loss >= 0.0);
        }

        #[test]
        fn scenario_wins_and_losses_partition_the_total(plan in arb_plan()) {
            let metrics = PlanMetrics::derive(&plan);
            let projections = Projections::derive(&plan, &metrics);
            if let (Some(scenarios), Some(total)) =
                (&projections.scenarios, projections.total_trades)
            {
                for s in scenarios {
                    prop_assert_eq!(s.wins + s.losses, total);
                }
            }
        }

        #[test]
        fn balance_fold_matches_the_curve_endpoint(
            outcomes in prop::collection::vec(-2000.0f64..2000.0, 0..20)
        ) {
            let base = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();
            let trades: Vec<Trade> = outcomes
                .iter()
                .enumerate()
                .map(|(i, &pl)| Trade {
                    id: format!("t{i}"),
                    plan_id: "p1".to_string(),
                    result: if pl >= 0.0 { TradeResult::Win } else { TradeResult::Loss },
                    profit_loss: pl,
                    note: String::new(),
                    created_at: base + Duration::seconds(i as i64),
                })
                .collect();

            let curve = equity_curve(100_000.0, &trades);
            prop_assert_eq!(curve.len(), trades.len() + 1);
            let last = curve.last().unwrap().balance;
            let folded = current_balance(100_000.0, &trades);
            prop_assert!((last - folded).abs() < 1e-9);
        }
    }
}
