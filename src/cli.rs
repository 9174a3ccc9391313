//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::error::PropplanError;
use crate::domain::metrics::PlanMetrics;
use crate::domain::plan::{Plan, RiskProfile};
use crate::domain::plan_validation::validate_plan;
use crate::domain::projections::Projections;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{ReportContext, ReportPort};

#[derive(Parser, Debug)]
#[command(name = "propplan", about = "Prop-firm challenge risk planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive risk figures and projections for a plan config
    Derive {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a plan configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Save a new plan (or update one with --id)
    Save {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// List saved plans for an owner
    List {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Show a saved plan with its journal and equity curve
    Show {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: String,
    },
    /// Delete a saved plan and its journal
    Delete {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Log a trade outcome against a saved plan
    Log {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: String,
        /// win, loss, or be
        #[arg(long)]
        result: String,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Export a plan's journal to CSV
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Derive { config, output } => run_derive(&config, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Save { config, id, owner } => run_save(&config, id.as_deref(), owner.as_deref()),
        Command::List { config, owner } => run_list(&config, owner.as_deref()),
        Command::Show { config, id } => run_show(&config, &id),
        Command::Delete { config, id, owner } => run_delete(&config, &id, owner.as_deref()),
        Command::Log {
            config,
            id,
            result,
            note,
            owner,
        } => run_log(&config, &id, &result, note.as_deref(), owner.as_deref()),
        Command::Export { config, id, output } => run_export(&config, &id, &output),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PropplanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build a plan from the `[plan]` section, falling back to the builder
/// defaults for absent keys. An unknown risk profile resolves to Midfielder,
/// the documented fallback.
pub fn build_plan(config: &dyn ConfigPort) -> Plan {
    let defaults = Plan::default();

    let risk_profile = match config.get_string("plan", "risk_profile") {
        Some(name) => RiskProfile::resolve(&name),
        None => defaults.risk_profile,
    };

    Plan {
        id: None,
        owner_id: None,
        challenge_name: config
            .get_string("plan", "challenge_name")
            .unwrap_or(defaults.challenge_name),
        account_size: config.get_double("plan", "account_size", defaults.account_size),
        number_of_steps: config.get_int(
            "plan",
            "number_of_steps",
            defaults.number_of_steps as i64,
        ) as u32,
        profit_target_pct: config.get_double(
            "plan",
            "profit_target_pct",
            defaults.profit_target_pct,
        ),
        min_trading_days: config.get_int(
            "plan",
            "min_trading_days",
            defaults.min_trading_days as i64,
        ) as u32,
        daily_drawdown_pct: config.get_double(
            "plan",
            "daily_drawdown_pct",
            defaults.daily_drawdown_pct,
        ),
        overall_drawdown_pct: config.get_double(
            "plan",
            "overall_drawdown_pct",
            defaults.overall_drawdown_pct,
        ),
        consistency_rule: config
            .get_string("plan", "consistency_rule")
            .unwrap_or(defaults.consistency_rule),
        risk_profile,
        notes: config.get_string("plan", "notes").unwrap_or(defaults.notes),
        created_at: None,
        updated_at: None,
    }
}

fn run_derive(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let plan = build_plan(&adapter);
    if let Err(e) = validate_plan(&plan) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let metrics = PlanMetrics::derive(&plan);
    let projections = Projections::derive(&plan, &metrics);

    let report = match TextReportAdapter.render(&ReportContext {
        plan: &plan,
        metrics: &metrics,
        projections: &projections,
        equity_curve: None,
    }) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match output_path {
        Some(path) => match fs::write(path, &report) {
            Ok(()) => {
                eprintln!("Report written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                ExitCode::from(1)
            }
        },
        None => {
            print!("{report}");
            ExitCode::SUCCESS
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating plan: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let plan = build_plan(&adapter);
    match validate_plan(&plan) {
        Ok(()) => {
            eprintln!("Plan configuration is valid.");
            eprintln!("  name:     {}", plan.challenge_name);
            eprintln!("  account:  {}", plan.account_size);
            eprintln!("  profile:  {}", plan.risk_profile);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_save(config_path: &PathBuf, id: Option<&str>, owner: Option<&str>) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        use crate::adapters::static_identity_adapter::StaticIdentityAdapter;
        use crate::ports::identity_port::require_owner;
        use crate::ports::plan_store::PlanStorePort;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let identity = StaticIdentityAdapter::from_sources(owner, &config);
        let owner_id = match require_owner(&identity) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let mut plan = build_plan(&config);
        plan.id = id.map(str::to_string);
        if let Err(e) = validate_plan(&plan) {
            eprintln!("error: {e}");
            return (&e).into();
        }

        let store = match SqliteAdapter::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        if let Err(e) = store.initialize_schema() {
            eprintln!("error: {e}");
            return (&e).into();
        }

        match store.save_plan(&plan, &owner_id) {
            Ok(saved) => {
                eprintln!("Plan saved: {}", saved.challenge_name);
                println!("{}", saved.id.unwrap_or_default());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, id, owner);
        eprintln!("error: sqlite feature is required for save");
        ExitCode::from(1)
    }
}

fn run_list(config_path: &PathBuf, owner: Option<&str>) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        use crate::adapters::static_identity_adapter::StaticIdentityAdapter;
        use crate::ports::identity_port::require_owner;
        use crate::ports::plan_store::PlanStorePort;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let identity = StaticIdentityAdapter::from_sources(owner, &config);
        let owner_id = match require_owner(&identity) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let store = match open_store(&config) {
            Ok(s) => s,
            Err(code) => return code,
        };

        match store.list_plans(&owner_id) {
            Ok(summaries) => {
                if summaries.is_empty() {
                    eprintln!("No plans found for {owner_id}");
                } else {
                    for s in &summaries {
                        println!(
                            "{}  {}  {}  ${:.0}  {}",
                            s.id,
                            s.created_at.format("%Y-%m-%d"),
                            s.risk_profile,
                            s.account_size,
                            s.challenge_name,
                        );
                    }
                    eprintln!("{} plan(s) found", summaries.len());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, owner);
        eprintln!("error: sqlite feature is required for list");
        ExitCode::from(1)
    }
}

fn run_show(config_path: &PathBuf, id: &str) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::domain::ledger::{current_balance, equity_curve};
        use crate::ports::plan_store::PlanStorePort;
        use crate::ports::trade_store::TradeStorePort;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        let store = match open_store(&config) {
            Ok(s) => s,
            Err(code) => return code,
        };

        let plan = match store.load_plan(id) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let trades = match store.list_trades(id) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let metrics = PlanMetrics::derive(&plan);
        let projections = Projections::derive(&plan, &metrics);
        let curve = equity_curve(plan.account_size, &trades);

        let report = match TextReportAdapter.render(&ReportContext {
            plan: &plan,
            metrics: &metrics,
            projections: &projections,
            equity_curve: Some(&curve),
        }) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        print!("{report}");
        println!(
            "\n{} trade(s) logged, current balance ${:.2}",
            trades.len(),
            current_balance(plan.account_size, &trades)
        );
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, id);
        eprintln!("error: sqlite feature is required for show");
        ExitCode::from(1)
    }
}

fn run_delete(config_path: &PathBuf, id: &str, owner: Option<&str>) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::static_identity_adapter::StaticIdentityAdapter;
        use crate::ports::identity_port::require_owner;
        use crate::ports::plan_store::PlanStorePort;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let identity = StaticIdentityAdapter::from_sources(owner, &config);
        let owner_id = match require_owner(&identity) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let store = match open_store(&config) {
            Ok(s) => s,
            Err(code) => return code,
        };

        match store.delete_plan(id, &owner_id) {
            Ok(()) => {
                eprintln!("Plan {id} deleted");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, id, owner);
        eprintln!("error: sqlite feature is required for delete");
        ExitCode::from(1)
    }
}

fn run_log(
    config_path: &PathBuf,
    id: &str,
    result: &str,
    note: Option<&str>,
    owner: Option<&str>,
) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::static_identity_adapter::StaticIdentityAdapter;
        use crate::domain::ledger::TradeResult;
        use crate::domain::trade_log::TradeLog;
        use crate::ports::identity_port::require_owner;
        use crate::ports::plan_store::PlanStorePort;
        use crate::ports::trade_store::TradeStorePort;

        let parsed_result = match result.to_lowercase().as_str() {
            "win" => TradeResult::Win,
            "loss" => TradeResult::Loss,
            "be" | "break-even" | "breakeven" => TradeResult::BreakEven,
            other => {
                let err = PropplanError::input(
                    "result",
                    &format!("expected win, loss or be, got {other}"),
                );
                eprintln!("error: {err}");
                return (&err).into();
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let identity = StaticIdentityAdapter::from_sources(owner, &config);
        if let Err(e) = require_owner(&identity) {
            eprintln!("error: {e}");
            return (&e).into();
        }

        let store = match open_store(&config) {
            Ok(s) => s,
            Err(code) => return code,
        };

        let plan = match store.load_plan(id) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        // The metrics snapshot at this moment freezes the trade's P/L.
        let metrics = PlanMetrics::derive(&plan);

        let mut log = TradeLog::new();
        log.select(parsed_result);
        if let Some(text) = note {
            log.set_note(text);
        }

        let new_trade = match log.begin_submit(&metrics) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        match store.append_trade(id, &new_trade) {
            Ok(trade) => {
                log.commit();
                eprintln!(
                    "Logged {} for {}: {}{:.2}",
                    trade.result,
                    plan.challenge_name,
                    if trade.profit_loss >= 0.0 { "+" } else { "" },
                    trade.profit_loss,
                );
                println!("{}", trade.id);
                ExitCode::SUCCESS
            }
            Err(e) => {
                // Draft (note included) survives for a retry.
                log.fail();
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, id, result, note, owner);
        eprintln!("error: sqlite feature is required for log");
        ExitCode::from(1)
    }
}

fn run_export(config_path: &PathBuf, id: &str, output: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::csv_journal_adapter::CsvJournalAdapter;
        use crate::ports::plan_store::PlanStorePort;
        use crate::ports::trade_store::TradeStorePort;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        let store = match open_store(&config) {
            Ok(s) => s,
            Err(code) => return code,
        };

        let plan = match store.load_plan(id) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let trades = match store.list_trades(id) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        match CsvJournalAdapter.export(output, plan.account_size, &trades) {
            Ok(()) => {
                eprintln!(
                    "Journal exported to {} ({} trades)",
                    output.display(),
                    trades.len()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, id, output);
        eprintln!("error: sqlite feature is required for export");
        ExitCode::from(1)
    }
}

#[cfg(feature = "sqlite")]
fn open_store(
    config: &dyn ConfigPort,
) -> Result<crate::adapters::sqlite_adapter::SqliteAdapter, ExitCode> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let store = SqliteAdapter::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    store.initialize_schema().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(store)
}
