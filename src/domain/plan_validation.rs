//! Plan field validation.
//!
//! Boundary check run before a plan is saved or used to derive figures that
//! feed a ledger. Rejects the specific bad field; never coerces, except the
//! documented risk-profile fallback which happens upstream at name resolution.

use super::error::PropplanError;
use super::plan::Plan;

pub fn validate_plan(plan: &Plan) -> Result<(), PropplanError> {
    validate_challenge_name(plan)?;
    validate_account_size(plan)?;
    validate_number_of_steps(plan)?;
    validate_profit_target(plan)?;
    validate_min_trading_days(plan)?;
    validate_drawdowns(plan)?;
    Ok(())
}

fn validate_challenge_name(plan: &Plan) -> Result<(), PropplanError> {
    if plan.challenge_name.trim().is_empty() {
        return Err(PropplanError::input(
            "challenge_name",
            "challenge_name must not be empty",
        ));
    }
    Ok(())
}

fn validate_account_size(plan: &Plan) -> Result<(), PropplanError> {
    if !plan.account_size.is_finite() || plan.account_size <= 0.0 {
        return Err(PropplanError::input(
            "account_size",
            "account_size must be positive",
        ));
    }
    Ok(())
}

fn validate_number_of_steps(plan: &Plan) -> Result<(), PropplanError> {
    if plan.number_of_steps < 1 {
        return Err(PropplanError::input(
            "number_of_steps",
            "number_of_steps must be at least 1",
        ));
    }
    Ok(())
}

fn validate_profit_target(plan: &Plan) -> Result<(), PropplanError> {
    if !plan.profit_target_pct.is_finite() || plan.profit_target_pct < 0.0 {
        return Err(PropplanError::input(
            "profit_target_pct",
            "profit_target_pct must be non-negative",
        ));
    }
    Ok(())
}

fn validate_min_trading_days(plan: &Plan) -> Result<(), PropplanError> {
    if plan.min_trading_days < 1 {
        return Err(PropplanError::input(
            "min_trading_days",
            "min_trading_days must be at least 1",
        ));
    }
    Ok(())
}

fn validate_drawdowns(plan: &Plan) -> Result<(), PropplanError> {
    if !plan.daily_drawdown_pct.is_finite() || plan.daily_drawdown_pct < 0.0 {
        return Err(PropplanError::input(
            "daily_drawdown_pct",
            "daily_drawdown_pct must be non-negative",
        ));
    }
    if !plan.overall_drawdown_pct.is_finite() || plan.overall_drawdown_pct < 0.0 {
        return Err(PropplanError::input(
            "overall_drawdown_pct",
            "overall_drawdown_pct must be non-negative",
        ));
    }
    if plan.daily_drawdown_pct > plan.overall_drawdown_pct {
        return Err(PropplanError::input(
            "daily_drawdown_pct",
            "daily_drawdown_pct cannot exceed overall_drawdown_pct",
        ));
    }
    Ok(())
}
