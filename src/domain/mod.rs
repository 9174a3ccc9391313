//! Core domain types and logic.

pub mod plan;
pub mod plan_validation;
pub mod metrics;
pub mod projections;
pub mod ledger;
pub mod trade_log;
pub mod error;
