//! Port traits implemented by adapters.

pub mod config_port;
pub mod plan_store;
pub mod trade_store;
pub mod identity_port;
pub mod report_port;
