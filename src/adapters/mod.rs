//! Concrete adapter implementations for ports.

#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;

pub mod file_config_adapter;
pub mod static_identity_adapter;
pub mod text_report_adapter;
pub mod csv_journal_adapter;
