//! CSV journal export adapter.
//!
//! Writes the trade journal oldest-first with a running balance column, the
//! same fold the equity curve uses. Amounts are formatted to cents here, at
//! the display boundary.

use crate::domain::error::PropplanError;
use crate::domain::ledger::{equity_curve, Trade};
use std::path::Path;

pub struct CsvJournalAdapter;

impl CsvJournalAdapter {
    pub fn export<P: AsRef<Path>>(
        &self,
        path: P,
        starting_balance: f64,
        trades: &[Trade],
    ) -> Result<(), PropplanError> {
        let content = self.export_string(starting_balance, trades)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn export_string(
        &self,
        starting_balance: f64,
        trades: &[Trade],
    ) -> Result<String, PropplanError> {
        let curve = equity_curve(starting_balance, trades);

        let mut ordered: Vec<&Trade> = trades.iter().collect();
        ordered.sort_by_key(|t| t.created_at);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["seq", "logged_at", "result", "profit_loss", "balance", "note"])
            .map_err(|e| PropplanError::Database {
                reason: format!("CSV write error: {e}"),
            })?;

        for (i, trade) in ordered.iter().enumerate() {
            writer
                .write_record([
                    (i + 1).to_string(),
                    trade.created_at.to_rfc3339(),
                    trade.result.to_string(),
                    format!("{:.2}", trade.profit_loss),
                    format!("{:.2}", curve[i + 1].balance),
                    trade.note.clone(),
                ])
                .map_err(|e| PropplanError::Database {
                    reason: format!("CSV write error: {e}"),
                })?;
        }

        let bytes = writer.into_inner().map_err(|e| PropplanError::Database {
            reason: format!("CSV write error: {e}"),
        })?;
        String::from_utf8(bytes).map_err(|e| PropplanError::Database {
            reason: format!("CSV encoding error: {e}"),
        })
    }
}
