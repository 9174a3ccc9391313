//! Trade storage port trait.

use crate::domain::error::PropplanError;
use crate::domain::ledger::{NewTrade, Trade};

pub trait TradeStorePort {
    /// Append an immutable trade; assigns id and creation timestamp.
    fn append_trade(&self, plan_id: &str, new_trade: &NewTrade) -> Result<Trade, PropplanError>;

    /// Newest first, the display order. Equity folding re-sorts oldest first.
    fn list_trades(&self, plan_id: &str) -> Result<Vec<Trade>, PropplanError>;
}
