//! Report rendering port trait.
//!
//! Rendering is the display boundary: adapters behind this trait are the only
//! place where amounts get rounded for humans.

use crate::domain::error::PropplanError;
use crate::domain::ledger::EquityPoint;
use crate::domain::metrics::PlanMetrics;
use crate::domain::plan::Plan;
use crate::domain::projections::Projections;

pub struct ReportContext<'a> {
    pub plan: &'a Plan,
    pub metrics: &'a PlanMetrics,
    pub projections: &'a Projections,
    pub equity_curve: Option<&'a [EquityPoint]>,
}

pub trait ReportPort {
    fn render(&self, ctx: &ReportContext<'_>) -> Result<String, PropplanError>;
}
