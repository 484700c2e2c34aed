//! Report generation port trait.

use crate::domain::error::LedgerError;
use crate::domain::trade::TradeRecord;

/// Port for writing ledger dashboards.
pub trait ReportPort {
    fn write(&self, records: &[TradeRecord], output_path: &str) -> Result<(), LedgerError>;
}
