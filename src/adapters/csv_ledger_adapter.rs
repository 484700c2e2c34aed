//! CSV file ledger adapter.
//!
//! The ledger lives in a single flat table with a header row. Every mutation
//! reloads the whole file, applies the change in memory and replaces the file.

use super::csv_file;
use crate::domain::error::LedgerError;
use crate::domain::ledger::Ledger;
use crate::domain::trade::{COLUMNS, Status, TradeOutcome, TradeRecord};
use crate::ports::ledger_port::LedgerPort;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvLedgerAdapter {
    path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_ledger(&self) -> Result<Ledger, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "ledger file absent, starting empty");
                return Ok(Ledger::new());
            }
            Err(e) => return Err(LedgerError::storage(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Ledger::new());
        }

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| LedgerError::storage(&self.path, format!("CSV header error: {e}")))?
            .clone();
        let positions = self.column_positions(&headers)?;

        let mut records = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let fields = result.map_err(|e| LedgerError::malformed(row, format!("CSV parse error: {e}")))?;
            let field = |col: usize| fields.get(positions[col]).unwrap_or("");
            records.push(TradeRecord::from_fields(
                row,
                field(0),
                field(1),
                field(2),
                field(3),
                field(4),
                field(5),
            )?);
        }

        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded ledger");
        Ok(Ledger::from(records))
    }

    /// Locate each canonical column in the header. Names match
    /// case-insensitively and `date` is accepted for `timestamp`.
    fn column_positions(&self, headers: &StringRecord) -> Result<[usize; 6], LedgerError> {
        let mut positions = [0usize; 6];
        for (slot, column) in COLUMNS.iter().enumerate() {
            let found = headers.iter().position(|h| {
                let h = h.trim();
                h.eq_ignore_ascii_case(column) || (*column == "timestamp" && h.eq_ignore_ascii_case("date"))
            });
            positions[slot] = found.ok_or_else(|| {
                LedgerError::storage(&self.path, format!("missing column '{column}' in header"))
            })?;
        }
        Ok(positions)
    }

    fn write_ledger(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        csv_file::write_atomically(
            &self.path,
            &COLUMNS,
            ledger.records().iter().map(TradeRecord::to_row),
        )
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn load(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        Ok(self.read_ledger()?.into_records())
    }

    fn append(&self, record: TradeRecord) -> Result<usize, LedgerError> {
        let mut ledger = self.read_ledger()?;
        let index = ledger.append(record).inspect_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "append rejected");
        })?;
        self.write_ledger(&ledger)?;
        tracing::info!(path = %self.path.display(), index, "appended trade");
        Ok(index)
    }

    fn update_status(
        &self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError> {
        let mut ledger = self.read_ledger()?;
        if let Err(e) = ledger.update_status(index, new_status, result) {
            tracing::warn!(path = %self.path.display(), index, error = %e, "status update rejected");
            return Err(e);
        }
        self.write_ledger(&ledger)?;
        tracing::info!(path = %self.path.display(), index, status = %new_status, "updated trade status");
        Ok(())
    }
}
