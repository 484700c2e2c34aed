//! In-memory ledger snapshot.
//!
//! Storage adapters load a full [`Ledger`], mutate it here, and write the
//! whole thing back.

use super::error::LedgerError;
use super::lifecycle;
use super::trade::{Status, TradeOutcome, TradeRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<TradeRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TradeRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TradeRecord> {
        self.records.get(index)
    }

    /// Push a validated record and return its ordinal index.
    pub fn append(&mut self, record: TradeRecord) -> Result<usize, LedgerError> {
        record.validate()?;
        self.records.push(record);
        Ok(self.records.len() - 1)
    }

    /// Change the status of the record at `index`. The ledger is left
    /// untouched when the index or the transition is rejected.
    pub fn update_status(
        &mut self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange {
                index: index as i64,
                len,
            })?;

        let mut updated = record.clone();
        lifecycle::apply_transition(&mut updated, index, new_status, result)?;
        *record = updated;
        Ok(())
    }
}

impl From<Vec<TradeRecord>> for Ledger {
    fn from(records: Vec<TradeRecord>) -> Self {
        Self { records }
    }
}

/// Convert a user-supplied ordinal (possibly negative) into a valid index
/// for a ledger of `len` records.
pub fn checked_index(raw: i64, len: usize) -> Result<usize, LedgerError> {
    usize::try_from(raw)
        .ok()
        .filter(|&i| i < len)
        .ok_or(LedgerError::IndexOutOfRange { index: raw, len })
}
