//! Ledger storage port trait.

use crate::domain::error::LedgerError;
use crate::domain::trade::{Status, TradeOutcome, TradeRecord};

/// Durable storage for the trade ledger. Every call works on the full,
/// freshly loaded ledger.
pub trait LedgerPort {
    /// Read the whole ledger in append order. Missing storage is an empty
    /// ledger, not an error.
    fn load(&self) -> Result<Vec<TradeRecord>, LedgerError>;

    /// Validate and store `record` at the end of the ledger, returning its
    /// ordinal index. An invalid record is rejected before anything is written.
    fn append(&self, record: TradeRecord) -> Result<usize, LedgerError>;

    /// Change the status of the record at `index`, validated against the
    /// current length. `result` is only written when supplied.
    fn update_status(
        &self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError>;

    fn close(&self, index: usize, result: TradeOutcome) -> Result<(), LedgerError> {
        self.update_status(index, Status::Closed, Some(result))
    }
}

impl<T: LedgerPort + ?Sized> LedgerPort for Box<T> {
    fn load(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        (**self).load()
    }

    fn append(&self, record: TradeRecord) -> Result<usize, LedgerError> {
        (**self).append(record)
    }

    fn update_status(
        &self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError> {
        (**self).update_status(index, new_status, result)
    }
}
