//! Single-writer wrapper around a ledger backend.
//!
//! Each store operation is a full read-modify-write. Holding the backend
//! behind a mutex makes every call through one `SerializedLedger` finish
//! before the next starts, so concurrent callers in the same process cannot
//! lose each other's updates.

use std::sync::{Mutex, MutexGuard};

use crate::domain::error::LedgerError;
use crate::domain::trade::{Status, TradeOutcome, TradeRecord};
use crate::ports::ledger_port::LedgerPort;

pub struct SerializedLedger<P> {
    inner: Mutex<P>,
}

impl<P: LedgerPort> SerializedLedger<P> {
    pub fn new(backend: P) -> Self {
        Self {
            inner: Mutex::new(backend),
        }
    }

    pub fn into_inner(self) -> Result<P, LedgerError> {
        self.inner.into_inner().map_err(|_| LedgerError::LockPoisoned)
    }

    fn lock(&self) -> Result<MutexGuard<'_, P>, LedgerError> {
        self.inner.lock().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl<P: LedgerPort> LedgerPort for SerializedLedger<P> {
    fn load(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        self.lock()?.load()
    }

    fn append(&self, record: TradeRecord) -> Result<usize, LedgerError> {
        self.lock()?.append(record)
    }

    fn update_status(
        &self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError> {
        self.lock()?.update_status(index, new_status, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
    use crate::domain::trade::Action;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn record(n: u32) -> TradeRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, n % 60)
            .unwrap();
        TradeRecord::open(ts, &format!("trade {n}"), Action::Buy, "note").unwrap()
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let ledger = Arc::new(SerializedLedger::new(CsvLedgerAdapter::new(
            dir.path().join("trades.csv"),
        )));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..5 {
                        ledger.append(record(t * 10 + i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.load().unwrap().len(), 20);
    }

    #[test]
    fn forwards_update_errors() {
        let dir = TempDir::new().unwrap();
        let ledger = SerializedLedger::new(CsvLedgerAdapter::new(dir.path().join("t.csv")));
        ledger.append(record(1)).unwrap();
        assert!(matches!(
            ledger.close(5, TradeOutcome::Successful),
            Err(LedgerError::IndexOutOfRange { index: 5, len: 1 })
        ));
        ledger.close(0, TradeOutcome::Successful).unwrap();
        assert_eq!(ledger.load().unwrap()[0].status, Status::Closed);
    }
}
