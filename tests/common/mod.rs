#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use tradeledger::domain::error::LedgerError;
use tradeledger::domain::ledger::Ledger;
use tradeledger::domain::trade::{Action, Status, TradeOutcome, TradeRecord};
use tradeledger::ports::ledger_port::LedgerPort;

/// In-memory ledger backend. Writes can be made to fail to check that
/// callers surface storage errors.
pub struct MockLedgerPort {
    pub ledger: RefCell<Ledger>,
    pub fail_writes: Option<String>,
    pub writes: RefCell<usize>,
}

impl MockLedgerPort {
    pub fn new() -> Self {
        Self {
            ledger: RefCell::new(Ledger::new()),
            fail_writes: None,
            writes: RefCell::new(0),
        }
    }

    pub fn with_records(mut self, records: Vec<TradeRecord>) -> Self {
        self.ledger = RefCell::new(Ledger::from(records));
        self
    }

    pub fn with_write_error(mut self, reason: &str) -> Self {
        self.fail_writes = Some(reason.to_string());
        self
    }

    fn check_write(&self) -> Result<(), LedgerError> {
        if let Some(reason) = &self.fail_writes {
            return Err(LedgerError::Storage {
                path: "<mock>".into(),
                reason: reason.clone(),
            });
        }
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

impl LedgerPort for MockLedgerPort {
    fn load(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        Ok(self.ledger.borrow().records().to_vec())
    }

    fn append(&self, record: TradeRecord) -> Result<usize, LedgerError> {
        let mut next = self.ledger.borrow().clone();
        let index = next.append(record)?;
        self.check_write()?;
        *self.ledger.borrow_mut() = next;
        Ok(index)
    }

    fn update_status(
        &self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError> {
        let mut next = self.ledger.borrow().clone();
        next.update_status(index, new_status, result)?;
        self.check_write()?;
        *self.ledger.borrow_mut() = next;
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(date_str: &str, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

pub fn open_record(date_str: &str, title: &str, action: Action) -> TradeRecord {
    TradeRecord::open(at(date_str, 10, 0, 0), title, action, "rationale").unwrap()
}

pub fn make_record(
    date_str: &str,
    action: Action,
    status: Status,
    result: Option<TradeOutcome>,
) -> TradeRecord {
    TradeRecord {
        timestamp: at(date_str, 10, 0, 0),
        title: format!("{action} trade"),
        action,
        summary: "rationale".into(),
        status,
        result,
    }
}
