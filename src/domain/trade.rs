//! Trade record data model.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

use super::error::{LedgerError, ParseLabelError};

/// Persisted timestamp format, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Canonical ledger columns, in storage order.
pub const COLUMNS: [&str; 6] = ["timestamp", "title", "action", "summary", "status", "result"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Buy, Action::Sell];

    pub fn label(self) -> &'static str {
        match self {
            Action::Buy => "Buy",
            Action::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Open, Status::Closed];

    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TradeOutcome {
    Successful,
    Unsuccessful,
}

impl TradeOutcome {
    pub const ALL: [TradeOutcome; 2] = [TradeOutcome::Successful, TradeOutcome::Unsuccessful];

    pub fn label(self) -> &'static str {
        match self {
            TradeOutcome::Successful => "Successful",
            TradeOutcome::Unsuccessful => "Unsuccessful",
        }
    }
}

/// Match `value` against each variant's label. Stored data must use the exact
/// canonical label; user input is trimmed and matched case-insensitively.
pub(crate) fn parse_label<T: Copy>(
    all: &[T],
    label: impl Fn(T) -> &'static str,
    field: &'static str,
    expected: &'static str,
    value: &str,
    strict: bool,
) -> Result<T, ParseLabelError> {
    let found = if strict {
        all.iter().copied().find(|v| value == label(*v))
    } else {
        let trimmed = value.trim();
        all.iter()
            .copied()
            .find(|v| trimmed.eq_ignore_ascii_case(label(*v)))
    };
    found.ok_or_else(|| ParseLabelError::new(field, value, expected))
}

impl Action {
    /// Exact canonical label, as written to storage.
    pub fn from_label(s: &str) -> Result<Self, ParseLabelError> {
        parse_label(&Action::ALL, Action::label, "action", "Buy, Sell", s, true)
    }
}

impl Status {
    pub fn from_label(s: &str) -> Result<Self, ParseLabelError> {
        parse_label(&Status::ALL, Status::label, "status", "Open, Closed", s, true)
    }
}

impl TradeOutcome {
    pub fn from_label(s: &str) -> Result<Self, ParseLabelError> {
        parse_label(
            &TradeOutcome::ALL,
            TradeOutcome::label,
            "result",
            "Successful, Unsuccessful",
            s,
            true,
        )
    }
}

impl FromStr for Action {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Action::ALL, Action::label, "action", "Buy, Sell", s, false)
    }
}

impl FromStr for Status {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Status::ALL, Status::label, "status", "Open, Closed", s, false)
    }
}

impl FromStr for TradeOutcome {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(
            &TradeOutcome::ALL,
            TradeOutcome::label,
            "result",
            "Successful, Unsuccessful",
            s,
            false,
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One logged trading decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    pub timestamp: NaiveDateTime,
    pub title: String,
    pub action: Action,
    pub summary: String,
    pub status: Status,
    pub result: Option<TradeOutcome>,
}

impl TradeRecord {
    /// Build a freshly opened record. Title and summary must be non-blank;
    /// the timestamp is truncated to whole seconds so it survives storage.
    pub fn open(
        timestamp: NaiveDateTime,
        title: &str,
        action: Action,
        summary: &str,
    ) -> Result<Self, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyField { field: "title" });
        }
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(LedgerError::EmptyField { field: "summary" });
        }

        Ok(Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            title: title.to_string(),
            action,
            summary: summary.to_string(),
            status: Status::Open,
            result: None,
        })
    }

    /// Check the invariants every stored record must satisfy: non-blank
    /// title and summary, whole-second timestamp, no result while open.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.title.trim().is_empty() {
            return Err(LedgerError::EmptyField { field: "title" });
        }
        if self.summary.trim().is_empty() {
            return Err(LedgerError::EmptyField { field: "summary" });
        }
        if self.timestamp.nanosecond() != 0 {
            return Err(LedgerError::InvalidInput {
                field: "timestamp",
                reason: format!(
                    "{} has sub-second precision, which storage cannot keep",
                    self.timestamp
                ),
            });
        }
        if self.status == Status::Open && self.result.is_some() {
            return Err(LedgerError::InvalidInput {
                field: "result",
                reason: "an open record cannot carry a result".into(),
            });
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == Status::Closed
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Field values in [`COLUMNS`] order, as written to storage.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.formatted_timestamp(),
            self.title.clone(),
            self.action.label().to_string(),
            self.summary.clone(),
            self.status.label().to_string(),
            self.result.map(|r| r.label().to_string()).unwrap_or_default(),
        ]
    }

    /// Rebuild a record from stored field values. `row` is the 0-based
    /// ordinal used in error messages.
    pub fn from_fields(
        row: usize,
        timestamp: &str,
        title: &str,
        action: &str,
        summary: &str,
        status: &str,
        result: &str,
    ) -> Result<Self, LedgerError> {
        let timestamp = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| {
                LedgerError::malformed(row, format!("invalid timestamp '{timestamp}': {e}"))
            })?;
        let action =
            Action::from_label(action).map_err(|e| LedgerError::malformed(row, e.to_string()))?;
        let status =
            Status::from_label(status).map_err(|e| LedgerError::malformed(row, e.to_string()))?;
        let result = if result.is_empty() {
            None
        } else {
            Some(
                TradeOutcome::from_label(result)
                    .map_err(|e| LedgerError::malformed(row, e.to_string()))?,
            )
        };

        let record = Self {
            timestamp,
            title: title.to_string(),
            action,
            summary: summary.to_string(),
            status,
            result,
        };
        record
            .validate()
            .map_err(|e| LedgerError::malformed(row, e.to_string()))?;
        Ok(record)
    }
}
