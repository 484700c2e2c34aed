//! Ledger analytics: action mix, status mix, trade frequency and success rate.
//!
//! Every function here is a pure view over a ledger snapshot and is
//! recomputed in full on each call.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use super::lifecycle::awaiting_result;
use super::trade::{Action, Status, TradeOutcome, TradeRecord};

pub const NO_TRADES: &str = "No trades logged yet.";
pub const NO_CLOSED_TRADES: &str = "No closed trades to calculate success rate.";
pub const NO_RESULTS: &str = "No results recorded yet.";

/// Record counts per label, largest first, zero counts omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown<K> {
    pub entries: Vec<(K, usize)>,
}

impl<K: Copy + Ord> Breakdown<K> {
    fn from_keys(keys: impl Iterator<Item = K>) -> Self {
        let mut counts: BTreeMap<K, usize> = BTreeMap::new();
        for key in keys {
            *counts.entry(key).or_default() += 1;
        }
        let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn count(&self, key: K) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Percentage share of each entry, in entry order.
    pub fn shares(&self) -> Vec<(K, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|&(k, n)| (k, n as f64 / total as f64 * 100.0))
            .collect()
    }
}

pub fn action_mix(records: &[TradeRecord]) -> Breakdown<Action> {
    Breakdown::from_keys(records.iter().map(|r| r.action))
}

pub fn status_mix(records: &[TradeRecord]) -> Breakdown<Status> {
    Breakdown::from_keys(records.iter().map(|r| r.status))
}

/// Trades per calendar date, ascending. Dates without trades are absent.
pub fn trade_frequency(records: &[TradeRecord]) -> Vec<(NaiveDate, usize)> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.timestamp.date()).or_default() += 1;
    }
    per_day.into_iter().collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuccessRate {
    /// No closed trade with a recorded result.
    NotApplicable,
    Percent(f64),
}

impl SuccessRate {
    pub fn percent(self) -> Option<f64> {
        match self {
            SuccessRate::Percent(p) => Some(p),
            SuccessRate::NotApplicable => None,
        }
    }
}

impl fmt::Display for SuccessRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessRate::NotApplicable => f.write_str("n/a"),
            SuccessRate::Percent(p) => write!(f, "{p:.1}%"),
        }
    }
}

/// Share of closed trades marked successful. Closed trades still awaiting a
/// result count toward neither side.
pub fn success_rate(records: &[TradeRecord]) -> SuccessRate {
    let mut decided = 0usize;
    let mut successful = 0usize;
    for record in records.iter().filter(|r| r.status == Status::Closed) {
        match record.result {
            Some(TradeOutcome::Successful) => {
                decided += 1;
                successful += 1;
            }
            Some(TradeOutcome::Unsuccessful) => decided += 1,
            None => {}
        }
    }

    if decided == 0 {
        SuccessRate::NotApplicable
    } else {
        SuccessRate::Percent(successful as f64 / decided as f64 * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub awaiting_result: usize,
    pub action_mix: Breakdown<Action>,
    pub status_mix: Breakdown<Status>,
    pub frequency: Vec<(NaiveDate, usize)>,
    pub success_rate: SuccessRate,
}

impl LedgerSummary {
    pub fn compute(records: &[TradeRecord]) -> Self {
        let status_mix = status_mix(records);
        LedgerSummary {
            total_trades: records.len(),
            open_trades: status_mix.count(Status::Open),
            closed_trades: status_mix.count(Status::Closed),
            awaiting_result: records.iter().filter(|r| awaiting_result(r)).count(),
            action_mix: action_mix(records),
            status_mix,
            frequency: trade_frequency(records),
            success_rate: success_rate(records),
        }
    }

    /// Why the success rate is not applicable, or `None` when it is.
    pub fn success_rate_note(&self) -> Option<&'static str> {
        match self.success_rate {
            SuccessRate::Percent(_) => None,
            SuccessRate::NotApplicable if self.closed_trades == 0 => Some(NO_CLOSED_TRADES),
            SuccessRate::NotApplicable => Some(NO_RESULTS),
        }
    }
}
