//! Position lifecycle: Open → Closed, with an optional recorded outcome.
//!
//! Every ledger backend routes status changes through [`apply_transition`]
//! so the rules hold no matter where the ledger is stored.

use super::error::LedgerError;
use super::trade::{Status, TradeOutcome, TradeRecord};

/// Apply a status change to the record at ordinal `index`.
///
/// - `Closed` is terminal: moving back to `Open` is rejected.
/// - A result may only accompany `Closed`.
/// - When closing, the result is overwritten only if one is supplied.
pub fn apply_transition(
    record: &mut TradeRecord,
    index: usize,
    new_status: Status,
    result: Option<TradeOutcome>,
) -> Result<(), LedgerError> {
    match (record.status, new_status) {
        (Status::Closed, Status::Open) => Err(LedgerError::InvalidTransition {
            index,
            reason: "a closed trade cannot be reopened".into(),
        }),
        (_, Status::Open) if result.is_some() => Err(LedgerError::InvalidTransition {
            index,
            reason: "a result can only be recorded when closing".into(),
        }),
        (_, Status::Open) => Ok(()),
        (_, Status::Closed) => {
            record.status = Status::Closed;
            if let Some(outcome) = result {
                record.result = Some(outcome);
            }
            Ok(())
        }
    }
}

/// Closed but still waiting for its outcome to be recorded.
pub fn awaiting_result(record: &TradeRecord) -> bool {
    record.status == Status::Closed && record.result.is_none()
}
