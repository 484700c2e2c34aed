//! Domain error types.

/// An unrecognised label for one of the ledger's enum fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} label '{value}' (expected one of: {expected})")]
pub struct ParseLabelError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseLabelError {
    pub fn new(field: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Top-level error type for tradeledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("storage error at {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("index {index} is out of range for a ledger of {len} records")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("invalid transition for record {index}: {reason}")]
    InvalidTransition { index: usize, reason: String },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("ledger lock poisoned by a panicked writer")]
    LockPoisoned,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Label(#[from] ParseLabelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub(crate) fn storage(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        LedgerError::Storage {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        LedgerError::MalformedRecord {
            row,
            reason: reason.into(),
        }
    }
}

impl From<&LedgerError> for std::process::ExitCode {
    fn from(err: &LedgerError) -> Self {
        let code: u8 = match err {
            LedgerError::Io(_) => 1,
            LedgerError::ConfigParse { .. }
            | LedgerError::ConfigMissing { .. }
            | LedgerError::ConfigInvalid { .. } => 2,
            LedgerError::Storage { .. }
            | LedgerError::Database { .. }
            | LedgerError::DatabaseQuery { .. }
            | LedgerError::LockPoisoned => 3,
            LedgerError::IndexOutOfRange { .. }
            | LedgerError::InvalidTransition { .. }
            | LedgerError::EmptyField { .. }
            | LedgerError::InvalidInput { .. }
            | LedgerError::Label(_) => 4,
            LedgerError::MalformedRecord { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
