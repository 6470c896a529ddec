use chrono::NaiveDate;
use thiserror::Error;

/// Validation failures raised while building entries, windows, and repeat intervals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("Invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid repeat interval `{0}`")]
    InvalidRepeat(String),
}

/// Error type that captures record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Record not found: {0}")]
    NotFound(String),
}
