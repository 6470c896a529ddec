pub mod entry_service;
pub mod report_service;

pub use entry_service::EntryService;
pub use report_service::{ReportService, ReportSession, ReportState};

use crate::errors::{LedgerError, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Invalid(String),
}
