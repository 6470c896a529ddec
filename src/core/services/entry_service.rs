//! Business logic helpers for recording and removing entries.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{next_occurrence, Entry};
use crate::storage::{RecordStore, StoredEntry};

/// A stored entry together with the next day it falls due.
#[derive(Debug, Clone)]
pub struct EntryListing {
    pub record: StoredEntry,
    pub next_due: Option<NaiveDate>,
}

pub struct EntryService;

impl EntryService {
    /// Records a new entry and returns its identifier.
    pub fn add(store: &dyn RecordStore, user_id: &str, entry: Entry) -> ServiceResult<Uuid> {
        let kind = entry.kind();
        let id = store.insert(user_id, entry)?;
        info!(user = user_id, %id, %kind, "entry recorded");
        Ok(id)
    }

    /// Removes the entry identified by `id`.
    pub fn remove(store: &dyn RecordStore, user_id: &str, id: Uuid) -> ServiceResult<()> {
        if !store.remove(user_id, id)? {
            return Err(ServiceError::Invalid(format!("Entry {id} not found")));
        }
        info!(user = user_id, %id, "entry removed");
        Ok(())
    }

    /// Entries newest first, each with its next occurrence on or after `today`.
    pub fn list(
        store: &dyn RecordStore,
        user_id: &str,
        today: NaiveDate,
    ) -> ServiceResult<Vec<EntryListing>> {
        let records = store.list(user_id)?;
        Ok(records
            .into_iter()
            .map(|record| EntryListing {
                next_due: next_occurrence(&record.entry, today),
                record,
            })
            .collect())
    }
}
