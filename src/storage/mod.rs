pub mod json_backend;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::StoreError,
    ledger::{Entry, EntryKind, ReportWindow},
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// An entry as held by a record store, with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub created_at: DateTime<Utc>,
    pub entry: Entry,
}

impl StoredEntry {
    pub fn new(entry: Entry) -> Self {
        Self {
            created_at: Utc::now(),
            entry,
        }
    }

    pub fn id(&self) -> Uuid {
        self.entry.id()
    }
}

/// Expense and income collections returned by a date-range query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrySet {
    pub expenses: Vec<Entry>,
    pub income: Vec<Entry>,
}

impl EntrySet {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut set = EntrySet::default();
        for entry in entries {
            match entry.kind() {
                EntryKind::Expense => set.expenses.push(entry),
                EntryKind::Income => set.income.push(entry),
            }
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.expenses.iter().chain(self.income.iter())
    }

    pub fn len(&self) -> usize {
        self.expenses.len() + self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether an entry can have occurrences in `window`: it starts no later than the
/// window end and has not ended before the window start.
pub fn overlaps_window(entry: &Entry, window: &ReportWindow) -> bool {
    entry.start_date() <= window.end()
        && entry.end_date().map_or(true, |end| end >= window.start())
}

/// Abstraction over backends that hold a user's recorded entries.
pub trait RecordStore: Send + Sync {
    /// All records for `user_id` in the order they were inserted.
    fn records(&self, user_id: &str) -> Result<Vec<StoredEntry>>;

    /// Stores `entry`, replacing any record with the same id.
    fn insert(&self, user_id: &str, entry: Entry) -> Result<Uuid>;

    /// Deletes the record with `id`, returning whether one existed.
    fn remove(&self, user_id: &str, id: Uuid) -> Result<bool>;

    /// Records newest first.
    fn list(&self, user_id: &str) -> Result<Vec<StoredEntry>> {
        let mut records = self.records(user_id)?;
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Entries that may contribute to `window`, split into expenses and income.
    fn fetch(&self, user_id: &str, window: &ReportWindow) -> Result<EntrySet> {
        let records = self.records(user_id)?;
        Ok(EntrySet::from_entries(
            records
                .into_iter()
                .map(|record| record.entry)
                .filter(|entry| overlaps_window(entry, window)),
        ))
    }
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
