use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use uuid::Uuid;

use super::{RecordStore, Result, StoredEntry};
use crate::ledger::Entry;

/// Process-local store used by tests and embedders that bring their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, Vec<StoredEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store with already-recorded entries.
    pub fn with_records(user_id: &str, records: Vec<StoredEntry>) -> Self {
        let store = Self::new();
        store
            .users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), records);
        store
    }
}

impl RecordStore for MemoryStore {
    fn records(&self, user_id: &str) -> Result<Vec<StoredEntry>> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(user_id).cloned().unwrap_or_default())
    }

    fn insert(&self, user_id: &str, entry: Entry) -> Result<Uuid> {
        let id = entry.id();
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let records = users.entry(user_id.to_string()).or_default();
        match records.iter_mut().find(|record| record.id() == id) {
            Some(existing) => existing.entry = entry,
            None => records.push(StoredEntry::new(entry)),
        }
        Ok(id)
    }

    fn remove(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let Some(records) = users.get_mut(user_id) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EntryKind, ReportWindow, RepeatInterval};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_applies_the_backend_date_filter() {
        let store = MemoryStore::new();
        let ended = Entry::new(
            EntryKind::Expense,
            "Old plan",
            dec!(10),
            date(2023, 1, 1),
            Some(date(2023, 12, 31)),
            RepeatInterval::MONTHLY,
        )
        .unwrap();
        let future = Entry::one_time(EntryKind::Income, "Refund", dec!(5), date(2024, 3, 1)).unwrap();
        let current = Entry::new(
            EntryKind::Income,
            "Salary",
            dec!(2000),
            date(2023, 6, 1),
            None,
            RepeatInterval::BIWEEKLY,
        )
        .unwrap();
        for entry in [ended, future, current.clone()] {
            store.insert("alice", entry).unwrap();
        }

        let window = ReportWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let set = store.fetch("alice", &window).unwrap();
        assert!(set.expenses.is_empty());
        assert_eq!(set.income, vec![current]);
    }

    #[test]
    fn users_are_isolated() {
        let store = MemoryStore::new();
        let entry = Entry::one_time(EntryKind::Expense, "Lunch", dec!(12), date(2024, 1, 2)).unwrap();
        let id = store.insert("alice", entry).unwrap();
        assert!(store.records("bob").unwrap().is_empty());
        assert!(!store.remove("bob", id).unwrap());
        assert!(store.remove("alice", id).unwrap());
        assert!(store.records("alice").unwrap().is_empty());
    }

    #[test]
    fn insert_with_existing_id_replaces_record() {
        let store = MemoryStore::new();
        let first = Entry::one_time(EntryKind::Expense, "Lunch", dec!(12), date(2024, 1, 2)).unwrap();
        let id = store.insert("alice", first).unwrap();
        let edited = Entry::one_time(EntryKind::Expense, "Lunch", dec!(15), date(2024, 1, 2))
            .unwrap()
            .with_id(id);
        store.insert("alice", edited).unwrap();
        let records = store.records("alice").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entry.amount(), dec!(15));
    }
}
