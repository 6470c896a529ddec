#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use spendsavvy_core::{
    config::ConfigManager,
    ledger::{Entry, EntryKind, RepeatInterval},
    storage::JsonStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh data directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated store and config manager sharing one data directory.
pub fn setup_test_env() -> (JsonStore, ConfigManager, PathBuf) {
    let base = temp_home();
    let store = JsonStore::new(Some(base.clone())).expect("create json store");
    let config = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (store, config, base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn entry(
    kind: EntryKind,
    name: &str,
    amount: i64,
    start: NaiveDate,
    end: Option<NaiveDate>,
    repeat_days: u32,
) -> Entry {
    Entry::new(
        kind,
        name,
        Decimal::from(amount),
        start,
        end,
        RepeatInterval::every(repeat_days),
    )
    .expect("valid entry")
}
