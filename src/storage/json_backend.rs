use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    core::utils::{canonical_name, ensure_dir, write_atomic, PathResolver},
    errors::LedgerError,
    ledger::{Entry, RepeatInterval},
};

use super::{RecordStore, Result, StoredEntry};

pub const RECORD_SCHEMA_VERSION: u32 = 1;
const USER_HASH_LEN: usize = 12;

/// Stores each user's entries in `<root>/records/<user>-<hash>.json`.
///
/// Clones share one write lock, so read-modify-write cycles never interleave
/// within a process.
#[derive(Debug, Clone)]
pub struct JsonStore {
    records_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

/// How the `repeat` field of each stored entry is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatEncoding {
    /// Interval in days.
    #[default]
    Days,
    /// Position of the form label (`0..=4`), as written by the early add form.
    LegacyIndex,
}

#[derive(Serialize)]
struct UserFile<'a> {
    schema_version: u32,
    repeat_encoding: RepeatEncoding,
    entries: &'a [StoredEntry],
}

#[derive(Deserialize)]
struct RawUserFile {
    #[serde(default)]
    schema_version: u32,
    #[serde(default)]
    repeat_encoding: RepeatEncoding,
    #[serde(default)]
    entries: Vec<serde_json::Value>,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        let records_dir = PathResolver::records_dir_in(&base);
        ensure_dir(&records_dir)?;
        Ok(Self {
            records_dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn user_path(&self, user_id: &str) -> PathBuf {
        self.records_dir.join(format!("{}.json", user_file_stem(user_id)))
    }

    fn read_user(&self, user_id: &str) -> Result<Vec<StoredEntry>> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_records_from_path(&path)
    }

    fn write_user(&self, user_id: &str, records: &[StoredEntry]) -> Result<()> {
        let path = self.user_path(user_id);
        save_records_to_path(records, &path)?;
        debug!(user = user_id, count = records.len(), path = %path.display(), "records saved");
        Ok(())
    }
}

impl RecordStore for JsonStore {
    fn records(&self, user_id: &str) -> Result<Vec<StoredEntry>> {
        self.read_user(user_id)
    }

    fn insert(&self, user_id: &str, entry: Entry) -> Result<Uuid> {
        let id = entry.id();
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read_user(user_id)?;
        match records.iter_mut().find(|record| record.id() == id) {
            Some(existing) => existing.entry = entry,
            None => records.push(StoredEntry::new(entry)),
        }
        self.write_user(user_id, &records)?;
        Ok(id)
    }

    fn remove(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read_user(user_id)?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_user(user_id, &records)?;
        Ok(true)
    }
}

/// Readable stem plus a digest of the raw id, so ids that sanitize alike still get
/// separate files.
pub fn user_file_stem(user_id: &str) -> String {
    let digest = hex::encode(Sha256::digest(user_id.as_bytes()));
    format!(
        "{}-{}",
        canonical_name(user_id, "default"),
        &digest[..USER_HASH_LEN]
    )
}

pub fn save_records_to_path(records: &[StoredEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&UserFile {
        schema_version: RECORD_SCHEMA_VERSION,
        repeat_encoding: RepeatEncoding::Days,
        entries: records,
    })?;
    write_atomic(path, &json)?;
    Ok(())
}

/// Loads a record file. Records that fail validation are logged and skipped.
pub fn load_records_from_path(path: &Path) -> Result<Vec<StoredEntry>> {
    let data = fs::read_to_string(path)?;
    let raw: RawUserFile = serde_json::from_str(&data)?;
    if raw.schema_version > RECORD_SCHEMA_VERSION {
        warn!(
            path = %path.display(),
            version = raw.schema_version,
            "record file is from a newer schema version"
        );
    }
    let mut records = Vec::with_capacity(raw.entries.len());
    let encoding = raw.repeat_encoding;
    for (index, mut value) in raw.entries.into_iter().enumerate() {
        if encoding == RepeatEncoding::LegacyIndex {
            if let Err(err) = decode_legacy_repeat(&mut value) {
                warn!(path = %path.display(), index, error = %err, "skipping invalid record");
                continue;
            }
        }
        match serde_json::from_value::<StoredEntry>(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(path = %path.display(), index, error = %err, "skipping invalid record"),
        }
    }
    Ok(records)
}

/// Rewrites a legacy `repeat` index in place as a day count.
fn decode_legacy_repeat(value: &mut serde_json::Value) -> std::result::Result<(), LedgerError> {
    let Some(repeat) = value.get_mut("entry").and_then(|entry| entry.get_mut("repeat")) else {
        return Ok(());
    };
    if repeat.is_null() {
        return Ok(());
    }
    let index = repeat
        .as_u64()
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| LedgerError::InvalidRepeat(format!("legacy index {repeat}")))?;
    *repeat = serde_json::Value::from(RepeatInterval::from_legacy_index(index)?.days());
    Ok(())
}
