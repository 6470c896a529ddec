use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repeat::RepeatInterval;
use crate::errors::LedgerError;
use crate::utils::dates::{serde_date, serde_opt_date};

/// Partition key for aggregation; recurrence math never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" => Ok(EntryKind::Expense),
            "income" => Ok(EntryKind::Income),
            other => Err(LedgerError::InvalidEntry(format!(
                "unknown entry kind `{other}`"
            ))),
        }
    }
}

/// One recorded expense or income, possibly recurring.
///
/// Entries are validated when built and immutable afterwards, so every entry the
/// recurrence engine sees satisfies `end_date >= start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    id: Uuid,
    name: String,
    amount: Decimal,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    repeat: RepeatInterval,
    kind: EntryKind,
}

impl Entry {
    pub fn new(
        kind: EntryKind,
        name: impl Into<String>,
        amount: Decimal,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        repeat: RepeatInterval,
    ) -> Result<Self, LedgerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidEntry("name must not be empty".into()));
        }
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::InvalidEntry(format!(
                "amount {amount} must not be negative"
            )));
        }
        if let Some(end) = end_date {
            if end < start_date {
                return Err(LedgerError::InvalidEntry(format!(
                    "end date {end} is before start date {start_date}"
                )));
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            amount,
            start_date,
            end_date,
            repeat,
            kind,
        })
    }

    /// A single occurrence on `date`.
    pub fn one_time(
        kind: EntryKind,
        name: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        Self::new(kind, name, amount, date, None, RepeatInterval::ONE_TIME)
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn repeat(&self) -> RepeatInterval {
        self.repeat
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_one_time()
    }
}

/// Wire shape of an entry as the record backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub amount: Decimal,
    #[serde(with = "serde_date")]
    pub start_date: NaiveDate,
    #[serde(
        default,
        with = "serde_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    /// Signed on the wire; a missing or `null` value means one-time.
    #[serde(default)]
    pub repeat: Option<i64>,
    pub category: EntryKind,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = LedgerError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let days = record.repeat.unwrap_or(0);
        if days < 0 {
            return Err(LedgerError::InvalidEntry(format!(
                "repeat interval {days} must not be negative"
            )));
        }
        let repeat = RepeatInterval::from_days(days)
            .map_err(|_| LedgerError::InvalidEntry(format!("repeat interval {days} is too large")))?;
        let entry = Entry::new(
            record.category,
            record.name,
            record.amount,
            record.start_date,
            record.end_date,
            repeat,
        )?;
        Ok(match record.id {
            Some(id) => entry.with_id(id),
            None => entry,
        })
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        Self {
            id: Some(entry.id),
            name: entry.name,
            amount: entry.amount,
            start_date: entry.start_date,
            end_date: entry.end_date,
            repeat: Some(i64::from(entry.repeat.days())),
            category: entry.kind,
        }
    }
}
