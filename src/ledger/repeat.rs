use std::{fmt, str::FromStr};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Labels offered by the entry forms, with the day counts they stand for.
const LABELLED_INTERVALS: [(&str, u32); 5] = [
    ("No", 0),
    ("Daily", 1),
    ("Weekly", 7),
    ("Bi-Weekly", 14),
    ("Monthly", 30),
];

/// Number of days between two occurrences of an entry. Zero means one-time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RepeatInterval(u32);

impl RepeatInterval {
    pub const ONE_TIME: RepeatInterval = RepeatInterval(0);
    pub const DAILY: RepeatInterval = RepeatInterval(1);
    pub const WEEKLY: RepeatInterval = RepeatInterval(7);
    pub const BIWEEKLY: RepeatInterval = RepeatInterval(14);
    pub const MONTHLY: RepeatInterval = RepeatInterval(30);

    pub const fn every(days: u32) -> Self {
        Self(days)
    }

    /// Accepts a signed day count as stored by the record backend.
    pub fn from_days(days: i64) -> Result<Self, LedgerError> {
        u32::try_from(days)
            .map(Self)
            .map_err(|_| LedgerError::InvalidRepeat(days.to_string()))
    }

    /// Maps the early form encoding, which stored the position of the selected
    /// label (`No`, `Daily`, `Weekly`, `Bi-Weekly`, `Monthly`) instead of days.
    pub fn from_legacy_index(index: u8) -> Result<Self, LedgerError> {
        LABELLED_INTERVALS
            .get(usize::from(index))
            .map(|(_, days)| Self(*days))
            .ok_or_else(|| LedgerError::InvalidRepeat(format!("legacy index {index}")))
    }

    /// Resolves one of the form labels, ignoring case and the hyphen in `Bi-Weekly`.
    pub fn from_label(label: &str) -> Result<Self, LedgerError> {
        let wanted = normalize_label(label);
        LABELLED_INTERVALS
            .iter()
            .find(|(name, _)| normalize_label(name) == wanted)
            .map(|(_, days)| Self(*days))
            .ok_or_else(|| LedgerError::InvalidRepeat(label.to_string()))
    }

    pub fn days(&self) -> u32 {
        self.0
    }

    pub fn is_one_time(&self) -> bool {
        self.0 == 0
    }

    pub fn label(&self) -> String {
        match LABELLED_INTERVALS.iter().find(|(_, days)| *days == self.0) {
            Some((name, _)) => (*name).to_string(),
            None => format!("Every {} days", self.0),
        }
    }

    /// Date `steps` intervals after `from`, or `None` past chrono's calendar range.
    pub fn advance(&self, from: NaiveDate, steps: u64) -> Option<NaiveDate> {
        let offset = u64::from(self.0).checked_mul(steps)?;
        from.checked_add_days(Days::new(offset))
    }
}

impl fmt::Display for RepeatInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for RepeatInterval {
    type Err = LedgerError;

    /// Parses either a plain day count (`"7"`) or a form label (`"Weekly"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
            let days: i64 = trimmed
                .parse()
                .map_err(|_| LedgerError::InvalidRepeat(s.to_string()))?;
            return Self::from_days(days);
        }
        Self::from_label(trimmed)
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
