use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::utils::dates::{parse_date, serde_date};

/// Closed `[start, end]` interval of calendar days a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct ReportWindow {
    #[serde(with = "serde_date")]
    start: NaiveDate,
    #[serde(with = "serde_date")]
    end: NaiveDate,
}

impl ReportWindow {
    /// Builds a window, rejecting reversed bounds instead of swapping them.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a window from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, LedgerError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Window of `days` calendar days ending on (and including) `end`.
    pub fn ending_on(end: NaiveDate, days: u32) -> Result<Self, LedgerError> {
        let span = u64::from(days.max(1) - 1);
        let start = end
            .checked_sub_days(chrono::Days::new(span))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both bounds included.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }
}

#[derive(Deserialize)]
struct WindowBounds {
    #[serde(with = "serde_date")]
    start: NaiveDate,
    #[serde(with = "serde_date")]
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for ReportWindow {
    type Error = LedgerError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        ReportWindow::new(bounds.start, bounds.end)
    }
}
