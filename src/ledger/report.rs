use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::recurring::{contribution, occurrences};
use super::{Entry, EntryKind, ReportWindow};

/// One entry with the dates it lands on inside the report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOccurrences {
    pub entry: Entry,
    #[serde(with = "date_list")]
    pub occurrences: Vec<NaiveDate>,
    pub contribution: Decimal,
}

/// Totals and per-entry detail for one side of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindReport {
    pub kind: EntryKind,
    pub total: Decimal,
    pub entries: Vec<EntryOccurrences>,
}

impl KindReport {
    fn empty(kind: EntryKind) -> Self {
        Self {
            kind,
            total: Decimal::ZERO,
            entries: Vec::new(),
        }
    }

    pub fn occurrence_count(&self) -> usize {
        self.entries.iter().map(|item| item.occurrences.len()).sum()
    }
}

/// Expense and income proportions of everything that moved in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub expense_percent: Decimal,
    pub income_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    pub window: ReportWindow,
    pub expense: KindReport,
    pub income: KindReport,
}

impl ReportResult {
    pub fn kind(&self, kind: EntryKind) -> &KindReport {
        match kind {
            EntryKind::Expense => &self.expense,
            EntryKind::Income => &self.income,
        }
    }

    pub fn total(&self, kind: EntryKind) -> Decimal {
        self.kind(kind).total
    }

    /// Income minus expense.
    pub fn net(&self) -> Decimal {
        self.income.total - self.expense.total
    }

    pub fn occurrence_count(&self) -> usize {
        self.expense.occurrence_count() + self.income.occurrence_count()
    }

    /// `None` when nothing was spent or earned in the window, or when the totals are
    /// too large to combine.
    pub fn share(&self) -> Option<Share> {
        let sum = self.expense.total.checked_add(self.income.total)?;
        if sum.is_zero() {
            return None;
        }
        let hundred = Decimal::ONE_HUNDRED;
        let expense_percent = self
            .expense
            .total
            .checked_div(sum)?
            .checked_mul(hundred)?
            .round_dp(2);
        Some(Share {
            expense_percent,
            income_percent: hundred - expense_percent,
        })
    }
}

/// Runs the recurrence engine over every entry and reduces the results per kind.
///
/// Totals come from the closed-form [`contribution`] and saturate at `Decimal::MAX`;
/// the occurrence lists are only there for display. Entries keep their input order
/// and entries without any occurrence are still listed.
pub fn aggregate<'a, I>(entries: I, window: &ReportWindow) -> ReportResult
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut expense = KindReport::empty(EntryKind::Expense);
    let mut income = KindReport::empty(EntryKind::Income);

    for entry in entries {
        let bucket = match entry.kind() {
            EntryKind::Expense => &mut expense,
            EntryKind::Income => &mut income,
        };
        let amount = contribution(entry, window);
        bucket.total = bucket.total.saturating_add(amount);
        bucket.entries.push(EntryOccurrences {
            entry: entry.clone(),
            occurrences: occurrences(entry, window),
            contribution: amount,
        });
    }

    ReportResult {
        window: *window,
        expense,
        income,
    }
}

mod date_list {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::utils::dates::serde_date;

    #[derive(Serialize, Deserialize)]
    struct Day(#[serde(with = "serde_date")] NaiveDate);

    pub fn serialize<S: Serializer>(dates: &[NaiveDate], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(dates.iter().map(|date| Day(*date)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<NaiveDate>, D::Error> {
        let days = Vec::<Day>::deserialize(deserializer)?;
        Ok(days.into_iter().map(|Day(date)| date).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RepeatInterval;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jan() -> ReportWindow {
        ReportWindow::new(date(2024, 1, 1), date(2024, 1, 21)).unwrap()
    }

    fn weekly_rent() -> Entry {
        Entry::new(
            EntryKind::Expense,
            "Rent",
            dec!(100),
            date(2024, 1, 1),
            None,
            RepeatInterval::WEEKLY,
        )
        .unwrap()
    }

    fn daily_tips() -> Entry {
        Entry::new(
            EntryKind::Income,
            "Tips",
            dec!(20),
            date(2024, 1, 1),
            Some(date(2024, 1, 3)),
            RepeatInterval::DAILY,
        )
        .unwrap()
    }

    #[test]
    fn nets_income_against_expense() {
        let entries = vec![weekly_rent(), daily_tips()];
        let report = aggregate(&entries, &jan());
        assert_eq!(report.total(EntryKind::Expense), dec!(300));
        assert_eq!(report.total(EntryKind::Income), dec!(60));
        assert_eq!(report.net(), dec!(-240));
        assert_eq!(report.occurrence_count(), 6);
    }

    #[test]
    fn entries_without_occurrences_are_listed() {
        let future = Entry::one_time(EntryKind::Expense, "Trip", dec!(900), date(2024, 6, 1)).unwrap();
        let entries = vec![weekly_rent(), future.clone()];
        let report = aggregate(&entries, &jan());
        assert_eq!(report.expense.entries.len(), 2);
        let trip = &report.expense.entries[1];
        assert_eq!(trip.entry, future);
        assert!(trip.occurrences.is_empty());
        assert_eq!(trip.contribution, Decimal::ZERO);
        assert_eq!(report.expense.total, dec!(300));
    }

    #[test]
    fn empty_input_has_no_share() {
        let report = aggregate(&Vec::<Entry>::new(), &jan());
        assert_eq!(report.net(), Decimal::ZERO);
        assert!(report.income.entries.is_empty());
        assert_eq!(report.share(), None);
    }

    #[test]
    fn share_splits_totals_into_percentages() {
        let entries = vec![weekly_rent(), daily_tips()];
        let share = aggregate(&entries, &jan()).share().unwrap();
        assert_eq!(share.expense_percent, dec!(83.33));
        assert_eq!(share.income_percent, dec!(16.67));
    }

    fn daily_expense(amount: Decimal) -> Entry {
        Entry::new(
            EntryKind::Expense,
            "Huge",
            amount,
            date(2024, 1, 1),
            None,
            RepeatInterval::DAILY,
        )
        .unwrap()
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let year = ReportWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let amount = Decimal::from_i128_with_scale(10_i128.pow(26), 0);
        let entries = vec![daily_expense(amount), daily_expense(amount), daily_expense(amount)];
        let report = aggregate(&entries, &year);
        assert_eq!(report.expense.total, Decimal::MAX);
        assert_eq!(report.net(), -Decimal::MAX);
        assert_eq!(report.share().unwrap().expense_percent, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn share_handles_totals_beyond_percent_scaling() {
        let ten_days = ReportWindow::new(date(2024, 1, 1), date(2024, 1, 10)).unwrap();
        let amount = Decimal::from_i128_with_scale(10_i128.pow(26), 0);
        let report = aggregate(&[daily_expense(amount)], &ten_days);
        assert_eq!(report.expense.total, amount * Decimal::from(10));
        let share = report.share().unwrap();
        assert_eq!(share.expense_percent, Decimal::ONE_HUNDRED);
        assert_eq!(share.income_percent, Decimal::ZERO);
    }

    #[test]
    fn share_is_none_when_totals_cannot_be_combined() {
        let year = ReportWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let amount = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let income = Entry::new(
            EntryKind::Income,
            "Huge income",
            amount,
            date(2024, 1, 1),
            None,
            RepeatInterval::DAILY,
        )
        .unwrap();
        let report = aggregate(&[daily_expense(amount), income], &year);
        assert_eq!(report.expense.total, Decimal::MAX);
        assert_eq!(report.income.total, Decimal::MAX);
        assert_eq!(report.net(), Decimal::ZERO);
        assert_eq!(report.share(), None);
    }

    #[test]
    fn report_serializes_dates_as_iso_strings() {
        let entries = vec![daily_tips()];
        let json = serde_json::to_value(aggregate(&entries, &jan())).unwrap();
        assert_eq!(
            json["income"]["entries"][0]["occurrences"],
            serde_json::json!(["2024-01-01", "2024-01-02", "2024-01-03"])
        );
        assert_eq!(json["window"]["start"], "2024-01-01");
    }
}
