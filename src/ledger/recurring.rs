//! Recurrence expansion: which days an entry lands on inside a report window and
//! what it adds to that window's total.
//!
//! Both [`occurrences`] and [`contribution`] derive from the same first-occurrence
//! computation, so the enumerated list and the closed-form count always agree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Entry, ReportWindow};

/// First occurrence inside the window together with the last day an occurrence may
/// fall on (the earlier of the window end and the entry's end date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    first: NaiveDate,
    last_allowed: NaiveDate,
}

fn effective_end(entry: &Entry, window: &ReportWindow) -> NaiveDate {
    match entry.end_date() {
        Some(end) => end.min(window.end()),
        None => window.end(),
    }
}

fn span_in_window(entry: &Entry, window: &ReportWindow) -> Option<Span> {
    let last_allowed = effective_end(entry, window);
    let start = entry.start_date();
    if start > last_allowed {
        return None;
    }

    let repeat = entry.repeat();
    if repeat.is_one_time() {
        return (start >= window.start()).then_some(Span {
            first: start,
            last_allowed,
        });
    }

    let first = if start >= window.start() {
        start
    } else {
        let gap = (window.start() - start).num_days().unsigned_abs();
        let steps = gap.div_ceil(u64::from(repeat.days()));
        // Unrepresentable dates lie beyond every window.
        repeat.advance(start, steps)?
    };

    (first <= last_allowed).then_some(Span {
        first,
        last_allowed,
    })
}

/// Ordered occurrence dates of `entry` within `window`.
///
/// The list is strictly increasing, never leaves `[window.start, min(window.end,
/// entry.end_date)]`, and for recurring entries consecutive dates are exactly one
/// repeat interval apart.
pub fn occurrences(entry: &Entry, window: &ReportWindow) -> Vec<NaiveDate> {
    let Some(span) = span_in_window(entry, window) else {
        return Vec::new();
    };
    if entry.repeat().is_one_time() {
        return vec![span.first];
    }

    let capacity = usize::try_from(count_in_span(entry, span)).unwrap_or(0);
    let mut dates = Vec::with_capacity(capacity);
    let mut current = Some(span.first);
    while let Some(date) = current.filter(|date| *date <= span.last_allowed) {
        dates.push(date);
        current = entry.repeat().advance(date, 1);
    }
    dates
}

fn count_in_span(entry: &Entry, span: Span) -> u64 {
    if entry.repeat().is_one_time() {
        return 1;
    }
    let spread = (span.last_allowed - span.first).num_days().unsigned_abs();
    1 + spread / u64::from(entry.repeat().days())
}

/// Number of occurrences of `entry` within `window`, computed without enumerating.
pub fn occurrence_count(entry: &Entry, window: &ReportWindow) -> u64 {
    span_in_window(entry, window).map_or(0, |span| count_in_span(entry, span))
}

/// Amount `entry` adds to `window`: its occurrence count times its amount.
pub fn contribution(entry: &Entry, window: &ReportWindow) -> Decimal {
    let count = occurrence_count(entry, window);
    if count == 0 {
        return Decimal::ZERO;
    }
    entry.amount().saturating_mul(Decimal::from(count))
}

/// First occurrence on or after `from`, honouring the entry's end date.
pub fn next_occurrence(entry: &Entry, from: NaiveDate) -> Option<NaiveDate> {
    let window = ReportWindow::new(from, NaiveDate::MAX).ok()?;
    span_in_window(entry, &window).map(|span| span.first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EntryKind, RepeatInterval};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> ReportWindow {
        ReportWindow::new(start, end).unwrap()
    }

    fn entry(
        amount: Decimal,
        start: NaiveDate,
        repeat: u32,
        end: Option<NaiveDate>,
    ) -> Entry {
        Entry::new(
            EntryKind::Expense,
            "Sample",
            amount,
            start,
            end,
            RepeatInterval::every(repeat),
        )
        .unwrap()
    }

    #[test]
    fn weekly_entry_stops_before_window_end() {
        let weekly = entry(dec!(100), date(2024, 1, 1), 7, None);
        let jan = window(date(2024, 1, 1), date(2024, 1, 21));
        assert_eq!(
            occurrences(&weekly, &jan),
            vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
        );
        assert_eq!(contribution(&weekly, &jan), dec!(300));
    }

    #[test]
    fn one_time_entry_after_window_contributes_nothing() {
        let later = entry(dec!(50), date(2024, 2, 10), 0, None);
        let jan = window(date(2024, 1, 1), date(2024, 1, 31));
        assert!(occurrences(&later, &jan).is_empty());
        assert_eq!(contribution(&later, &jan), Decimal::ZERO);
    }

    #[test]
    fn end_date_clamps_daily_entry() {
        let daily = entry(dec!(20), date(2024, 1, 1), 1, Some(date(2024, 1, 5)));
        let jan = window(date(2024, 1, 3), date(2024, 1, 31));
        assert_eq!(
            occurrences(&daily, &jan),
            vec![date(2024, 1, 3), date(2024, 1, 4), date(2024, 1, 5)]
        );
        assert_eq!(contribution(&daily, &jan), dec!(60));
    }

    #[test]
    fn first_occurrence_rounds_up_to_the_next_step() {
        let fortnightly = entry(dec!(10), date(2023, 12, 1), 14, None);
        let jan = window(date(2024, 1, 1), date(2024, 1, 31));
        // Dec 1 + 14k: Dec 15, Dec 29, Jan 12, Jan 26.
        assert_eq!(
            occurrences(&fortnightly, &jan),
            vec![date(2024, 1, 12), date(2024, 1, 26)]
        );
        assert_eq!(occurrence_count(&fortnightly, &jan), 2);
    }

    #[test]
    fn step_landing_exactly_on_window_start_is_kept() {
        let weekly = entry(dec!(1), date(2024, 1, 1), 7, None);
        let from_eighth = window(date(2024, 1, 8), date(2024, 1, 8));
        assert_eq!(occurrences(&weekly, &from_eighth), vec![date(2024, 1, 8)]);
    }

    #[test]
    fn one_time_entry_on_either_bound_is_included() {
        let jan = window(date(2024, 1, 1), date(2024, 1, 31));
        for day in [date(2024, 1, 1), date(2024, 1, 31)] {
            let single = entry(dec!(5), day, 0, None);
            assert_eq!(occurrences(&single, &jan), vec![day]);
        }
        for day in [date(2023, 12, 31), date(2024, 2, 1)] {
            let single = entry(dec!(5), day, 0, None);
            assert!(occurrences(&single, &jan).is_empty());
        }
    }

    #[test]
    fn entry_ending_before_window_is_empty() {
        let ended = entry(dec!(9), date(2023, 1, 1), 1, Some(date(2023, 12, 31)));
        let jan = window(date(2024, 1, 1), date(2024, 1, 31));
        assert!(occurrences(&ended, &jan).is_empty());
        assert_eq!(occurrence_count(&ended, &jan), 0);
    }

    #[test]
    fn next_step_past_end_date_yields_nothing() {
        // Occurrences at Jan 1 and Jan 31; the end date falls between the window
        // start and the next step.
        let monthly = entry(dec!(9), date(2024, 1, 1), 30, Some(date(2024, 1, 20)));
        let window = window(date(2024, 1, 2), date(2024, 3, 1));
        assert!(occurrences(&monthly, &window).is_empty());
        assert_eq!(contribution(&monthly, &window), Decimal::ZERO);
    }

    #[test]
    fn huge_interval_near_calendar_limit_is_total() {
        let rare = entry(dec!(1), date(2024, 1, 1), u32::MAX, None);
        let far = window(date(2024, 1, 2), NaiveDate::MAX);
        assert!(occurrences(&rare, &far).is_empty());
        assert_eq!(occurrence_count(&rare, &far), 0);
    }

    #[test]
    fn next_occurrence_respects_end_date() {
        let weekly = entry(dec!(1), date(2024, 1, 1), 7, Some(date(2024, 1, 20)));
        assert_eq!(
            next_occurrence(&weekly, date(2024, 1, 9)),
            Some(date(2024, 1, 15))
        );
        assert_eq!(next_occurrence(&weekly, date(2024, 1, 16)), None);
        assert_eq!(
            next_occurrence(&weekly, date(2023, 6, 1)),
            Some(date(2024, 1, 1))
        );
    }
}
