use std::fmt::Write as _;
use std::io::IsTerminal;

use colored::{Color, Colorize};

use crate::{
    config::Config,
    core::services::entry_service::EntryListing,
    currency::format_amount,
    ledger::{Entry, EntryKind, KindReport, ReportResult},
    utils::dates::format_date,
};

const SEPARATOR: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    pub use_color: bool,
}

impl OutputStyle {
    /// Colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self {
            use_color: std::io::stdout().is_terminal() && !no_color,
        }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        let line = format!("=== {} ===", text.trim());
        if self.use_color {
            line.bold().to_string()
        } else {
            line
        }
    }
}

fn repeat_label(entry: &Entry) -> String {
    if entry.is_recurring() {
        entry.repeat().label()
    } else {
        "One-time".to_string()
    }
}

fn kind_color(kind: EntryKind) -> Color {
    match kind {
        EntryKind::Expense => Color::Red,
        EntryKind::Income => Color::Green,
    }
}

pub fn render_report(report: &ReportResult, config: &Config, style: &OutputStyle) -> String {
    let money = |value| format_amount(value, &config.currency, &config.format);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        style.header(&format!(
            "Report {} to {}",
            format_date(report.window.start()),
            format_date(report.window.end())
        ))
    );
    let _ = writeln!(
        out,
        "Total Expenses: {}",
        style.paint(&money(report.expense.total), kind_color(EntryKind::Expense))
    );
    let _ = writeln!(
        out,
        "Total Income:   {}",
        style.paint(&money(report.income.total), kind_color(EntryKind::Income))
    );
    let _ = writeln!(out, "Net:            {}", money(report.net()));
    match report.share() {
        Some(share) => {
            let _ = writeln!(
                out,
                "Share:          {}% expense / {}% income",
                share.expense_percent, share.income_percent
            );
        }
        None => {
            let _ = writeln!(out, "Share:          no data available");
        }
    }
    for kind in [EntryKind::Expense, EntryKind::Income] {
        out.push_str(&render_kind(report.kind(kind), config, style));
    }
    out
}

fn render_kind(section: &KindReport, config: &Config, style: &OutputStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{SEPARATOR}");
    let _ = writeln!(
        out,
        "{}",
        style.paint(&format!("{} entries", section.kind), kind_color(section.kind))
    );
    if section.entries.is_empty() {
        let _ = writeln!(out, "  (none)");
        return out;
    }
    for item in &section.entries {
        let entry = &item.entry;
        let _ = writeln!(
            out,
            "  {} | {} x {} = {} | repeat: {}",
            entry.name(),
            format_amount(entry.amount(), &config.currency, &config.format),
            item.occurrences.len(),
            format_amount(item.contribution, &config.currency, &config.format),
            repeat_label(entry)
        );
        if item.occurrences.is_empty() {
            let _ = writeln!(out, "    no occurrences in range");
        } else {
            let dates: Vec<String> = item.occurrences.iter().map(|d| format_date(*d)).collect();
            let _ = writeln!(out, "    {}", dates.join(", "));
        }
    }
    out
}

pub fn render_listing(listings: &[EntryListing], config: &Config, style: &OutputStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style.header("Entries"));
    if listings.is_empty() {
        let _ = writeln!(out, "No entries recorded.");
        return out;
    }
    for listing in listings {
        let entry = &listing.record.entry;
        let until = entry
            .end_date()
            .map(|end| format!(" until {}", format_date(end)))
            .unwrap_or_default();
        let next_due = listing
            .next_due
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{} {} {} {} from {}{} | repeat: {} | next: {}",
            listing.record.id(),
            style.paint(&format!("{:<7}", entry.kind().label()), kind_color(entry.kind())),
            entry.name(),
            format_amount(entry.amount(), &config.currency, &config.format),
            format_date(entry.start_date()),
            until,
            repeat_label(entry),
            next_due
        );
    }
    out
}
