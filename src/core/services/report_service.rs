//! Report orchestration: fetch entries from a store, aggregate them, and track the
//! state a report screen is in while that happens.

use std::fmt::Display;

use tracing::{info, warn};

use crate::ledger::{aggregate, ReportResult, ReportWindow};
use crate::storage::{EntrySet, RecordStore};

use super::ServiceResult;

pub struct ReportService;

impl ReportService {
    /// Fetches `user_id`'s entries for `window` and aggregates them.
    pub fn build(
        store: &dyn RecordStore,
        user_id: &str,
        window: &ReportWindow,
    ) -> ServiceResult<ReportResult> {
        let entries = store.fetch(user_id, window)?;
        let report = Self::from_entries(&entries, window);
        info!(
            user = user_id,
            start = %window.start(),
            end = %window.end(),
            entries = entries.len(),
            expense = %report.expense.total,
            income = %report.income.total,
            "report built"
        );
        Ok(report)
    }

    pub fn from_entries(entries: &EntrySet, window: &ReportWindow) -> ReportResult {
        aggregate(entries.iter(), window)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReportState {
    #[default]
    Idle,
    Loading(ReportWindow),
    Ready(ReportResult),
    Error(String),
}

/// Explicit state machine for a report view: `Idle → Loading → Ready | Error`.
///
/// Only the most recent request is tracked; data or failures arriving for any other
/// window are ignored.
#[derive(Debug, Default)]
pub struct ReportSession {
    state: ReportState,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn report(&self) -> Option<&ReportResult> {
        match &self.state {
            ReportState::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ReportState::Loading(_))
    }

    /// Starts a request for `window`, superseding whatever was shown before.
    pub fn begin(&mut self, window: ReportWindow) {
        self.state = ReportState::Loading(window);
    }

    /// Aggregates `entries` if they answer the pending request. Returns whether the
    /// session moved to `Ready`.
    pub fn complete(&mut self, window: &ReportWindow, entries: &EntrySet) -> bool {
        if !self.is_pending(window) {
            return false;
        }
        self.state = ReportState::Ready(ReportService::from_entries(entries, window));
        true
    }

    /// Records a failed fetch for the pending request. Returns whether the session
    /// moved to `Error`.
    pub fn fail(&mut self, window: &ReportWindow, error: impl Display) -> bool {
        if !self.is_pending(window) {
            return false;
        }
        let message = error.to_string();
        warn!(start = %window.start(), end = %window.end(), error = %message, "report failed");
        self.state = ReportState::Error(message);
        true
    }

    pub fn reset(&mut self) {
        self.state = ReportState::Idle;
    }

    /// Runs a whole request synchronously against `store`.
    pub fn load(
        &mut self,
        store: &dyn RecordStore,
        user_id: &str,
        window: ReportWindow,
    ) -> &ReportState {
        self.begin(window);
        match store.fetch(user_id, &window) {
            Ok(entries) => self.complete(&window, &entries),
            Err(err) => self.fail(&window, err),
        };
        &self.state
    }

    fn is_pending(&self, window: &ReportWindow) -> bool {
        matches!(&self.state, ReportState::Loading(pending) if pending == window)
    }
}
