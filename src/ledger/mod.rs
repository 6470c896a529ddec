//! Entry model, report windows, recurrence expansion, and report aggregation.

pub mod entry;
pub mod recurring;
pub mod repeat;
pub mod report;
pub mod window;

pub use entry::{Entry, EntryKind, EntryRecord};
pub use recurring::{contribution, next_occurrence, occurrence_count, occurrences};
pub use repeat::RepeatInterval;
pub use report::{aggregate, EntryOccurrences, KindReport, ReportResult, Share};
pub use window::ReportWindow;
