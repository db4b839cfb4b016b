//! Domain layer - Entries, weeks and summary rules

pub mod date_ref;
pub mod entry;
pub mod summary;
pub mod week;

pub use date_ref::DateRef;
pub use entry::{EntryId, JournalEntry};
pub use summary::{SummaryParams, SummaryPreset, WeeklySummary};
pub use week::{group_by_week, week_label, WeekBucket, WeekYear};
