//! Journal entries and their identifiers

use crate::error::{ChronoError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier assigned to an entry when it is created.
///
/// Ids are monotonic within a store and never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    pub fn next(self) -> Self {
        EntryId(self.0 + 1)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ChronoError;

    /// Accepts both `12` and `#12`
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u64>()
            .map(EntryId)
            .map_err(|_| ChronoError::EntryNotFound(format!("'{}' is not an entry id", s)))
    }
}

/// One dated piece of free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub text: String,
}

impl JournalEntry {
    /// Build an entry from raw user input; surrounding whitespace is dropped
    /// and blank input is rejected.
    pub fn new(id: EntryId, date: NaiveDate, text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChronoError::EmptyEntry);
        }

        Ok(JournalEntry {
            id,
            date,
            text: text.to_string(),
        })
    }
}

/// Translate a display position (0 = most recently added) into a storage index.
pub fn storage_index_for_display_position(len: usize, position: usize) -> Option<usize> {
    if position >= len {
        None
    } else {
        Some(len - 1 - position)
    }
}

/// Entries in display order, most recently added first.
pub fn display_order(entries: &[JournalEntry]) -> impl Iterator<Item = &JournalEntry> {
    entries.iter().rev()
}
