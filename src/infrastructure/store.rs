//! Entry stores: session memory and a flat JSON file

use crate::domain::entry::storage_index_for_display_position;
use crate::domain::{EntryId, JournalEntry};
use crate::error::{ChronoError, Result};
use crate::infrastructure::repository::write_atomic;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ordered collection of journal entries, oldest first
pub trait EntryStore {
    /// Add a new entry dated `date` and return it with its assigned id
    fn append(&mut self, date: NaiveDate, text: &str) -> Result<JournalEntry>;

    /// Remove the entry with `id` and return it
    fn delete(&mut self, id: EntryId) -> Result<JournalEntry>;

    /// All entries in storage order
    fn list(&self) -> &[JournalEntry];

    /// A pending message for the user about something the store swallowed
    fn take_notice(&mut self) -> Option<String> {
        None
    }
}

/// Delete the entry shown at `position` in the timeline (0 = most recent).
pub fn delete_at_display_position<S: EntryStore + ?Sized>(
    store: &mut S,
    position: usize,
) -> Result<JournalEntry> {
    let entries = store.list();
    let index = storage_index_for_display_position(entries.len(), position).ok_or_else(|| {
        ChronoError::EntryNotFound(format!(
            "no entry at position {} (timeline has {})",
            position,
            entries.len()
        ))
    })?;
    let id = entries[index].id;
    store.delete(id)
}

fn not_found(id: EntryId) -> ChronoError {
    ChronoError::EntryNotFound(id.to_string())
}

/// Entries that live as long as the process
#[derive(Debug)]
pub struct MemoryEntryStore {
    entries: Vec<JournalEntry>,
    next_id: EntryId,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        MemoryEntryStore {
            entries: Vec::new(),
            next_id: EntryId(1),
        }
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryEntryStore {
    fn append(&mut self, date: NaiveDate, text: &str) -> Result<JournalEntry> {
        let entry = JournalEntry::new(self.next_id, date, text)?;
        self.next_id = self.next_id.next();
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn delete(&mut self, id: EntryId) -> Result<JournalEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.entries.remove(index))
    }

    fn list(&self) -> &[JournalEntry] {
        &self.entries
    }
}

/// On-disk record; files written before ids existed carry only date and text
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    id: Option<EntryId>,
    date: NaiveDate,
    text: String,
}

/// Entries persisted as one JSON array, rewritten on every mutation
#[derive(Debug)]
pub struct JsonFileEntryStore {
    path: PathBuf,
    entries: Vec<JournalEntry>,
    next_id: EntryId,
    notice: Option<String>,
    unreadable: bool,
}

impl JsonFileEntryStore {
    /// Open the store at `path`.
    ///
    /// Never fails: a missing file is an empty journal, an unreadable one is
    /// reported through `take_notice` and also treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut store = JsonFileEntryStore {
            path,
            entries: Vec::new(),
            next_id: EntryId(1),
            notice: None,
            unreadable: false,
        };

        match Self::load(&store.path) {
            Ok(entries) => {
                debug!(path = %store.path.display(), count = entries.len(), "loaded entries");
                store.next_id = entries
                    .iter()
                    .map(|e| e.id)
                    .max()
                    .map(EntryId::next)
                    .unwrap_or(EntryId(1));
                store.entries = entries;
            }
            Err(e) => {
                warn!(path = %store.path.display(), error = %e, "could not load entries");
                store.notice = Some(format!(
                    "Could not read entries from {}: {}. Starting with an empty journal.",
                    store.path.display(),
                    e
                ));
                store.unreadable = true;
            }
        }

        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Vec<JournalEntry>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ChronoError::Io(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<StoredEntry> = serde_json::from_str(&contents)?;
        Ok(assign_ids(stored))
    }

    fn save(&mut self) -> Result<()> {
        if self.unreadable {
            let backup = self.path.with_extension("json.bak");
            if self.path.exists() {
                fs::copy(&self.path, &backup)?;
                info!(backup = %backup.display(), "kept unreadable entries file");
            }
            self.unreadable = false;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.path, &json)
    }
}

/// Keep persisted ids, give fresh ones to records without an id (or with a
/// duplicate), in file order.
fn assign_ids(stored: Vec<StoredEntry>) -> Vec<JournalEntry> {
    let mut next = stored
        .iter()
        .filter_map(|s| s.id)
        .max()
        .map(EntryId::next)
        .unwrap_or(EntryId(1));
    let mut seen = HashSet::new();

    stored
        .into_iter()
        .map(|s| {
            let id = match s.id {
                Some(id) if seen.insert(id) => id,
                _ => {
                    let id = next;
                    next = next.next();
                    seen.insert(id);
                    id
                }
            };
            JournalEntry {
                id,
                date: s.date,
                text: s.text,
            }
        })
        .collect()
}

impl EntryStore for JsonFileEntryStore {
    fn append(&mut self, date: NaiveDate, text: &str) -> Result<JournalEntry> {
        let entry = JournalEntry::new(self.next_id, date, text)?;
        self.entries.push(entry.clone());

        if let Err(e) = self.save() {
            self.entries.pop();
            return Err(e);
        }

        self.next_id = self.next_id.next();
        Ok(entry)
    }

    fn delete(&mut self, id: EntryId) -> Result<JournalEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = self.entries.remove(index);

        if let Err(e) = self.save() {
            self.entries.insert(index, removed);
            return Err(e);
        }

        Ok(removed)
    }

    fn list(&self) -> &[JournalEntry] {
        &self.entries
    }

    fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
