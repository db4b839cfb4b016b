//! Journal use cases: adding, deleting, listing and grouping entries

use crate::domain::entry::display_order;
use crate::domain::{group_by_week, EntryId, JournalEntry, WeekBucket};
use crate::error::{ChronoError, Result};
use crate::infrastructure::{
    Config, EntryStore, FileSystemRepository, JournalRepository, JsonFileEntryStore,
    MemoryEntryStore, StorageKind,
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// An opened journal: its configuration plus the entry store it selects
pub struct Journal {
    root: PathBuf,
    config: Config,
    storage: StorageKind,
    store: Box<dyn EntryStore>,
}

impl Journal {
    /// Open the journal with the storage kind from its configuration
    pub fn open(repository: &FileSystemRepository) -> Result<Self> {
        let config = repository.load_config()?;
        let storage = config.storage;
        Ok(Self::with_storage(repository.root(), config, storage))
    }

    /// Open for a one-shot command; session-scoped journals cannot serve those
    /// because their entries would be gone before the next command.
    pub fn open_for_command(repository: &FileSystemRepository, command: &str) -> Result<Self> {
        let journal = Self::open(repository)?;
        if journal.storage == StorageKind::Memory {
            return Err(ChronoError::SessionOnlyStorage(command.to_string()));
        }
        Ok(journal)
    }

    /// Build a journal over an explicit storage kind
    pub fn with_storage(root: &Path, config: Config, storage: StorageKind) -> Self {
        let store: Box<dyn EntryStore> = match storage {
            StorageKind::File => Box::new(JsonFileEntryStore::open(config.entries_path(root))),
            StorageKind::Memory => Box::new(MemoryEntryStore::new()),
        };

        Journal {
            root: root.to_path_buf(),
            config,
            storage,
            store,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Default location of the summary export
    pub fn export_path(&self) -> PathBuf {
        self.config.export_path(&self.root)
    }

    pub fn add(&mut self, date: NaiveDate, text: &str) -> Result<JournalEntry> {
        let entry = self.store.append(date, text)?;
        info!(id = %entry.id, date = %entry.date, "entry added");
        Ok(entry)
    }

    pub fn delete(&mut self, id: EntryId) -> Result<JournalEntry> {
        let entry = self.store.delete(id)?;
        info!(id = %entry.id, "entry deleted");
        Ok(entry)
    }

    /// Delete the entry at a timeline position (0 = most recent)
    pub fn delete_at_position(&mut self, position: usize) -> Result<JournalEntry> {
        let entry = crate::infrastructure::store::delete_at_display_position(
            self.store.as_mut(),
            position,
        )?;
        info!(id = %entry.id, position, "entry deleted by position");
        Ok(entry)
    }

    /// Entries in storage order
    pub fn entries(&self) -> &[JournalEntry] {
        self.store.list()
    }

    /// Entries in display order, most recent first
    pub fn timeline(&self) -> Vec<&JournalEntry> {
        display_order(self.store.list()).collect()
    }

    /// Week buckets under the configured week-year policy
    pub fn weeks(&self) -> Vec<WeekBucket> {
        group_by_week(self.store.list(), self.config.week_year)
    }

    /// A message the store wants shown to the user, if any
    pub fn take_notice(&mut self) -> Option<String> {
        self.store.take_notice()
    }
}
