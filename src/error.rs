//! Error types for chronomind

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the chronomind application
#[derive(Debug, Error)]
pub enum ChronoError {
    #[error("Not a chronomind directory: {0}")]
    NotJournalDirectory(PathBuf),

    #[error("Invalid time reference: {0}")]
    InvalidTimeReference(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Journal entry is empty")]
    EmptyEntry,

    #[error("Entries are session-scoped in this journal; '{0}' needs 'chronomind session'")]
    SessionOnlyStorage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("Voice input error: {0}")]
    Voice(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ChronoError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ChronoError::NotJournalDirectory(_) => 2,
            ChronoError::InvalidTimeReference(_) => 3,
            ChronoError::EntryNotFound(_) => 4,
            ChronoError::EmptyEntry => 5,
            ChronoError::SessionOnlyStorage(_) => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            ChronoError::NotJournalDirectory(path) => {
                format!(
                    "Not a chronomind directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'chronomind init' in this directory to create a new journal\n\
                    • Navigate to an existing journal directory\n\
                    • Set CHRONOMIND_ROOT environment variable to your journal path",
                    path.display()
                )
            }
            ChronoError::InvalidTimeReference(ref_str) => {
                format!(
                    "Invalid time reference: '{}'\n\n\
                    Valid time references:\n\
                    • today, yesterday, 3 days ago\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, last friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2024-01-03)\n\n\
                    Examples:\n\
                    chronomind add --date yesterday \"Long walk by the river\"\n\
                    chronomind add --date 2024-01-03 \"Went hiking\"",
                    ref_str
                )
            }
            ChronoError::EntryNotFound(what) => {
                format!(
                    "Entry not found: {}\n\n\
                    Suggestions:\n\
                    • Use 'chronomind timeline' to see entry ids and positions\n\
                    • Positions count from 0 starting at the most recent entry",
                    what
                )
            }
            ChronoError::SessionOnlyStorage(_) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Start an interactive session: chronomind session\n\
                    • Persist entries to disk: chronomind config storage file",
                    self
                )
            }
            ChronoError::Config(msg) => {
                if msg.contains("Invalid storage") {
                    format!(
                        "{}\n\n\
                        Valid storage kinds: file, memory\n\
                        Example: chronomind config storage file",
                        msg
                    )
                } else if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        List every key with: chronomind config --list",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using ChronoError
pub type Result<T> = std::result::Result<T, ChronoError>;
