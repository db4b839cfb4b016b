//! Configuration management

use crate::domain::{SummaryPreset, WeekYear};
use crate::error::{ChronoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the per-journal metadata directory
pub const META_DIR: &str = ".chronomind";

const CONFIG_FILE: &str = "config.toml";

/// Where entries live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Single JSON file in the journal root
    #[default]
    File,
    /// Process memory; entries vanish when the session ends
    Memory,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::File => "file",
            StorageKind::Memory => "memory",
        }
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(format!(
                "Invalid storage: '{}'. Valid storage kinds are: file, memory",
                s
            )),
        }
    }
}

/// Which summarization backend answers `summarize` calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerBackend {
    /// Hosted model behind the Hugging Face inference API
    #[default]
    Huggingface,
    /// Local lead-sentence extraction, no network
    Extractive,
    /// Summaries switched off
    None,
}

impl SummarizerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummarizerBackend::Huggingface => "huggingface",
            SummarizerBackend::Extractive => "extractive",
            SummarizerBackend::None => "none",
        }
    }
}

impl FromStr for SummarizerBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(SummarizerBackend::Huggingface),
            "extractive" => Ok(SummarizerBackend::Extractive),
            "none" | "off" => Ok(SummarizerBackend::None),
            _ => Err(format!(
                "Invalid summarizer backend: '{}'. Valid backends are: huggingface, extractive, none",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerConfig {
    pub backend: SummarizerBackend,
    pub endpoint: String,
    pub model: String,
    pub preset: SummaryPreset,
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        SummarizerConfig {
            backend: SummarizerBackend::Huggingface,
            endpoint: "https://api-inference.huggingface.co".to_string(),
            model: "facebook/bart-base".to_string(),
            preset: SummaryPreset::Adaptive,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// Input device name, empty for the system default
    pub device: String,
    /// Length of one dictated utterance
    pub record_secs: u64,
    pub endpoint: String,
    pub model: String,
    /// ISO-639-1 hint for the recognizer, empty to let it detect
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            device: String::new(),
            record_secs: 5,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
            language: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default = "default_entries_file")]
    pub entries_file: String,
    #[serde(default = "default_export_file")]
    pub export_file: String,
    #[serde(default)]
    pub week_year: WeekYear,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

fn default_entries_file() -> String {
    "entries.json".to_string()
}

fn default_export_file() -> String {
    "weekly_summaries.txt".to_string()
}

impl Config {
    /// Create a new config with default values
    pub fn new(storage: StorageKind) -> Self {
        Config {
            storage,
            entries_file: default_entries_file(),
            export_file: default_export_file(),
            week_year: WeekYear::default(),
            created: Utc::now(),
            summarizer: SummarizerConfig::default(),
            voice: VoiceConfig::default(),
        }
    }

    fn config_path(root: &Path) -> PathBuf {
        root.join(META_DIR).join(CONFIG_FILE)
    }

    /// Load config from .chronomind/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(Self::config_path(path)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ChronoError::NotJournalDirectory(path.to_path_buf())
            } else {
                ChronoError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| ChronoError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .chronomind/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let meta_dir = path.join(META_DIR);
        if !meta_dir.exists() {
            fs::create_dir(&meta_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ChronoError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(Self::config_path(path), contents)?;
        Ok(())
    }

    /// Absolute path of the entries file for a journal rooted at `root`
    pub fn entries_path(&self, root: &Path) -> PathBuf {
        root.join(&self.entries_file)
    }

    /// Absolute path of the export file for a journal rooted at `root`
    pub fn export_path(&self, root: &Path) -> PathBuf {
        root.join(&self.export_file)
    }
}
