//! Config management use case

use crate::domain::{SummaryPreset, WeekYear};
use crate::error::{ChronoError, Result};
use crate::infrastructure::{Config, FileSystemRepository, JournalRepository, StorageKind, SummarizerBackend};
use std::str::FromStr;

/// Every key `config` understands, in display order
pub const CONFIG_KEYS: [&str; 16] = [
    "storage",
    "entries_file",
    "export_file",
    "week_year",
    "created",
    "summarizer.backend",
    "summarizer.endpoint",
    "summarizer.model",
    "summarizer.preset",
    "summarizer.timeout_secs",
    "voice.device",
    "voice.record_secs",
    "voice.endpoint",
    "voice.model",
    "voice.language",
    "voice.timeout_secs",
];

fn unknown_key(key: &str) -> ChronoError {
    ChronoError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ChronoError::Config(format!(
            "Invalid value for {}: '{}'. Expected a positive number of seconds",
            key, value
        ))),
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ChronoError::Config(format!("{} cannot be empty", key)));
    }
    Ok(value.to_string())
}

/// Read a key from an in-memory config
pub fn config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "storage" => config.storage.as_str().to_string(),
        "entries_file" => config.entries_file.clone(),
        "export_file" => config.export_file.clone(),
        "week_year" => config.week_year.as_str().to_string(),
        "created" => config.created.to_rfc3339(),
        "summarizer.backend" => config.summarizer.backend.as_str().to_string(),
        "summarizer.endpoint" => config.summarizer.endpoint.clone(),
        "summarizer.model" => config.summarizer.model.clone(),
        "summarizer.preset" => config.summarizer.preset.as_str().to_string(),
        "summarizer.timeout_secs" => config.summarizer.timeout_secs.to_string(),
        "voice.device" => config.voice.device.clone(),
        "voice.record_secs" => config.voice.record_secs.to_string(),
        "voice.endpoint" => config.voice.endpoint.clone(),
        "voice.model" => config.voice.model.clone(),
        "voice.language" => config.voice.language.clone(),
        "voice.timeout_secs" => config.voice.timeout_secs.to_string(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

/// Service for managing journal configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        config_value(&self.repository.load_config()?, key)
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "storage" => {
                config.storage = StorageKind::from_str(value).map_err(ChronoError::Config)?;
            }
            "entries_file" => config.entries_file = non_empty(key, value)?,
            "export_file" => config.export_file = non_empty(key, value)?,
            "week_year" => {
                config.week_year = WeekYear::from_str(value).map_err(ChronoError::Config)?;
            }
            "created" => {
                return Err(ChronoError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            "summarizer.backend" => {
                config.summarizer.backend =
                    SummarizerBackend::from_str(value).map_err(ChronoError::Config)?;
            }
            "summarizer.endpoint" => config.summarizer.endpoint = non_empty(key, value)?,
            "summarizer.model" => config.summarizer.model = non_empty(key, value)?,
            "summarizer.preset" => {
                config.summarizer.preset =
                    SummaryPreset::from_str(value).map_err(ChronoError::Config)?;
            }
            "summarizer.timeout_secs" => config.summarizer.timeout_secs = parse_secs(key, value)?,
            "voice.device" => config.voice.device = value.trim().to_string(),
            "voice.record_secs" => config.voice.record_secs = parse_secs(key, value)?,
            "voice.endpoint" => config.voice.endpoint = non_empty(key, value)?,
            "voice.model" => config.voice.model = non_empty(key, value)?,
            "voice.language" => config.voice.language = value.trim().to_string(),
            "voice.timeout_secs" => config.voice.timeout_secs = parse_secs(key, value)?,
            _ => return Err(unknown_key(key)),
        }

        self.repository.save_config(&config)?;
        Ok(())
    }

    /// All keys with their current values
    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        let config = self.repository.load_config()?;
        CONFIG_KEYS
            .iter()
            .map(|key| config_value(&config, key).map(|value| (*key, value)))
            .collect()
    }
}
