//! Journal root discovery and file helpers

use crate::error::{ChronoError, Result};
use crate::infrastructure::config::{Config, META_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that pins the journal root
pub const ROOT_ENV: &str = "CHRONOMIND_ROOT";

/// Abstract repository for journal metadata
pub trait JournalRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load configuration from .chronomind/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .chronomind/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if the .chronomind directory exists
    fn is_initialized(&self) -> bool;

    /// Create the .chronomind directory
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of JournalRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover the journal root.
    /// CHRONOMIND_ROOT wins when set; otherwise walk up from the current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_meta_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            }
            return Err(ChronoError::Config(format!(
                "{} is set to '{}' but no {} directory found. \
                Run 'chronomind init' in that directory or unset {}.",
                ROOT_ENV,
                path.display(),
                META_DIR,
                ROOT_ENV
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover journal root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_meta_dir(&current) {
                debug!(root = %current.display(), "found journal root");
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(ChronoError::NotJournalDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_meta_dir(path: &Path) -> bool {
        path.join(META_DIR).is_dir()
    }
}

impl JournalRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_meta_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let meta_dir = self.root.join(META_DIR);

        if meta_dir.exists() {
            return Err(ChronoError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&meta_dir)?;
        Ok(())
    }
}

/// Replace `path` with `content` via a temp file in the same directory and a rename.
///
/// A crash leaves either the old file or the new one, never a truncated mix.
/// On Windows `rename` does not overwrite, so the destination is removed first.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_name = format!(
        "{}.chronomind-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("entries.json"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content)?;

    #[cfg(windows)]
    {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ChronoError::Io(e));
    }
    Ok(())
}
