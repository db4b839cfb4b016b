//! Infrastructure layer - Persistence, external models and devices

pub mod config;
pub mod exporter;
pub mod recorder;
pub mod repository;
pub mod speech;
pub mod store;
pub mod summarizer;

pub use config::{Config, StorageKind, SummarizerBackend};
pub use exporter::{export_summaries, render_export};
pub use recorder::{CaptureError, MicrophoneRecorder, Recorder};
pub use repository::{FileSystemRepository, JournalRepository};
pub use speech::{HttpTranscriber, TranscribeError, Transcriber};
pub use store::{EntryStore, JsonFileEntryStore, MemoryEntryStore};
pub use summarizer::{Summarizer, SummaryError};
