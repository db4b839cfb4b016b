//! Application layer - Use cases and orchestration

pub mod init;
pub mod journal;
pub mod manage_config;
pub mod summaries;
pub mod voice;

pub use journal::Journal;
pub use manage_config::ConfigService;
pub use summaries::{WeekSummaries, WeeklySummarizer};
pub use voice::{Utterance, VoiceFailure, VoiceInput};
