//! Summary generation parameters and post-processing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// Weeks with this many words or fewer are not summarized
pub const MIN_WORDS_FOR_SUMMARY: usize = 5;

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True when a week's combined text is long enough to summarize
pub fn needs_summary(text: &str) -> bool {
    word_count(text) > MIN_WORDS_FOR_SUMMARY
}

fn prefix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)^\s*summary:").unwrap())
}

/// Drop a leading `summary:` (any case) echoed back by the model and trim.
pub fn strip_summary_prefix(raw: &str) -> String {
    prefix_regex().replace(raw, "").trim().to_string()
}

/// Generation settings forwarded to the summarization model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryParams {
    pub max_length: usize,
    pub min_length: usize,
    pub num_beams: u32,
    pub length_penalty: f32,
    pub no_repeat_ngram_size: u32,
    pub do_sample: bool,
    pub early_stopping: bool,
    pub truncation: bool,
}

/// Named parameter sets.
///
/// `Adaptive` scales the output with the input and favours short summaries;
/// `Fixed` asks for longer, beam-heavier output regardless of input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPreset {
    #[default]
    Adaptive,
    Fixed,
}

impl SummaryPreset {
    /// Parameters for summarizing `text` with this preset
    pub fn params_for(&self, text: &str) -> SummaryParams {
        match self {
            SummaryPreset::Adaptive => {
                let words = word_count(text);
                let max_length = (words / 2).min(50);
                let min_length = (max_length / 2).min(20);
                SummaryParams {
                    max_length,
                    min_length,
                    num_beams: 2,
                    length_penalty: 1.0,
                    no_repeat_ngram_size: 3,
                    do_sample: false,
                    early_stopping: false,
                    truncation: true,
                }
            }
            SummaryPreset::Fixed => SummaryParams {
                max_length: 130,
                min_length: 30,
                num_beams: 4,
                length_penalty: 2.0,
                no_repeat_ngram_size: 3,
                do_sample: false,
                early_stopping: true,
                truncation: true,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryPreset::Adaptive => "adaptive",
            SummaryPreset::Fixed => "fixed",
        }
    }
}

impl FromStr for SummaryPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adaptive" => Ok(SummaryPreset::Adaptive),
            "fixed" => Ok(SummaryPreset::Fixed),
            _ => Err(format!(
                "Invalid summary preset: '{}'. Valid presets are: adaptive, fixed",
                s
            )),
        }
    }
}

/// Summary produced for one week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySummary {
    pub label: String,
    pub summary: String,
}
