//! Weekly summaries on top of a summarization backend

use crate::domain::summary::{needs_summary, strip_summary_prefix};
use crate::domain::{SummaryPreset, WeekBucket, WeeklySummary};
use crate::error::Result;
use crate::infrastructure::config::SummarizerConfig;
use crate::infrastructure::summarizer::{self, Summarizer, SummaryError};
use crate::infrastructure::export_summaries;
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of one summarization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSummaries {
    pub summaries: Vec<WeeklySummary>,
    /// Problems worth telling the user about, in the order they happened
    pub notices: Vec<String>,
    /// False once the model is known to be unusable for this process
    pub available: bool,
}

/// Summarizes week buckets and remembers when the model is gone for good.
///
/// A load failure or an `Unavailable` answer switches summaries off for the
/// rest of the process; that is reported once. A failure on a single week
/// only drops that week.
pub struct WeeklySummarizer {
    backend: Option<Box<dyn Summarizer>>,
    preset: SummaryPreset,
    unavailable: Option<String>,
    reported: bool,
}

impl WeeklySummarizer {
    pub fn new(backend: Box<dyn Summarizer>, preset: SummaryPreset) -> Self {
        WeeklySummarizer {
            backend: Some(backend),
            preset,
            unavailable: None,
            reported: false,
        }
    }

    /// A summarizer whose model never loaded
    pub fn unavailable(reason: impl Into<String>) -> Self {
        WeeklySummarizer {
            backend: None,
            preset: SummaryPreset::default(),
            unavailable: Some(reason.into()),
            reported: false,
        }
    }

    /// Load the configured backend; failure leaves summaries unavailable
    pub fn from_config(config: &SummarizerConfig) -> Self {
        match summarizer::from_config(config) {
            Ok(backend) => {
                debug!(backend = %backend.describe(), preset = config.preset.as_str(), "summarizer ready");
                Self::new(backend, config.preset)
            }
            Err(e) => {
                warn!(error = %e, "summarizer failed to load");
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    fn mark_unavailable(&mut self, reason: String, notices: &mut Vec<String>) {
        warn!(reason = %reason, "summaries disabled for this run");
        self.backend = None;
        self.unavailable = Some(reason);
        self.report_unavailable(notices);
    }

    fn report_unavailable(&mut self, notices: &mut Vec<String>) {
        if self.reported {
            return;
        }
        if let Some(reason) = &self.unavailable {
            notices.push(format!("Summaries are unavailable: {}", reason));
        }
        self.reported = true;
    }

    /// Summarize every bucket with more than five words
    pub fn summarize_weeks(&mut self, buckets: &[WeekBucket]) -> WeekSummaries {
        let mut result = WeekSummaries::default();

        for bucket in buckets {
            let combined = bucket.combined_text();
            if !needs_summary(&combined) {
                debug!(week = %bucket.label, "too short to summarize");
                continue;
            }

            let Some(backend) = self.backend.as_ref() else {
                break;
            };

            let params = self.preset.params_for(&combined);
            match backend.summarize(&combined, &params) {
                Ok(raw) => {
                    let summary = strip_summary_prefix(&raw);
                    if summary.is_empty() {
                        result
                            .notices
                            .push(format!("{}: the model returned an empty summary", bucket.label));
                    } else {
                        result.summaries.push(WeeklySummary {
                            label: bucket.label.clone(),
                            summary,
                        });
                    }
                }
                Err(SummaryError::Unavailable(reason)) => {
                    self.mark_unavailable(reason, &mut result.notices);
                    break;
                }
                Err(SummaryError::Generation(reason)) => {
                    warn!(week = %bucket.label, error = %reason, "summary failed");
                    result
                        .notices
                        .push(format!("Could not summarize {}: {}", bucket.label, reason));
                }
            }
        }

        if self.backend.is_none() {
            self.report_unavailable(&mut result.notices);
        }
        result.available = self.backend.is_some();
        result
    }

    /// Summarize `buckets` and write the export file. When the model is
    /// unavailable nothing is written and `available` comes back false.
    pub fn export(&mut self, buckets: &[WeekBucket], path: &Path) -> Result<WeekSummaries> {
        let summaries = self.summarize_weeks(buckets);
        if !summaries.available {
            warn!(path = %path.display(), "export skipped, summaries unavailable");
            return Ok(summaries);
        }
        export_summaries(path, &summaries.summaries)?;
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SummaryParams;
    use crate::infrastructure::summarizer::ExtractiveSummarizer;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Scripted backend answering from a queue and counting calls
    struct ScriptedSummarizer {
        answers: RefCell<Vec<std::result::Result<String, SummaryError>>>,
        calls: Rc<Cell<usize>>,
    }

    impl ScriptedSummarizer {
        fn boxed(
            answers: Vec<std::result::Result<String, SummaryError>>,
        ) -> (Box<dyn Summarizer>, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let mut answers = answers;
            answers.reverse();
            (
                Box::new(ScriptedSummarizer {
                    answers: RefCell::new(answers),
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    impl Summarizer for ScriptedSummarizer {
        fn summarize(
            &self,
            _text: &str,
            _params: &SummaryParams,
        ) -> std::result::Result<String, SummaryError> {
            self.calls.set(self.calls.get() + 1);
            self.answers
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok("fallback".to_string()))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn bucket(label: &str, texts: &[&str]) -> WeekBucket {
        WeekBucket {
            label: label.to_string(),
            texts: texts.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn long_week(label: &str) -> WeekBucket {
        bucket(label, &["Went hiking today, great weather.", "Finished reading a book."])
    }

    #[test]
    fn test_short_weeks_are_skipped() {
        let (backend, calls) = ScriptedSummarizer::boxed(vec![]);
        let mut summarizer = WeeklySummarizer::new(backend, SummaryPreset::Adaptive);

        let result = summarizer.summarize_weeks(&[bucket("Week 1 (2024)", &["one two", "three four five"])]);
        assert!(result.summaries.is_empty());
        assert!(result.notices.is_empty());
        assert!(result.available);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_prefix_is_stripped() {
        let (backend, _) = ScriptedSummarizer::boxed(vec![Ok("Summary:  Outdoors and books. ".to_string())]);
        let mut summarizer = WeeklySummarizer::new(backend, SummaryPreset::Adaptive);

        let result = summarizer.summarize_weeks(&[long_week("Week 1 (2024)")]);
        assert_eq!(
            result.summaries,
            vec![WeeklySummary {
                label: "Week 1 (2024)".to_string(),
                summary: "Outdoors and books.".to_string(),
            }]
        );
    }

    #[test]
    fn test_generation_failure_omits_only_that_week() {
        let (backend, calls) = ScriptedSummarizer::boxed(vec![
            Err(SummaryError::Generation("bad input".to_string())),
            Ok("Second week.".to_string()),
        ]);
        let mut summarizer = WeeklySummarizer::new(backend, SummaryPreset::Adaptive);

        let result = summarizer.summarize_weeks(&[long_week("Week 1 (2024)"), long_week("Week 2 (2024)")]);
        assert_eq!(calls.get(), 2);
        assert_eq!(result.summaries.len(), 1);
        assert_eq!(result.summaries[0].label, "Week 2 (2024)");
        assert_eq!(result.notices.len(), 1);
        assert!(result.notices[0].contains("Week 1 (2024)"));
        assert!(result.available);
    }

    #[test]
    fn test_unavailable_latches_and_reports_once() {
        let (backend, calls) = ScriptedSummarizer::boxed(vec![Err(SummaryError::Unavailable(
            "model gone".to_string(),
        ))]);
        let mut summarizer = WeeklySummarizer::new(backend, SummaryPreset::Adaptive);
        let weeks = [long_week("Week 1 (2024)"), long_week("Week 2 (2024)")];

        let first = summarizer.summarize_weeks(&weeks);
        assert_eq!(calls.get(), 1);
        assert!(!first.available);
        assert_eq!(first.notices, vec!["Summaries are unavailable: model gone".to_string()]);

        let second = summarizer.summarize_weeks(&weeks);
        assert_eq!(calls.get(), 1);
        assert!(!second.available);
        assert!(second.notices.is_empty());
        assert_eq!(summarizer.unavailable_reason(), Some("model gone"));
    }

    #[test]
    fn test_load_failure_is_reported_on_first_pass() {
        let mut summarizer = WeeklySummarizer::unavailable("no model");
        assert!(!summarizer.is_available());

        let result = summarizer.summarize_weeks(&[long_week("Week 1 (2024)")]);
        assert!(result.summaries.is_empty());
        assert_eq!(result.notices.len(), 1);
        assert!(summarizer.summarize_weeks(&[]).notices.is_empty());
    }

    #[test]
    fn test_export_writes_summaries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("weekly_summaries.txt");
        let mut summarizer =
            WeeklySummarizer::new(Box::new(ExtractiveSummarizer), SummaryPreset::Fixed);

        let result = summarizer.export(&[long_week("Week 1 (2024)")], &path).unwrap();
        assert_eq!(result.summaries.len(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Week 1 (2024)\nWent hiking today, great weather. Finished reading a book.\n\n"
        );
    }

    #[test]
    fn test_export_leaves_previous_file_when_model_goes_away() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("weekly_summaries.txt");
        std::fs::write(&path, "Week 1 (2024)\nold good summary\n\n").unwrap();
        let (backend, _) = ScriptedSummarizer::boxed(vec![Err(SummaryError::Unavailable(
            "connection refused".to_string(),
        ))]);
        let mut summarizer = WeeklySummarizer::new(backend, SummaryPreset::Adaptive);

        let result = summarizer.export(&[long_week("Week 1 (2024)")], &path).unwrap();
        assert!(!result.available);
        assert_eq!(result.notices.len(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Week 1 (2024)\nold good summary\n\n"
        );
    }
}
