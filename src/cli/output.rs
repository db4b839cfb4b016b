//! Output formatting utilities

use crate::application::WeekSummaries;
use crate::domain::{JournalEntry, WeekBucket};

/// Format timeline entries (already in display order) with their positions
pub fn format_timeline(entries: &[&JournalEntry]) -> String {
    if entries.is_empty() {
        return "No entries yet.\n".to_string();
    }

    let mut output = String::new();
    for (position, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "{}. {}  {}  {}\n",
            position,
            entry.id,
            entry.date.format("%Y-%m-%d"),
            entry.text
        ));
    }
    output
}

/// Format week buckets with their entry counts and combined text
pub fn format_weeks(buckets: &[WeekBucket]) -> String {
    if buckets.is_empty() {
        return "No entries yet.\n".to_string();
    }

    let mut output = String::new();
    for bucket in buckets {
        let noun = if bucket.texts.len() == 1 { "entry" } else { "entries" };
        output.push_str(&format!("{} - {} {}\n", bucket.label, bucket.texts.len(), noun));
        output.push_str(&format!("  {}\n", bucket.combined_text()));
    }
    output
}

/// Format a summarization pass. `has_entries` picks the empty-journal hint.
pub fn format_summaries(result: &WeekSummaries, has_entries: bool) -> String {
    let mut output = String::new();
    for notice in &result.notices {
        output.push_str(&format!("! {}\n", notice));
    }

    if !has_entries {
        output.push_str("Add entries to generate summaries.\n");
    } else if !result.summaries.is_empty() {
        for week in &result.summaries {
            output.push_str(&format!("{}\n  {}\n", week.label, week.summary));
        }
    } else if result.available {
        output.push_str("No week has enough text to summarize yet.\n");
    } else if result.notices.is_empty() {
        output.push_str("Summaries are unavailable.\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryId, WeeklySummary};
    use chrono::NaiveDate;

    fn entry(id: u64, date: (i32, u32, u32), text: &str) -> JournalEntry {
        JournalEntry::new(
            EntryId(id),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            text,
        )
        .unwrap()
    }

    #[test]
    fn test_format_empty_timeline() {
        assert_eq!(format_timeline(&[]), "No entries yet.\n");
    }

    #[test]
    fn test_format_timeline() {
        let newer = entry(2, (2024, 1, 5), "Finished reading a book.");
        let older = entry(1, (2024, 1, 3), "Went hiking today, great weather.");

        let output = format_timeline(&[&newer, &older]);
        assert_eq!(
            output,
            "0. #2  2024-01-05  Finished reading a book.\n\
             1. #1  2024-01-03  Went hiking today, great weather.\n"
        );
    }

    #[test]
    fn test_format_weeks() {
        let buckets = vec![WeekBucket {
            label: "Week 1 (2024)".to_string(),
            texts: vec!["Went hiking.".to_string(), "Read a book.".to_string()],
        }];
        assert_eq!(
            format_weeks(&buckets),
            "Week 1 (2024) - 2 entries\n  Went hiking. Read a book.\n"
        );
    }

    #[test]
    fn test_format_summaries_states() {
        let empty = WeekSummaries {
            available: true,
            ..Default::default()
        };
        assert_eq!(format_summaries(&empty, false), "Add entries to generate summaries.\n");
        assert!(format_summaries(&empty, true).contains("enough text"));

        let done = WeekSummaries {
            summaries: vec![WeeklySummary {
                label: "Week 1 (2024)".to_string(),
                summary: "Outdoors and books.".to_string(),
            }],
            notices: vec!["Could not summarize Week 2 (2024): bad".to_string()],
            available: true,
        };
        assert_eq!(
            format_summaries(&done, true),
            "! Could not summarize Week 2 (2024): bad\nWeek 1 (2024)\n  Outdoors and books.\n"
        );

        let gone = WeekSummaries::default();
        assert_eq!(format_summaries(&gone, true), "Summaries are unavailable.\n");
    }
}
