//! Grouping entries by ISO calendar week

use crate::domain::entry::JournalEntry;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Which year goes into a week label.
///
/// Around New Year the ISO week-numbering year and the calendar year differ:
/// 2024-12-30 belongs to ISO week 1 of 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekYear {
    /// ISO week-numbering year (`Week 1 (2025)` for 2024-12-30)
    #[default]
    Iso,
    /// Calendar year of the date itself (`Week 1 (2024)` for 2024-12-30)
    Calendar,
}

impl FromStr for WeekYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iso" => Ok(WeekYear::Iso),
            "calendar" => Ok(WeekYear::Calendar),
            _ => Err(format!(
                "Invalid week_year: '{}'. Valid values are: iso, calendar",
                s
            )),
        }
    }
}

impl WeekYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekYear::Iso => "iso",
            WeekYear::Calendar => "calendar",
        }
    }
}

/// Label of the week a date falls in, e.g. `Week 1 (2024)`
pub fn week_label(date: NaiveDate, policy: WeekYear) -> String {
    let iso = date.iso_week();
    let year = match policy {
        WeekYear::Iso => iso.year(),
        WeekYear::Calendar => date.year(),
    };
    format!("Week {} ({:04})", iso.week(), year)
}

/// Entry texts that share one week label, in storage order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub label: String,
    pub texts: Vec<String>,
}

impl WeekBucket {
    /// All texts of the week joined by single spaces
    pub fn combined_text(&self) -> String {
        self.texts.join(" ")
    }
}

/// Partition entries into week buckets.
///
/// Buckets come out in order of first appearance, which keeps the output
/// stable for exports and redraws.
pub fn group_by_week(entries: &[JournalEntry], policy: WeekYear) -> Vec<WeekBucket> {
    let mut buckets: Vec<WeekBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let label = week_label(entry.date, policy);
        match index.get(&label) {
            Some(&pos) => buckets[pos].texts.push(entry.text.clone()),
            None => {
                index.insert(label.clone(), buckets.len());
                buckets.push(WeekBucket {
                    label,
                    texts: vec![entry.text.clone()],
                });
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::EntryId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: u64, d: NaiveDate, text: &str) -> JournalEntry {
        JournalEntry::new(EntryId(id), d, text).unwrap()
    }

    #[test]
    fn test_week_label_format() {
        assert_eq!(week_label(date(2024, 1, 3), WeekYear::Iso), "Week 1 (2024)");
        assert_eq!(week_label(date(2025, 1, 17), WeekYear::Iso), "Week 3 (2025)");
    }

    #[test]
    fn test_week_label_year_boundary() {
        // Monday of ISO 2025-W01
        let d = date(2024, 12, 30);
        assert_eq!(week_label(d, WeekYear::Iso), "Week 1 (2025)");
        assert_eq!(week_label(d, WeekYear::Calendar), "Week 1 (2024)");

        // Friday of ISO 2020-W53
        let d = date(2021, 1, 1);
        assert_eq!(week_label(d, WeekYear::Iso), "Week 53 (2020)");
        assert_eq!(week_label(d, WeekYear::Calendar), "Week 53 (2021)");
    }

    #[test]
    fn test_week_label_depends_only_on_date() {
        let d = date(2024, 6, 12);
        let first = week_label(d, WeekYear::Iso);
        let entries = vec![entry(1, date(2024, 1, 1), "a"), entry(2, d, "b")];
        let reversed: Vec<JournalEntry> = entries.iter().rev().cloned().collect();

        let forward = group_by_week(&entries, WeekYear::Iso);
        let backward = group_by_week(&reversed, WeekYear::Iso);
        assert!(forward.iter().any(|b| b.label == first));
        assert!(backward.iter().any(|b| b.label == first));
    }

    #[test]
    fn test_group_same_week() {
        let entries = vec![
            entry(1, date(2024, 1, 3), "Went hiking today, great weather."),
            entry(2, date(2024, 1, 5), "Finished reading a book."),
        ];

        let buckets = group_by_week(&entries, WeekYear::Iso);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].label, "Week 1 (2024)");
        assert_eq!(
            buckets[0].combined_text(),
            "Went hiking today, great weather. Finished reading a book."
        );
    }

    #[test]
    fn test_group_keeps_first_appearance_order() {
        let entries = vec![
            entry(1, date(2024, 1, 10), "second week"),
            entry(2, date(2024, 1, 3), "first week"),
            entry(3, date(2024, 1, 11), "second week again"),
        ];

        let buckets = group_by_week(&entries, WeekYear::Iso);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 2 (2024)", "Week 1 (2024)"]);
        assert_eq!(buckets[0].texts, vec!["second week", "second week again"]);
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_week(&[], WeekYear::Iso).is_empty());
    }

    #[test]
    fn test_week_year_from_str() {
        assert_eq!("ISO".parse::<WeekYear>().unwrap(), WeekYear::Iso);
        assert_eq!("calendar".parse::<WeekYear>().unwrap(), WeekYear::Calendar);
        assert!("fiscal".parse::<WeekYear>().is_err());
    }
}
