//! Entry date references ("today", "last friday", "2024-01-03", ...)

use crate::error::{ChronoError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// A user-supplied reference to the day an entry belongs to.
///
/// Journal entries describe the past, so every relative form resolves to
/// the base date or earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRef {
    /// Base date itself
    Today,
    /// N days before the base date ("yesterday" is 1)
    DaysAgo(u32),
    /// Most recent occurrence of a weekday, today included
    Weekday(Weekday),
    /// Occurrence of a weekday strictly before today
    LastWeekday(Weekday),
    /// Explicit ISO 8601 calendar date
    On(NaiveDate),
}

impl DateRef {
    /// Parse a date reference string
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        match normalized.as_str() {
            "today" | "now" => return Ok(DateRef::Today),
            "yesterday" => return Ok(DateRef::DaysAgo(1)),
            _ => {}
        }

        if let Some(day) = parse_weekday(&normalized) {
            return Ok(DateRef::Weekday(day));
        }

        if let Some(rest) = normalized.strip_prefix("last ") {
            return parse_weekday(rest.trim())
                .map(DateRef::LastWeekday)
                .ok_or_else(|| ChronoError::InvalidTimeReference(input.to_string()));
        }

        if let Some(count) = normalized
            .strip_suffix(" days ago")
            .or_else(|| normalized.strip_suffix(" day ago"))
        {
            return count
                .trim()
                .parse::<u32>()
                .map(DateRef::DaysAgo)
                .map_err(|_| ChronoError::InvalidTimeReference(input.to_string()));
        }

        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .map(DateRef::On)
            .map_err(|_| ChronoError::InvalidTimeReference(input.to_string()))
    }

    /// Resolve this reference against `base` (normally the local date)
    pub fn resolve(&self, base: NaiveDate) -> NaiveDate {
        match self {
            DateRef::Today => base,
            DateRef::DaysAgo(days) => base - Duration::days(i64::from(*days)),
            DateRef::Weekday(day) => base - Duration::days(days_back(base, *day, false)),
            DateRef::LastWeekday(day) => base - Duration::days(days_back(base, *day, true)),
            DateRef::On(date) => *date,
        }
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Days between `base` and the previous `target` weekday.
/// With `strict`, a match on `base` itself counts as a full week back.
fn days_back(base: NaiveDate, target: Weekday, strict: bool) -> i64 {
    let diff = (base.weekday().num_days_from_monday() + 7 - target.num_days_from_monday()) % 7;
    if diff == 0 && strict {
        7
    } else {
        i64::from(diff)
    }
}
