//! Cutoff-period resolution.
//!
//! A cutoff period is labelled `"<MonthAbbrev> <startDay> - <endDay>, <year>"`,
//! e.g. `"Oct 1 - 15, 2025"`. Labels that do not match the pattern are
//! rejected with [`PeriodError`]; no default period is ever substituted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Three-letter month abbreviations, matched case-sensitively.
pub const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full month names for document headers.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Errors resolving a cutoff-period label.
#[derive(Error, Debug)]
pub enum PeriodError {
    #[error("Label does not match \"<Mon> <start> - <end>, <year>\": {0}")]
    Pattern(String),

    #[error("Unrecognized month abbreviation: {0}")]
    UnknownMonth(String),

    #[error("Start day {start} is after end day {end}")]
    InvertedRange { start: u32, end: u32 },

    #[error("Day {day} is out of range for {month} {year}")]
    DayOutOfRange { day: u32, month: String, year: i32 },

    #[error("Month index {0} is out of range")]
    MonthOutOfRange(u32),
}

/// A resolved cutoff period.
///
/// `month0` is zero-based (Jan = 0 .. Dec = 11), matching chrono's
/// `Datelike::month0`. Invariant on parsed values: `start_day <= end_day`
/// and both are valid days of the resolved month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffPeriod {
    pub start_day: u32,
    pub end_day: u32,
    pub month0: u32,
    pub year: i32,
}

impl CutoffPeriod {
    /// Parse a cutoff-period label.
    pub fn parse(label: &str) -> Result<Self, PeriodError> {
        let pattern_err = || PeriodError::Pattern(label.to_string());

        let (month_token, rest) = label.split_once(' ').ok_or_else(pattern_err)?;
        let (days_token, year_token) = rest.split_once(", ").ok_or_else(pattern_err)?;
        let (start_token, end_token) = days_token.split_once(" - ").ok_or_else(pattern_err)?;

        let month0 = MONTH_ABBREVS
            .iter()
            .position(|abbrev| *abbrev == month_token)
            .ok_or_else(|| PeriodError::UnknownMonth(month_token.to_string()))?
            as u32;
        let start_day: u32 = start_token.parse().map_err(|_| pattern_err())?;
        let end_day: u32 = end_token.parse().map_err(|_| pattern_err())?;
        let year: i32 = year_token.parse().map_err(|_| pattern_err())?;

        if start_day > end_day {
            return Err(PeriodError::InvertedRange {
                start: start_day,
                end: end_day,
            });
        }
        for day in [start_day, end_day] {
            if NaiveDate::from_ymd_opt(year, month0 + 1, day).is_none() {
                return Err(PeriodError::DayOutOfRange {
                    day,
                    month: month_token.to_string(),
                    year,
                });
            }
        }

        Ok(Self {
            start_day,
            end_day,
            month0,
            year,
        })
    }

    /// Full month name for document headers, e.g. `"October"`.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES.get(self.month0 as usize).copied().unwrap_or("")
    }

    /// Render the period back into its label form.
    pub fn label(&self) -> String {
        let abbrev = MONTH_ABBREVS.get(self.month0 as usize).copied().unwrap_or("");
        format!("{} {} - {}, {}", abbrev, self.start_day, self.end_day, self.year)
    }

    /// Number of days covered by the period.
    pub fn day_count(&self) -> u32 {
        self.end_day - self.start_day + 1
    }

    /// First and last calendar day of the enclosing month.
    ///
    /// This is the window used when querying punches from the data store;
    /// the builder then restricts to `[start_day, end_day]`.
    pub fn month_range(&self) -> Result<(NaiveDate, NaiveDate), PeriodError> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .ok_or(PeriodError::MonthOutOfRange(self.month0))?;
        let next_month_first = if self.month0 == 11 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month0 + 2, 1)
        }
        .ok_or(PeriodError::MonthOutOfRange(self.month0))?;
        let last = next_month_first
            .pred_opt()
            .ok_or(PeriodError::MonthOutOfRange(self.month0))?;
        Ok((first, last))
    }
}
