//! DTR models
//!
//! Domain models for Daily Time Record generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw attendance event as supplied by the data store.
///
/// Times are kept as the raw strings the store returned (`"8:05"`,
/// `"08:05:00+08:00"`, `"8:05 AM"`); formatting happens when daily records
/// are built so unparseable values can pass through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Punch {
    pub employee_id: String,
    pub date: NaiveDate,
    pub time_in: Option<String>,
    pub time_out: Option<String>,
    pub undertime_minutes: Option<u32>,
    /// Free-text classification carried along but never evaluated here.
    pub status: Option<String>,
}

impl Punch {
    /// Create a punch with only the identifying fields set.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            time_in: None,
            time_out: None,
            undertime_minutes: None,
            status: None,
        }
    }

    pub fn with_times(
        mut self,
        time_in: impl Into<String>,
        time_out: impl Into<String>,
    ) -> Self {
        self.time_in = Some(time_in.into());
        self.time_out = Some(time_out.into());
        self
    }

    pub fn with_undertime(mut self, minutes: u32) -> Self {
        self.undertime_minutes = Some(minutes);
        self
    }
}

/// Employee identity as supplied by the data store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub department: String,
}

impl Employee {
    /// Display name with the middle initial, e.g. `"Maria C. Santos"`.
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().and_then(|m| m.chars().next()) {
            Some(initial) => format!("{} {}. {}", self.first_name, initial, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// One row of a Daily Time Record.
///
/// Slot fields hold already-formatted display times; `None` renders as an
/// empty cell. Exactly one record exists per day of the cutoff range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub day: u32,
    pub am_arrival: Option<String>,
    pub am_departure: Option<String>,
    pub pm_arrival: Option<String>,
    pub pm_departure: Option<String>,
    pub undertime_hours: u32,
    pub undertime_minutes: u32,
}

impl DailyRecord {
    /// Create an all-empty record for a day.
    pub fn empty(day: u32) -> Self {
        Self {
            day,
            am_arrival: None,
            am_departure: None,
            pm_arrival: None,
            pm_departure: None,
            undertime_hours: 0,
            undertime_minutes: 0,
        }
    }

    /// Total undertime for the day in minutes.
    pub fn undertime_total_minutes(&self) -> u32 {
        self.undertime_hours * 60 + self.undertime_minutes
    }

    /// Hours cell text; zero renders empty.
    pub fn undertime_hours_display(&self) -> String {
        if self.undertime_hours == 0 {
            String::new()
        } else {
            self.undertime_hours.to_string()
        }
    }

    /// Minutes cell text; zero renders empty.
    pub fn undertime_minutes_display(&self) -> String {
        if self.undertime_minutes == 0 {
            String::new()
        } else {
            self.undertime_minutes.to_string()
        }
    }
}

/// Aggregated undertime for a cutoff period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtrTotals {
    pub undertime_hours: u32,
    pub undertime_minutes: u32,
}

impl DtrTotals {
    /// Sum undertime across the period's daily records.
    pub fn from_records(records: &[DailyRecord]) -> Self {
        let total: u32 = records.iter().map(|r| r.undertime_total_minutes()).sum();
        Self {
            undertime_hours: total / 60,
            undertime_minutes: total % 60,
        }
    }

    /// Canonical `H:MM` rendering, `"0:00"` included.
    pub fn total_undertime(&self) -> String {
        format!("{}:{:02}", self.undertime_hours, self.undertime_minutes)
    }
}

/// Render input for one employee over one cutoff period.
///
/// Constructed fresh per generation request and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtrDocument {
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub cutoff_label: String,
    pub month_name: String,
    pub year: i32,
    pub daily_records: Vec<DailyRecord>,
    pub totals: DtrTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_with_middle_initial() {
        let employee = Employee {
            employee_id: "EMP001".to_string(),
            first_name: "Maria".to_string(),
            middle_name: Some("Clara".to_string()),
            last_name: "Santos".to_string(),
            department: "Accounting".to_string(),
        };
        assert_eq!(employee.full_name(), "Maria C. Santos");
    }

    #[test]
    fn test_full_name_without_middle_name() {
        let employee = Employee {
            employee_id: "EMP002".to_string(),
            first_name: "Jose".to_string(),
            middle_name: None,
            last_name: "Rizal".to_string(),
            department: "Accounting".to_string(),
        };
        assert_eq!(employee.full_name(), "Jose Rizal");
    }

    #[test]
    fn test_undertime_display_empty_when_zero() {
        let record = DailyRecord::empty(3);
        assert_eq!(record.undertime_hours_display(), "");
        assert_eq!(record.undertime_minutes_display(), "");
    }

    #[test]
    fn test_undertime_display_nonzero() {
        let mut record = DailyRecord::empty(3);
        record.undertime_hours = 1;
        record.undertime_minutes = 5;
        assert_eq!(record.undertime_hours_display(), "1");
        assert_eq!(record.undertime_minutes_display(), "5");
        assert_eq!(record.undertime_total_minutes(), 65);
    }

    #[test]
    fn test_totals_render_zero_padded() {
        let totals = DtrTotals {
            undertime_hours: 2,
            undertime_minutes: 7,
        };
        assert_eq!(totals.total_undertime(), "2:07");

        let zero = DtrTotals {
            undertime_hours: 0,
            undertime_minutes: 0,
        };
        assert_eq!(zero.total_undertime(), "0:00");
    }
}
