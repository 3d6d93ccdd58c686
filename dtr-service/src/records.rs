//! Daily record assembly.
//!
//! Buckets one employee's raw punches into AM/PM arrival and departure
//! slots, one [`DailyRecord`] per day of the cutoff range. Slot assignment
//! is a closed case table keyed on how many time-ins and time-outs the day
//! has.

use chrono::NaiveDate;

use crate::models::{DailyRecord, Punch};
use crate::period::CutoffPeriod;

/// Build one record per day in `[start_day, end_day]`, ascending.
///
/// Days without punches yield all-empty records. Punches are expected to be
/// restricted to the period's month already (the repository query window);
/// anything outside it simply never matches a target day.
pub fn build_daily_records(punches: &[Punch], period: &CutoffPeriod) -> Vec<DailyRecord> {
    (period.start_day..=period.end_day)
        .map(|day| build_day(punches, period, day))
        .collect()
}

fn build_day(punches: &[Punch], period: &CutoffPeriod, day: u32) -> DailyRecord {
    let target = NaiveDate::from_ymd_opt(period.year, period.month0 + 1, day);
    let todays: Vec<&Punch> = match target {
        Some(date) => punches.iter().filter(|p| p.date == date).collect(),
        None => Vec::new(),
    };

    let time_ins: Vec<&str> = todays
        .iter()
        .filter_map(|p| p.time_in.as_deref())
        .filter(|t| !t.is_empty())
        .collect();
    let time_outs: Vec<&str> = todays
        .iter()
        .filter_map(|p| p.time_out.as_deref())
        .filter(|t| !t.is_empty())
        .collect();

    let mut record = DailyRecord::empty(day);
    match (time_ins.len(), time_outs.len()) {
        // single shift, no break punches
        (1, 1) => {
            record.am_arrival = Some(format_time(time_ins[0]));
            record.pm_departure = Some(format_time(time_outs[0]));
        }
        // full day with break
        (2, 2) => {
            record.am_arrival = Some(format_time(time_ins[0]));
            record.am_departure = Some(format_time(time_outs[0]));
            record.pm_arrival = Some(format_time(time_ins[1]));
            record.pm_departure = Some(format_time(time_outs[1]));
        }
        // returned from break but only one out recorded
        (2, 1) => {
            record.am_arrival = Some(format_time(time_ins[0]));
            record.pm_arrival = Some(format_time(time_ins[1]));
            record.pm_departure = Some(format_time(time_outs[0]));
        }
        // one in, out for break and for the day
        (1, 2) => {
            record.am_arrival = Some(format_time(time_ins[0]));
            record.am_departure = Some(format_time(time_outs[0]));
            record.pm_departure = Some(format_time(time_outs[1]));
        }
        // anything else keeps only the first in and the last out
        _ => {
            if let Some(first_in) = time_ins.first() {
                record.am_arrival = Some(format_time(first_in));
            }
            if let Some(last_out) = time_outs.last() {
                record.pm_departure = Some(format_time(last_out));
            }
        }
    }

    let undertime: u32 = todays
        .iter()
        .map(|p| p.undertime_minutes.unwrap_or(0))
        .sum();
    record.undertime_hours = undertime / 60;
    record.undertime_minutes = undertime % 60;

    record
}

/// Format a raw punch time for display, e.g. `"17:10"` -> `"5:10 PM"`.
///
/// Values that already carry an AM/PM marker are only whitespace-normalized
/// and upper-cased, which makes the formatter idempotent. Values that fail
/// to parse are returned unchanged; formatting never fails the record.
pub fn format_time(raw: &str) -> String {
    let lowered = raw.to_ascii_lowercase();
    if lowered.contains("am") || lowered.contains("pm") {
        return raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
    }
    format_wall_clock(raw).unwrap_or_else(|| raw.to_string())
}

/// Parse `H:MM` out of a raw value, shedding ISO date and timezone parts,
/// and render the 12-hour display form.
fn format_wall_clock(raw: &str) -> Option<String> {
    // "2025-10-02T08:05:00+08:00" -> "08:05:00+08:00" -> "08:05:00"
    let fragment = raw.split('T').last().unwrap_or(raw);
    let fragment = fragment.split('+').next().unwrap_or(fragment);
    let fragment = fragment.split('-').next().unwrap_or(fragment);

    let mut parts = fragment.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    Some(format!("{}:{:02} {}", display_hour, minute, suffix))
}
