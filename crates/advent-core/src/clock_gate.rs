//! Door unlocking rules.
//!
//! Door 1 opens on the calendar day the cycle starts, door N on day N-1 after
//! it, capped at [`TOTAL_DOORS`]. A start date in the future still leaves
//! door 1 open.

use std::ops::RangeInclusive;

use chrono::{DateTime, TimeZone};

/// Number of doors in a cycle.
pub const TOTAL_DOORS: u32 = 30;

/// Valid 1-based day indices.
pub const DAY_RANGE: RangeInclusive<u32> = 1..=TOTAL_DOORS;

pub fn is_valid_day(day: u32) -> bool {
    DAY_RANGE.contains(&day)
}

/// Number of unlocked doors (1..=30) for `now`, given the cycle start.
///
/// Both instants are truncated to their local calendar day before counting.
pub fn unlocked_count<Tz: TimeZone>(start: &DateTime<Tz>, now: &DateTime<Tz>) -> u32 {
    let days_passed = (now.date_naive() - start.date_naive()).num_days();
    let raw = days_passed.saturating_add(1);
    raw.clamp(1, i64::from(TOTAL_DOORS)) as u32
}

pub fn is_door_unlocked<Tz: TimeZone>(day: u32, start: &DateTime<Tz>, now: &DateTime<Tz>) -> bool {
    is_valid_day(day) && day <= unlocked_count(start, now)
}

/// Doors still locked; zero once everything is open.
pub fn days_remaining<Tz: TimeZone>(start: &DateTime<Tz>, now: &DateTime<Tz>) -> u32 {
    TOTAL_DOORS.saturating_sub(unlocked_count(start, now))
}
