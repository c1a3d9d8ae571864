use chrono::{DateTime, FixedOffset};

use super::{open_calendar, print_json, CliResult};

pub fn run(now: Option<DateTime<FixedOffset>>) -> CliResult {
    let cal = open_calendar(now)?;
    print_json(&cal.stats()?)
}
