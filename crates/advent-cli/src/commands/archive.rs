use chrono::{DateTime, FixedOffset};

use super::{open_calendar, print_json, CliResult};

pub fn run(now: Option<DateTime<FixedOffset>>) -> CliResult {
    let cal = open_calendar(now)?;
    let cards: Vec<_> = cal.archive()?.iter().map(|entry| entry.card()).collect();
    print_json(&cards)
}
