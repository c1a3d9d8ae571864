use chrono::{DateTime, FixedOffset};
use clap::Subcommand;
use serde_json::json;

use super::{open_calendar, print_json, CliResult};

#[derive(Subcommand)]
pub enum DoorAction {
    /// Resolve a door tap to the task day to show
    Open {
        day: u32,
    },
    /// Mark a day as done
    Complete {
        day: u32,
    },
    /// Find the next open day after the given one
    Skip {
        day: u32,
    },
}

pub fn run(action: DoorAction, now: Option<DateTime<FixedOffset>>) -> CliResult {
    let cal = open_calendar(now)?;
    match action {
        DoorAction::Open { day } => print_json(&cal.open_door(day)?)?,
        DoorAction::Complete { day } => {
            let survey = cal.complete_day(day)?;
            print_json(&json!({ "stats": cal.stats()?, "survey": survey }))?;
        }
        DoorAction::Skip { day } => print_json(&json!({ "next": cal.skip(day)? }))?,
    }
    Ok(())
}
