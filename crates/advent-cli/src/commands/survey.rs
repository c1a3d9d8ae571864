use chrono::{DateTime, FixedOffset};
use clap::Subcommand;
use serde_json::json;

use super::{open_calendar, print_json, CliResult};

#[derive(Subcommand)]
pub enum SurveyAction {
    /// Check whether today's survey is due
    Check,
    /// Answer the survey for a day
    Send {
        day: u32,
        #[arg(long, action = clap::ArgAction::Set)]
        liked: bool,
        #[arg(long, action = clap::ArgAction::Set)]
        did_everything: bool,
    },
}

pub fn run(action: SurveyAction, now: Option<DateTime<FixedOffset>>) -> CliResult {
    let cal = open_calendar(now)?;
    match action {
        SurveyAction::Check => print_json(&json!({ "due": cal.pending_survey()? }))?,
        SurveyAction::Send {
            day,
            liked,
            did_everything,
        } => {
            cal.submit_survey(day, liked, did_everything)?;
            print_json(&cal.stats()?)?;
        }
    }
    Ok(())
}
