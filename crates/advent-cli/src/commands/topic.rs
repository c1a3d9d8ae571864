use advent_core::Topic;
use chrono::{DateTime, FixedOffset};
use clap::Subcommand;
use serde_json::json;

use super::{open_calendar, print_json, CliResult};

#[derive(Subcommand)]
pub enum TopicAction {
    /// Start a calendar for a topic (e.g. "winter", "New Year")
    Choose {
        topic: String,
    },
    /// Show the active calendar
    Show,
    /// List available topics
    List,
}

pub fn run(action: TopicAction, now: Option<DateTime<FixedOffset>>) -> CliResult {
    match action {
        TopicAction::Choose { topic } => {
            let topic: Topic = topic.parse()?;
            let cal = open_calendar(now)?;
            let cycle = cal.choose_topic(topic)?;
            print_json(&cycle)?;
        }
        TopicAction::Show => {
            let cal = open_calendar(now)?;
            match cal.active_cycle()? {
                Some(cycle) => {
                    let current_day = cal.current_day()?.unwrap_or(1);
                    print_json(&json!({
                        "topic": cycle.topic,
                        "title": cycle.topic.title(),
                        "started_at": cycle.started_at,
                        "current_day": current_day,
                        "days_remaining": cal.days_remaining()?,
                    }))?;
                }
                None => print_json(&json!({ "topic": null }))?,
            }
        }
        TopicAction::List => {
            let topics: Vec<_> = Topic::ALL
                .iter()
                .map(|t| json!({ "id": t, "title": t.title() }))
                .collect();
            print_json(&topics)?;
        }
    }
    Ok(())
}
