use advent_core::{ResetOptions, Topic};
use chrono::{DateTime, FixedOffset};
use clap::Args;
use serde_json::json;

use super::{open_calendar, print_json, CliResult};

#[derive(Args)]
pub struct ResetArgs {
    /// Topic to reset (defaults to the active one)
    #[arg(long)]
    topic: Option<String>,
    /// Clear completed days
    #[arg(long)]
    completion: bool,
    /// Clear survey answers
    #[arg(long)]
    surveys: bool,
    /// Clear the active topic and start date
    #[arg(long)]
    cycle: bool,
}

pub fn run(args: ResetArgs, now: Option<DateTime<FixedOffset>>) -> CliResult {
    if !(args.completion || args.surveys || args.cycle) {
        return Err("nothing to reset: pass --completion, --surveys or --cycle".into());
    }
    let topic = args.topic.as_deref().map(str::parse::<Topic>).transpose()?;
    let cal = open_calendar(now)?;
    let summary = cal.reset(ResetOptions {
        topic,
        completion: args.completion,
        surveys: args.surveys,
        cycle: args.cycle,
    })?;
    print_json(&summary)
}

pub fn new_cycle(now: Option<DateTime<FixedOffset>>) -> CliResult {
    let cal = open_calendar(now)?;
    cal.start_new_cycle()?;
    print_json(&json!({ "topic": null }))
}
