//! Subcommand implementations.
//!
//! Every command opens the calendar against the on-disk store and prints
//! JSON on stdout.

pub mod archive;
pub mod config;
pub mod door;
pub mod reset;
pub mod stats;
pub mod survey;
pub mod topic;

use advent_core::{AdventCalendar, Clock, Config, FixedClock, SqliteStore, SystemClock};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Wall clock, or a pinned time from `--now`.
pub enum CliClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for CliClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self {
            CliClock::System(c) => c.now(),
            CliClock::Fixed(c) => c.now(),
        }
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            CliClock::System(c) => c.localize(instant),
            CliClock::Fixed(c) => c.localize(instant),
        }
    }

    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        match self {
            CliClock::System(c) => c.resolve_local(local),
            CliClock::Fixed(c) => c.resolve_local(local),
        }
    }
}

pub fn open_calendar(
    now: Option<DateTime<FixedOffset>>,
) -> Result<AdventCalendar<SqliteStore, CliClock>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open(&config)?;
    tracing::debug!(?now, database = %config.storage.database_file, "calendar opened");
    let clock = match now {
        Some(now) => CliClock::Fixed(FixedClock::new(now)),
        None => CliClock::System(SystemClock),
    };
    Ok(AdventCalendar::new(store, clock, config))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
