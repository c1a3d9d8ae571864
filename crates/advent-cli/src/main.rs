use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "advent-cli", version, about = "Advent calendar CLI")]
struct Cli {
    /// Pretend the current time is this RFC 3339 timestamp
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<FixedOffset>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Topic selection
    Topic {
        #[command(subcommand)]
        action: commands::topic::TopicAction,
    },
    /// Door opening and completion
    Door {
        #[command(subcommand)]
        action: commands::door::DoorAction,
    },
    /// End-of-day survey
    Survey {
        #[command(subcommand)]
        action: commands::survey::SurveyAction,
    },
    /// Statistics for the active calendar
    Stats,
    /// Finished calendars
    Archive,
    /// Close a finished calendar to pick a new topic
    NewCycle,
    /// Remove stored progress
    Reset(commands::reset::ResetArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn parse_now(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid timestamp '{s}': {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ADVENT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = cli.now;
    let result = match cli.command {
        Commands::Topic { action } => commands::topic::run(action, now),
        Commands::Door { action } => commands::door::run(action, now),
        Commands::Survey { action } => commands::survey::run(action, now),
        Commands::Stats => commands::stats::run(now),
        Commands::Archive => commands::archive::run(now),
        Commands::NewCycle => commands::reset::new_cycle(now),
        Commands::Reset(args) => commands::reset::run(args, now),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
