//! # Advent Core Library
//!
//! The state engine behind a 30-day "advent" calendar: one door unlocks per
//! calendar day for a chosen topic, finished days are recorded, and an
//! end-of-day survey is armed from 21:00 until it is answered. A standalone
//! CLI drives the same library.
//!
//! ## Architecture
//!
//! - **Clock gate**: pure unlock arithmetic over local calendar days
//! - **Storage**: a [`KeyValueStore`] capability (SQLite or in-memory) and
//!   TOML-based configuration
//! - **Progress / Survey**: per-topic completion sets and the survey state
//!   machine, both built on the store
//! - **Stats / Archive**: read-only views for display
//!
//! ## Key Components
//!
//! - [`AdventCalendar`]: facade tying store, clock and config together
//! - [`ProgressStore`]: completed days and door selection
//! - [`SurveyGate`]: survey presentation rule and answers
//! - [`Config`]: application configuration management

pub mod archive;
pub mod calendar;
pub mod clock;
pub mod clock_gate;
pub mod cycle;
pub mod error;
pub mod progress;
pub mod stats;
pub mod storage;
pub mod survey;
pub mod topic;

pub use archive::{ArchiveCard, ArchiveEntry, ArchiveStatus};
pub use calendar::{AdventCalendar, DoorOutcome, ResetOptions, ResetSummary, SurveyPrompt};
pub use clock::{Clock, FixedClock, SystemClock};
pub use clock_gate::{days_remaining, is_door_unlocked, unlocked_count, TOTAL_DOORS};
pub use cycle::{Cycle, CycleStore};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use progress::ProgressStore;
pub use stats::{result_percent, StatsSnapshot};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use survey::{SurveyGate, SurveyRecord, SurveyState, SurveySummary};
pub use topic::Topic;
