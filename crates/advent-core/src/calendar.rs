//! The calendar facade.
//!
//! [`AdventCalendar`] owns the store, the clock and the configuration, and
//! wires the individual components together the way a screen would use them:
//! pick a topic, open a door, complete it, answer the evening survey.

use serde::{Deserialize, Serialize};

use crate::archive::{self, ArchiveEntry};
use crate::clock::Clock;
use crate::clock_gate::{self, TOTAL_DOORS};
use crate::cycle::{Cycle, CycleStore};
use crate::error::{CoreError, Result, ValidationError};
use crate::progress::ProgressStore;
use crate::stats::StatsSnapshot;
use crate::storage::{Config, KeyValueStore};
use crate::survey::SurveyGate;
use crate::topic::Topic;

/// Result of tapping a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DoorOutcome {
    /// The tapped door has not unlocked yet.
    Locked,
    /// Show this day's task. `day` may be later than the tapped door when
    /// earlier days were already done.
    Open { day: u32, tapped: u32 },
    /// Every unlocked day from the tapped door on is complete.
    AllDone,
}

/// A survey waiting for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyPrompt {
    pub topic: Topic,
    pub day: u32,
}

/// What an explicit reset should remove.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOptions {
    /// Topic to reset; the active one when `None`.
    pub topic: Option<Topic>,
    pub completion: bool,
    pub surveys: bool,
    pub cycle: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    pub topic: Option<Topic>,
    pub cleared_days: u32,
    pub cleared_surveys: u32,
    pub cleared_cycle: bool,
}

pub struct AdventCalendar<S, C> {
    store: S,
    clock: C,
    config: Config,
}

impl<S: KeyValueStore, C: Clock> AdventCalendar<S, C> {
    pub fn new(store: S, clock: C, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cycles(&self) -> CycleStore<'_, S, C> {
        CycleStore::new(&self.store, &self.clock)
    }

    pub fn progress(&self, topic: Topic) -> ProgressStore<'_, S, C> {
        ProgressStore::new(&self.store, &self.clock, topic)
    }

    pub fn survey(&self) -> SurveyGate<'_, S, C> {
        SurveyGate::with_trigger_hour(&self.store, &self.clock, self.config.survey.trigger_hour)
    }

    /// Start a calendar for `topic` today. Earlier progress on the same
    /// topic is kept.
    pub fn choose_topic(&self, topic: Topic) -> Result<Cycle> {
        self.cycles().start(topic)
    }

    pub fn active_cycle(&self) -> Result<Option<Cycle>> {
        self.cycles().active()
    }

    fn require_cycle(&self) -> Result<Cycle> {
        self.active_cycle()?.ok_or(CoreError::NoActiveCycle)
    }

    /// Today's door number, or `None` without an active calendar.
    pub fn current_day(&self) -> Result<Option<u32>> {
        Ok(self.active_cycle()?.map(|cycle| {
            let start = self.clock.localize(cycle.started_at);
            clock_gate::unlocked_count(&start, &self.clock.now())
        }))
    }

    /// Doors still locked in the active calendar.
    pub fn days_remaining(&self) -> Result<u32> {
        let cycle = self.require_cycle()?;
        let start = self.clock.localize(cycle.started_at);
        Ok(clock_gate::days_remaining(&start, &self.clock.now()))
    }

    /// Resolve a door tap to the task to show.
    pub fn open_door(&self, tapped: u32) -> Result<DoorOutcome> {
        let cycle = self.require_cycle()?;
        let progress = self.progress(cycle.topic);
        if tapped > progress.unlocked_day_limit()? {
            return Ok(DoorOutcome::Locked);
        }
        Ok(match progress.first_available_day(tapped)? {
            Some(day) => {
                if day != tapped {
                    tracing::debug!(tapped, day, "fast-forwarding to open day");
                }
                DoorOutcome::Open { day, tapped }
            }
            None => DoorOutcome::AllDone,
        })
    }

    /// Mark `day` done for the active topic, then ask the survey gate about
    /// that day. Returns the survey to show, if any.
    pub fn complete_day(&self, day: u32) -> Result<Option<SurveyPrompt>> {
        let cycle = self.require_cycle()?;
        let progress = self.progress(cycle.topic);
        progress.mark_completed(day)?;
        if !progress.is_completed(day)? {
            return Ok(None);
        }
        Ok(self
            .survey()
            .should_present(cycle.topic, day)?
            .then_some(SurveyPrompt {
                topic: cycle.topic,
                day,
            }))
    }

    /// The next open day after `current`; `None` disables skipping.
    pub fn skip(&self, current: u32) -> Result<Option<u32>> {
        let cycle = self.require_cycle()?;
        self.progress(cycle.topic).next_available_day(current)
    }

    /// Check today's survey, arming it if the trigger hour has passed.
    pub fn pending_survey(&self) -> Result<Option<SurveyPrompt>> {
        let Some(cycle) = self.active_cycle()? else {
            return Ok(None);
        };
        let start = self.clock.localize(cycle.started_at);
        let day = clock_gate::unlocked_count(&start, &self.clock.now());
        Ok(self
            .survey()
            .should_present(cycle.topic, day)?
            .then_some(SurveyPrompt {
                topic: cycle.topic,
                day,
            }))
    }

    pub fn submit_survey(&self, day: u32, liked: bool, did_everything: bool) -> Result<()> {
        let cycle = self.require_cycle()?;
        self.survey().mark_sent(cycle.topic, day, liked, did_everything)
    }

    pub fn stats(&self) -> Result<StatsSnapshot> {
        let Some(cycle) = self.active_cycle()? else {
            return Ok(StatsSnapshot::empty());
        };
        let completed = self.progress(cycle.topic).completed_count()?;
        let survey = self.survey().summary(cycle.topic)?;
        Ok(StatsSnapshot::aggregate(cycle.topic, completed, &survey))
    }

    /// The active calendar as an archive entry, whether or not it has ended.
    pub fn archive_entry(&self) -> Result<Option<ArchiveEntry>> {
        let Some(cycle) = self.active_cycle()? else {
            return Ok(None);
        };
        let completed = self.progress(cycle.topic).completed_count()?;
        Ok(Some(ArchiveEntry::with_clock(
            cycle.topic,
            self.clock.localize(cycle.started_at),
            completed,
            &self.clock,
        )))
    }

    /// Finished calendars.
    pub fn archive(&self) -> Result<Vec<ArchiveEntry>> {
        Ok(archive::visible_entries(self.archive_entry()?, &self.clock.now()))
    }

    /// Close a finished calendar so a new topic can be chosen.
    pub fn start_new_cycle(&self) -> Result<()> {
        let cycle = self.require_cycle()?;
        let completed = self.progress(cycle.topic).completed_count()?;
        if completed < TOTAL_DOORS {
            return Err(ValidationError::CycleNotFinished {
                completed,
                total: TOTAL_DOORS,
            }
            .into());
        }
        self.cycles().clear()
    }

    pub fn reset(&self, options: ResetOptions) -> Result<ResetSummary> {
        let topic = match options.topic {
            Some(topic) => Some(topic),
            None => self.active_cycle()?.map(|c| c.topic),
        };
        let mut summary = ResetSummary {
            topic,
            ..ResetSummary::default()
        };

        if let Some(topic) = topic {
            if options.completion {
                summary.cleared_days = self.progress(topic).clear()?;
            }
            if options.surveys {
                summary.cleared_surveys = self.survey().clear(topic)?;
            }
        }
        if options.cycle {
            self.cycles().clear()?;
            summary.cleared_cycle = true;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Duration, FixedOffset, TimeZone};

    fn at(d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(-3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 5, d, h, 0, 0)
            .unwrap()
    }

    fn calendar(now: DateTime<FixedOffset>) -> AdventCalendar<MemoryStore, FixedClock> {
        AdventCalendar::new(MemoryStore::new(), FixedClock::new(now), Config::default())
    }

    #[test]
    fn operations_need_a_topic() {
        let cal = calendar(at(1, 10));
        assert!(matches!(cal.open_door(1), Err(CoreError::NoActiveCycle)));
        assert!(matches!(cal.complete_day(1), Err(CoreError::NoActiveCycle)));
        assert_eq!(cal.pending_survey().unwrap(), None);
        assert_eq!(cal.stats().unwrap(), StatsSnapshot::empty());
        assert!(cal.archive().unwrap().is_empty());
        assert_eq!(cal.current_day().unwrap(), None);
    }

    #[test]
    fn open_door_fast_forwards() {
        let cal = calendar(at(1, 10));
        cal.choose_topic(Topic::Summer).unwrap();
        cal.clock().set(at(4, 10));
        assert_eq!(cal.current_day().unwrap(), Some(4));
        assert_eq!(cal.days_remaining().unwrap(), 26);

        cal.complete_day(1).unwrap();
        cal.complete_day(2).unwrap();
        assert_eq!(cal.open_door(1).unwrap(), DoorOutcome::Open { day: 3, tapped: 1 });
        assert_eq!(cal.open_door(5).unwrap(), DoorOutcome::Locked);

        cal.complete_day(3).unwrap();
        cal.complete_day(4).unwrap();
        assert_eq!(cal.open_door(2).unwrap(), DoorOutcome::AllDone);
        assert_eq!(cal.skip(1).unwrap(), None);
    }

    #[test]
    fn survey_follows_current_day() {
        let cal = calendar(at(1, 10));
        cal.choose_topic(Topic::Winter).unwrap();
        cal.clock().set(at(2, 21));
        assert_eq!(
            cal.pending_survey().unwrap(),
            Some(SurveyPrompt {
                topic: Topic::Winter,
                day: 2
            })
        );
        cal.submit_survey(2, true, false).unwrap();
        assert_eq!(cal.pending_survey().unwrap(), None);
        let stats = cal.stats().unwrap();
        assert_eq!(stats.likes, 1);
        assert_eq!(stats.dislikes, 0);
    }

    #[test]
    fn completing_past_day_in_evening_arms_its_survey() {
        let cal = calendar(at(1, 10));
        cal.choose_topic(Topic::Fun).unwrap();
        cal.clock().set(at(5, 21) + Duration::minutes(30));

        assert_eq!(
            cal.complete_day(2).unwrap(),
            Some(SurveyPrompt {
                topic: Topic::Fun,
                day: 2
            })
        );
        assert_eq!(
            cal.survey().record(Topic::Fun, 2).unwrap().state(),
            crate::survey::SurveyState::Pending
        );
    }

    #[test]
    fn completing_before_trigger_hour_shows_no_survey() {
        let cal = calendar(at(1, 10));
        cal.choose_topic(Topic::Fun).unwrap();
        cal.clock().set(at(3, 20));
        assert_eq!(cal.complete_day(2).unwrap(), None);
        assert_eq!(cal.complete_day(31).unwrap(), None);
        assert_eq!(
            cal.survey().record(Topic::Fun, 2).unwrap().state(),
            crate::survey::SurveyState::None
        );
    }

    #[test]
    fn new_cycle_requires_finished_calendar() {
        let cal = calendar(at(1, 10));
        cal.choose_topic(Topic::Fun).unwrap();
        assert!(matches!(
            cal.start_new_cycle(),
            Err(CoreError::Validation(ValidationError::CycleNotFinished { completed: 0, .. }))
        ));

        cal.clock().advance(Duration::days(40));
        for day in 1..=30 {
            cal.complete_day(day).unwrap();
        }
        cal.start_new_cycle().unwrap();
        assert_eq!(cal.active_cycle().unwrap(), None);
        // Completion is keyed by topic and survives the new cycle.
        assert_eq!(cal.progress(Topic::Fun).completed_count().unwrap(), 30);
    }

    #[test]
    fn reselecting_topic_resumes_progress() {
        let cal = calendar(at(1, 10));
        cal.choose_topic(Topic::Fun).unwrap();
        cal.complete_day(1).unwrap();
        cal.cycles().clear().unwrap();
        cal.choose_topic(Topic::Fun).unwrap();
        assert_eq!(cal.stats().unwrap().completed, 1);
    }

    #[test]
    fn reset_clears_selected_parts() {
        let cal = calendar(at(1, 22));
        cal.choose_topic(Topic::Productivity).unwrap();
        cal.complete_day(1).unwrap();
        cal.submit_survey(1, true, true).unwrap();

        let summary = cal
            .reset(ResetOptions {
                completion: true,
                surveys: true,
                ..ResetOptions::default()
            })
            .unwrap();
        assert_eq!(summary.topic, Some(Topic::Productivity));
        assert_eq!(summary.cleared_days, 1);
        assert_eq!(summary.cleared_surveys, 1);
        assert!(!summary.cleared_cycle);
        assert!(cal.active_cycle().unwrap().is_some());

        let summary = cal
            .reset(ResetOptions {
                cycle: true,
                ..ResetOptions::default()
            })
            .unwrap();
        assert!(summary.cleared_cycle);
        assert!(cal.store().is_empty());
    }
}
