//! End-of-day survey gate.
//!
//! Each (topic, day) moves `None -> Pending -> Sent`. From the trigger hour
//! on, the first check arms the survey; it then stays due until answered,
//! whatever the clock says. Once sent it never comes back.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::clock_gate::{is_valid_day, DAY_RANGE};
use crate::error::Result;
use crate::storage::{KeyValueStore, KvValue, KvWrite, StoreKey, SurveyField};
use crate::topic::Topic;

/// Default local hour at which a survey becomes due.
pub const DEFAULT_TRIGGER_HOUR: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyState {
    None,
    Pending,
    Sent,
}

/// Stored flags for one (topic, day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub pending: bool,
    pub sent: bool,
    pub liked: bool,
    pub did_everything: bool,
}

impl SurveyRecord {
    pub fn state(&self) -> SurveyState {
        if self.sent {
            SurveyState::Sent
        } else if self.pending {
            SurveyState::Pending
        } else {
            SurveyState::None
        }
    }

    /// Presentation check at local `hour`.
    ///
    /// Returns the record after the check and whether the survey is due.
    pub fn check(self, hour: u32, trigger_hour: u32) -> (SurveyRecord, bool) {
        match self.state() {
            SurveyState::Sent => (self, false),
            SurveyState::Pending => (self, true),
            SurveyState::None if hour >= trigger_hour => (
                SurveyRecord {
                    pending: true,
                    ..self
                },
                true,
            ),
            SurveyState::None => (self, false),
        }
    }

    /// Record the answers. Answering again overwrites them.
    pub fn send(self, liked: bool, did_everything: bool) -> SurveyRecord {
        SurveyRecord {
            pending: false,
            sent: true,
            liked,
            did_everything,
        }
    }
}

/// Survey aggregates for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub sent: u32,
    pub likes: u32,
    pub did_everything: u32,
}

impl SurveySummary {
    /// Sent surveys that were not liked.
    pub fn dislikes(&self) -> u32 {
        self.sent.saturating_sub(self.likes)
    }
}

/// Persists survey records and applies the presentation rule.
pub struct SurveyGate<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    clock: &'a C,
    trigger_hour: u32,
}

impl<'a, S, C> SurveyGate<'a, S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: &'a S, clock: &'a C) -> Self {
        Self::with_trigger_hour(store, clock, DEFAULT_TRIGGER_HOUR)
    }

    pub fn with_trigger_hour(store: &'a S, clock: &'a C, trigger_hour: u32) -> Self {
        Self {
            store,
            clock,
            trigger_hour,
        }
    }

    fn flag(&self, topic: Topic, day: u32, field: SurveyField) -> Result<bool> {
        Ok(self
            .store
            .get_bool(&StoreKey::survey(topic, day, field).as_key())?)
    }

    pub fn record(&self, topic: Topic, day: u32) -> Result<SurveyRecord> {
        if !is_valid_day(day) {
            return Ok(SurveyRecord::default());
        }
        Ok(SurveyRecord {
            pending: self.flag(topic, day, SurveyField::Pending)?,
            sent: self.flag(topic, day, SurveyField::Sent)?,
            liked: self.flag(topic, day, SurveyField::Liked)?,
            did_everything: self.flag(topic, day, SurveyField::DidEverything)?,
        })
    }

    /// Whether the survey for `day` must be shown now.
    ///
    /// Arms the survey the first time this is asked at or after the trigger
    /// hour; later calls return `true` without looking at the clock.
    pub fn should_present(&self, topic: Topic, day: u32) -> Result<bool> {
        if !is_valid_day(day) {
            return Ok(false);
        }
        let before = self.record(topic, day)?;
        let (after, due) = before.check(self.clock.now().hour(), self.trigger_hour);
        if after.pending && !before.pending {
            self.store.apply(&[KvWrite::set(
                &StoreKey::survey(topic, day, SurveyField::Pending),
                KvValue::Bool(true),
            )])?;
            tracing::info!(topic = %topic, day, "survey armed");
        }
        Ok(due)
    }

    /// Store the answers and close the survey for good.
    pub fn mark_sent(&self, topic: Topic, day: u32, liked: bool, did_everything: bool) -> Result<()> {
        if !is_valid_day(day) {
            return Ok(());
        }
        let record = self.record(topic, day)?.send(liked, did_everything);
        let key = |field| StoreKey::survey(topic, day, field);
        self.store.apply(&[
            KvWrite::set(&key(SurveyField::Liked), KvValue::Bool(record.liked)),
            KvWrite::set(
                &key(SurveyField::DidEverything),
                KvValue::Bool(record.did_everything),
            ),
            KvWrite::set(&key(SurveyField::Sent), KvValue::Bool(true)),
            KvWrite::remove(&key(SurveyField::Pending)),
        ])?;
        tracing::info!(topic = %topic, day, liked, did_everything, "survey sent");
        Ok(())
    }

    /// Counts over days 1..=30. Answers only count once sent.
    pub fn summary(&self, topic: Topic) -> Result<SurveySummary> {
        let mut summary = SurveySummary::default();
        for day in DAY_RANGE {
            let record = self.record(topic, day)?;
            if !record.sent {
                continue;
            }
            summary.sent += 1;
            summary.likes += u32::from(record.liked);
            summary.did_everything += u32::from(record.did_everything);
        }
        Ok(summary)
    }

    pub fn sent_count(&self, topic: Topic) -> Result<u32> {
        Ok(self.summary(topic)?.sent)
    }

    pub fn likes_count(&self, topic: Topic) -> Result<u32> {
        Ok(self.summary(topic)?.likes)
    }

    pub fn dislikes_count(&self, topic: Topic) -> Result<u32> {
        Ok(self.summary(topic)?.dislikes())
    }

    pub fn did_everything_count(&self, topic: Topic) -> Result<u32> {
        Ok(self.summary(topic)?.did_everything)
    }

    /// Drop every survey record for `topic`. Returns how many were sent.
    pub fn clear(&self, topic: Topic) -> Result<u32> {
        let sent = self.sent_count(topic)?;
        let writes: Vec<KvWrite> = StoreKey::all_survey_keys(topic)
            .map(|key| KvWrite::remove(&key))
            .collect();
        self.store.apply(&writes)?;
        tracing::info!(topic = %topic, sent, "survey records cleared");
        Ok(sent)
    }
}
