//! The active (topic, start date) pair.
//!
//! Both halves are written and cleared in one batch. A reader that finds only
//! one of them, or a topic it does not recognise, treats the cycle as absent
//! and clears the leftovers.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::storage::{KeyValueStore, KvValue, KvWrite, StoreKey};
use crate::topic::Topic;

/// A running 30-day calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub topic: Topic,
    pub started_at: DateTime<Utc>,
}

/// Reads and writes the active [`Cycle`].
pub struct CycleStore<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    clock: &'a C,
}

impl<'a, S, C> CycleStore<'a, S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: &'a S, clock: &'a C) -> Self {
        Self { store, clock }
    }

    /// Start a cycle for `topic` now, replacing any active one.
    pub fn start(&self, topic: Topic) -> Result<Cycle> {
        let now = self.clock.now().with_timezone(&Utc);
        // Stored with millisecond precision; hand back what a later read sees.
        let started_at = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        let seconds = started_at.timestamp_millis() as f64 / 1000.0;
        self.store.apply(&[
            KvWrite::set(&StoreKey::SelectedTopic, KvValue::String(topic.title().to_string())),
            KvWrite::set(&StoreKey::TopicStartDate, KvValue::Number(seconds)),
        ])?;
        tracing::info!(topic = %topic, %started_at, "calendar started");
        Ok(Cycle { topic, started_at })
    }

    /// The active cycle, healing a half-written pair back to empty.
    pub fn active(&self) -> Result<Option<Cycle>> {
        let topic_raw = self
            .store
            .get_string(&StoreKey::SelectedTopic.as_key())?
            .filter(|s| !s.trim().is_empty());
        let started_at = self.start_date()?;

        match (topic_raw, started_at) {
            (None, None) => Ok(None),
            (Some(raw), Some(started_at)) => match raw.parse::<Topic>() {
                Ok(topic) => Ok(Some(Cycle { topic, started_at })),
                Err(_) => {
                    tracing::warn!(topic = %raw, "unknown stored topic, clearing calendar");
                    self.clear()?;
                    Ok(None)
                }
            },
            (topic, start) => {
                tracing::warn!(
                    has_topic = topic.is_some(),
                    has_start = start.is_some(),
                    "mismatched calendar state, clearing"
                );
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Remove both halves of the cycle.
    pub fn clear(&self) -> Result<()> {
        self.store.apply(&[
            KvWrite::remove(&StoreKey::SelectedTopic),
            KvWrite::remove(&StoreKey::TopicStartDate),
        ])?;
        tracing::info!("calendar cleared");
        Ok(())
    }

    /// The stored start instant, ignoring whether a topic is set.
    ///
    /// Zero, negative and non-finite values count as unset.
    pub fn start_date(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = self.store.get_number(&StoreKey::TopicStartDate.as_key())?;
        Ok(raw
            .filter(|s| s.is_finite() && *s > 0.0)
            .and_then(|s| DateTime::from_timestamp_millis((s * 1000.0).round() as i64)))
    }

    /// The stored start date in local time, or now when unset.
    pub fn local_start_or_now(&self) -> Result<DateTime<FixedOffset>> {
        Ok(match self.start_date()? {
            Some(start) => self.clock.localize(start),
            None => self.clock.now(),
        })
    }
}
