//! Per-topic completion tracking and door selection.

use std::collections::BTreeSet;

use crate::clock::Clock;
use crate::clock_gate::{self, is_valid_day, DAY_RANGE};
use crate::cycle::CycleStore;
use crate::error::Result;
use crate::storage::{KeyValueStore, KvValue, KvWrite, StoreKey};
use crate::topic::Topic;

/// Completed days for one topic, plus the unlock window of the stored cycle.
///
/// The completion set is stored as an ascending comma-separated list
/// (`"1,2,5"`). Completions are never dropped when the cycle changes.
pub struct ProgressStore<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    clock: &'a C,
    topic: Topic,
}

impl<'a, S, C> ProgressStore<'a, S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: &'a S, clock: &'a C, topic: Topic) -> Self {
        Self {
            store,
            clock,
            topic,
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    fn key(&self) -> String {
        StoreKey::CompletedDays(self.topic).as_key()
    }

    /// Completed days. Tokens that are not a day in 1..=30 are skipped.
    pub fn load_completed(&self) -> Result<BTreeSet<u32>> {
        let raw = self.store.get_string(&self.key())?.unwrap_or_default();
        Ok(parse_days(&raw, self.topic))
    }

    pub fn is_completed(&self, day: u32) -> Result<bool> {
        Ok(self.load_completed()?.contains(&day))
    }

    /// Mark `day` done. Out-of-range days and repeats change nothing.
    pub fn mark_completed(&self, day: u32) -> Result<()> {
        if !is_valid_day(day) {
            tracing::debug!(day, "ignoring completion outside the calendar");
            return Ok(());
        }
        let mut days = self.load_completed()?;
        if !days.insert(day) {
            return Ok(());
        }
        self.save(&days)?;
        tracing::debug!(topic = %self.topic, day, completed = days.len(), "day completed");
        Ok(())
    }

    pub fn completed_count(&self) -> Result<u32> {
        Ok(self.load_completed()?.len() as u32)
    }

    /// Highest unlocked day. With no stored start the cycle is taken to
    /// begin today, so only door 1 is open.
    pub fn unlocked_day_limit(&self) -> Result<u32> {
        let start = CycleStore::new(self.store, self.clock).local_start_or_now()?;
        Ok(clock_gate::unlocked_count(&start, &self.clock.now()))
    }

    pub fn is_day_unlocked(&self, day: u32) -> Result<bool> {
        Ok(is_valid_day(day) && day <= self.unlocked_day_limit()?)
    }

    /// First open day at or after `tapped`, or `None` when the tapped door
    /// is locked or everything up to the limit is done.
    pub fn first_available_day(&self, tapped: u32) -> Result<Option<u32>> {
        let limit = self.unlocked_day_limit()?;
        if tapped > limit {
            return Ok(None);
        }
        self.scan(tapped.max(1), limit)
    }

    /// First open day strictly after `current`.
    pub fn next_available_day(&self, current: u32) -> Result<Option<u32>> {
        let limit = self.unlocked_day_limit()?;
        self.scan(current.saturating_add(1).max(1), limit)
    }

    /// Remove every completion for this topic.
    pub fn clear(&self) -> Result<u32> {
        let removed = self.completed_count()?;
        self.store.apply(&[KvWrite::remove(&StoreKey::CompletedDays(self.topic))])?;
        tracing::info!(topic = %self.topic, removed, "completion cleared");
        Ok(removed)
    }

    fn scan(&self, from: u32, limit: u32) -> Result<Option<u32>> {
        if from > limit {
            return Ok(None);
        }
        let completed = self.load_completed()?;
        Ok((from..=limit).find(|d| !completed.contains(d)))
    }

    fn save(&self, days: &BTreeSet<u32>) -> Result<()> {
        let encoded = days
            .iter()
            .filter(|d| DAY_RANGE.contains(*d))
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.store.apply(&[KvWrite::set(
            &StoreKey::CompletedDays(self.topic),
            KvValue::String(encoded),
        )])?;
        Ok(())
    }
}

fn parse_days(raw: &str, topic: Topic) -> BTreeSet<u32> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u32>() {
            Ok(day) if is_valid_day(day) => Some(day),
            _ => {
                tracing::warn!(topic = %topic, token, "dropping malformed completed day");
                None
            }
        })
        .collect()
}
