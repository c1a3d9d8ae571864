//! Injectable time source.
//!
//! All date logic works on local calendar days, so the clock hands out
//! offset-aware timestamps and knows how to place a stored UTC instant into
//! the same local time zone.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

/// Supplies "now" and local-time conversion.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Convert a stored instant into local time.
    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(self.now().offset())
    }

    /// Place a local wall-clock time, with the offset in force on that date.
    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        let offset = *self.now().offset();
        offset
            .from_local_datetime(&local)
            .earliest()
            .unwrap_or_else(|| local.and_utc().with_timezone(&offset))
    }
}

/// Wall clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&Local).fixed_offset()
    }

    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        // A time skipped by a spring-forward lands just after the gap.
        Local
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| Local.from_local_datetime(&(local + Duration::hours(1))).earliest())
            .map(|dt| dt.fixed_offset())
            .unwrap_or_else(|| local.and_utc().fixed_offset())
    }
}

/// A clock pinned to a settable instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        (**self).localize(instant)
    }

    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        (**self).resolve_local(local)
    }
}
