//! Finished calendars.
//!
//! Only the active (or most recent) cycle is known, so the archive holds at
//! most one entry. It shows up once the calendar has ended, one day after the
//! last door unlocked.

use chrono::{DateTime, Datelike, Days, FixedOffset};
use serde::Serialize;

use crate::clock::Clock;
use crate::clock_gate::TOTAL_DOORS;
use crate::topic::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveStatus {
    /// Every day completed.
    Perfect,
    /// Ended with open days.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub topic: Topic,
    /// Cycle start in local time.
    pub start_date: DateTime<FixedOffset>,
    /// Same wall-clock time 30 calendar days after the start.
    pub end_date: DateTime<FixedOffset>,
    pub completed_days: u32,
}

impl ArchiveEntry {
    /// Entry whose end keeps the start's UTC offset.
    pub fn new(topic: Topic, start_date: DateTime<FixedOffset>, completed_days: u32) -> Self {
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(TOTAL_DOORS)))
            .unwrap_or(start_date);
        Self {
            topic,
            start_date,
            end_date,
            completed_days,
        }
    }

    /// Entry whose end is resolved in the clock's time zone, so a DST change
    /// inside the calendar does not shift it.
    pub fn with_clock<C: Clock + ?Sized>(
        topic: Topic,
        start_date: DateTime<FixedOffset>,
        completed_days: u32,
        clock: &C,
    ) -> Self {
        let end_date = start_date
            .naive_local()
            .checked_add_days(Days::new(u64::from(TOTAL_DOORS)))
            .map_or(start_date, |wall| clock.resolve_local(wall));
        Self {
            topic,
            start_date,
            end_date,
            completed_days,
        }
    }

    pub fn total_days(&self) -> u32 {
        TOTAL_DOORS
    }

    /// Start plus 30 calendar days.
    pub fn end_date(&self) -> DateTime<FixedOffset> {
        self.end_date
    }

    pub fn is_eligible(&self, now: &DateTime<FixedOffset>) -> bool {
        *now >= self.end_date()
    }

    pub fn is_perfect(&self) -> bool {
        self.completed_days >= TOTAL_DOORS
    }

    pub fn status(&self) -> ArchiveStatus {
        if self.is_perfect() {
            ArchiveStatus::Perfect
        } else {
            ArchiveStatus::Abandoned
        }
    }

    /// `"Jan"`, or `"Dec-Jan"` when start and end fall in different months.
    pub fn month_label(&self) -> String {
        let start = self.start_date;
        let end = self.end_date();
        let start_month = start.format("%b").to_string();
        if start.month() == end.month() && start.year() == end.year() {
            start_month
        } else {
            format!("{start_month}-{}", end.format("%b"))
        }
    }

    /// `"1–31, 2026"` within a year, `"20, 2025–19, 2026"` across one.
    pub fn range_label(&self) -> String {
        let start = self.start_date;
        let end = self.end_date();
        if start.year() == end.year() {
            format!("{}–{}, {}", start.day(), end.day(), start.year())
        } else {
            format!("{}, {}–{}, {}", start.day(), start.year(), end.day(), end.year())
        }
    }

    pub fn card(&self) -> ArchiveCard {
        ArchiveCard {
            topic: self.topic,
            start_date: self.start_date,
            end_date: self.end_date(),
            completed_days: self.completed_days,
            total_days: self.total_days(),
            status: self.status(),
            month_label: self.month_label(),
            range_label: self.range_label(),
        }
    }
}

/// Serializable view of an entry.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveCard {
    pub topic: Topic,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub completed_days: u32,
    pub total_days: u32,
    pub status: ArchiveStatus,
    pub month_label: String,
    pub range_label: String,
}

/// Archive entries visible at `now`: the given entry once it has ended.
pub fn visible_entries(entry: Option<ArchiveEntry>, now: &DateTime<FixedOffset>) -> Vec<ArchiveEntry> {
    entry.into_iter().filter(|e| e.is_eligible(now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone};

    /// UTC-3 until 2026-03-08, UTC-2 from then on.
    struct ShiftingClock;

    impl ShiftingClock {
        fn offset_on(date: NaiveDate) -> FixedOffset {
            let switch = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
            let hours = if date < switch { -3 } else { -2 };
            FixedOffset::east_opt(hours * 3600).unwrap()
        }
    }

    impl Clock for ShiftingClock {
        fn now(&self) -> DateTime<FixedOffset> {
            Self::offset_on(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap())
                .with_ymd_and_hms(2026, 2, 20, 12, 0, 0)
                .unwrap()
        }

        fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
            Self::offset_on(local.date())
                .from_local_datetime(&local)
                .unwrap()
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
    }

    #[test]
    fn end_date_is_thirty_days_on() {
        let entry = ArchiveEntry::new(Topic::Fun, local(2026, 1, 1, 9), 0);
        assert_eq!(entry.end_date(), local(2026, 1, 31, 9));
        assert!(!entry.is_eligible(&local(2026, 1, 31, 8)));
        assert!(entry.is_eligible(&local(2026, 1, 31, 9)));
    }

    #[test]
    fn perfect_only_with_all_days() {
        let start = local(2026, 1, 1, 9);
        assert!(ArchiveEntry::new(Topic::Fun, start, 30).is_perfect());
        assert_eq!(ArchiveEntry::new(Topic::Fun, start, 29).status(), ArchiveStatus::Abandoned);
    }

    #[test]
    fn labels() {
        let same = ArchiveEntry::new(Topic::Fun, local(2026, 1, 1, 9), 30);
        assert_eq!(same.month_label(), "Jan");
        assert_eq!(same.range_label(), "1–31, 2026");

        let cross_month = ArchiveEntry::new(Topic::Fun, local(2026, 2, 10, 9), 3);
        assert_eq!(cross_month.month_label(), "Feb-Mar");
        assert_eq!(cross_month.range_label(), "10–12, 2026");

        let cross_year = ArchiveEntry::new(Topic::NewYear, local(2025, 12, 20, 9), 3);
        assert_eq!(cross_year.month_label(), "Dec-Jan");
        assert_eq!(cross_year.range_label(), "20, 2025–19, 2026");
    }

    #[test]
    fn visible_only_after_end() {
        let start = local(2026, 1, 1, 9);
        let entry = ArchiveEntry::new(Topic::Fun, start, 30);
        assert!(visible_entries(Some(entry.clone()), &(start + Duration::days(29))).is_empty());
        assert_eq!(visible_entries(Some(entry), &(start + Duration::days(45))).len(), 1);
        assert!(visible_entries(None, &start).is_empty());
    }

    #[test]
    fn end_date_keeps_wall_clock_across_offset_change() {
        let start = ShiftingClock::offset_on(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap())
            .with_ymd_and_hms(2026, 2, 20, 23, 30, 0)
            .unwrap();
        let entry = ArchiveEntry::with_clock(Topic::Winter, start, 30, &ShiftingClock);
        let end = entry.end_date();

        assert_eq!(end.naive_local().date(), NaiveDate::from_ymd_opt(2026, 3, 22).unwrap());
        assert_eq!(end.format("%H:%M").to_string(), "23:30");
        assert_eq!(end.offset().local_minus_utc(), -2 * 3600);
        assert!(!entry.is_eligible(&(end - Duration::minutes(30))));
        assert!(entry.is_eligible(&end));
        assert_eq!(entry.range_label(), "20–22, 2026");
    }
}
