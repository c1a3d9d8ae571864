//! Display statistics for the active calendar.

use serde::{Deserialize, Serialize};

use crate::clock_gate::TOTAL_DOORS;
use crate::survey::SurveySummary;
use crate::topic::Topic;

/// Completion percentage, rounded half up.
pub fn result_percent(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = u64::from(completed.min(total));
    let total = u64::from(total);
    ((done * 200 + total) / (total * 2)) as u32
}

/// Everything the statistics screen shows, read in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub topic: Option<Topic>,
    pub completed: u32,
    pub total: u32,
    pub likes: u32,
    pub dislikes: u32,
    pub surveys_sent: u32,
    pub did_everything: u32,
    pub result_percent: u32,
    pub is_finished: bool,
}

impl StatsSnapshot {
    pub fn aggregate(topic: Topic, completed: u32, survey: &SurveySummary) -> Self {
        Self {
            topic: Some(topic),
            completed,
            total: TOTAL_DOORS,
            likes: survey.likes,
            dislikes: survey.dislikes(),
            surveys_sent: survey.sent,
            did_everything: survey.did_everything,
            result_percent: result_percent(completed, TOTAL_DOORS),
            is_finished: completed >= TOTAL_DOORS,
        }
    }

    /// Snapshot with no calendar running.
    pub fn empty() -> Self {
        Self {
            topic: None,
            completed: 0,
            total: TOTAL_DOORS,
            likes: 0,
            dislikes: 0,
            surveys_sent: 0,
            did_everything: 0,
            result_percent: 0,
            is_finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounding() {
        assert_eq!(result_percent(18, 30), 60);
        assert_eq!(result_percent(0, 30), 0);
        assert_eq!(result_percent(30, 30), 100);
        assert_eq!(result_percent(45, 30), 100);
        // 1/30 = 3.33 -> 3, 2/30 = 6.67 -> 7
        assert_eq!(result_percent(1, 30), 3);
        assert_eq!(result_percent(2, 30), 7);
        // exact half rounds up
        assert_eq!(result_percent(1, 8), 13);
        assert_eq!(result_percent(1, 0), 0);
    }

    #[test]
    fn aggregate_combines_counts() {
        let survey = SurveySummary {
            sent: 10,
            likes: 7,
            did_everything: 4,
        };
        let stats = StatsSnapshot::aggregate(Topic::Winter, 18, &survey);
        assert_eq!(stats.result_percent, 60);
        assert_eq!(stats.dislikes, 3);
        assert!(!stats.is_finished);

        let done = StatsSnapshot::aggregate(Topic::Winter, 30, &survey);
        assert!(done.is_finished);
    }

    #[test]
    fn empty_has_zeroes() {
        let stats = StatsSnapshot::empty();
        assert_eq!(stats.topic, None);
        assert_eq!(stats.result_percent, 0);
        assert_eq!(stats.total, 30);
    }
}
