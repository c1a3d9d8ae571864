//! The fixed set of calendar themes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A theme for a 30-day calendar.
///
/// The title doubles as the persisted identifier of the active topic; the
/// slug is used inside per-topic storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    NewYear,
    Winter,
    Summer,
    Fun,
    Productivity,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::NewYear,
        Topic::Winter,
        Topic::Summer,
        Topic::Fun,
        Topic::Productivity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Topic::NewYear => "New Year",
            Topic::Winter => "Winter",
            Topic::Summer => "Summer",
            Topic::Fun => "Fun",
            Topic::Productivity => "Productivity",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Topic::NewYear => "new_year",
            Topic::Winter => "winter",
            Topic::Summer => "summer",
            Topic::Fun => "fun",
            Topic::Productivity => "productivity",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    /// Accepts either the title ("New Year") or the slug ("new_year"),
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Topic::ALL
            .into_iter()
            .find(|t| t.title().eq_ignore_ascii_case(needle) || t.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownTopic(s.to_string()))
    }
}
