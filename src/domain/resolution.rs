//! Sampling resolution of a data feed.

use chrono::Duration;
use std::fmt;
use std::str::FromStr;

use super::error::TradefeedError;

/// Sampling granularity, ordered finest to coarsest so `min()` picks the finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resolution {
    Tick,
    Second,
    Minute,
    Hour,
    Daily,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::Tick,
        Resolution::Second,
        Resolution::Minute,
        Resolution::Hour,
        Resolution::Daily,
    ];

    /// Time between emissions of this feed. Ticks are individual events, so zero.
    pub fn increment(self) -> Duration {
        match self {
            Resolution::Tick => Duration::zero(),
            Resolution::Second => Duration::seconds(1),
            Resolution::Minute => Duration::minutes(1),
            Resolution::Hour => Duration::hours(1),
            Resolution::Daily => Duration::days(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Tick => "tick",
            Resolution::Second => "second",
            Resolution::Minute => "minute",
            Resolution::Hour => "hour",
            Resolution::Daily => "daily",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = TradefeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tick" => Ok(Resolution::Tick),
            "second" => Ok(Resolution::Second),
            "minute" => Ok(Resolution::Minute),
            "hour" => Ok(Resolution::Hour),
            "daily" | "day" => Ok(Resolution::Daily),
            _ => Err(TradefeedError::UnsupportedResolution {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<u8> for Resolution {
    type Error = TradefeedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Resolution::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| TradefeedError::UnsupportedResolution {
                value: value.to_string(),
            })
    }
}
