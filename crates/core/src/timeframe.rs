//! Ranking and analytics time windows.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Time window that selects which ledger records count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Daily,
        Timeframe::Weekly,
        Timeframe::Monthly,
        Timeframe::AllTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::AllTime => "all_time",
        }
    }

    /// Rolling window length, or `None` for all time.
    pub fn window(self) -> Option<Duration> {
        match self {
            Timeframe::Daily => Some(Duration::days(1)),
            Timeframe::Weekly => Some(Duration::days(7)),
            Timeframe::Monthly => Some(Duration::days(30)),
            Timeframe::AllTime => None,
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    pub fn window_start(self, now: Timestamp) -> Option<Timestamp> {
        self.window().map(|w| now - w)
    }

    /// Whether an event at `at` falls inside the window ending at `now`.
    ///
    /// Bounded windows are `start..=now`; events after `now` are excluded.
    pub fn contains(self, at: Timestamp, now: Timestamp) -> bool {
        match self.window_start(now) {
            Some(start) => at >= start && at <= now,
            None => true,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown timeframe '{s}'. Expected one of: daily, weekly, monthly, all_time"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn all_time_has_no_window() {
        assert!(Timeframe::AllTime.window_start(now()).is_none());
        assert!(Timeframe::AllTime.contains(Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(), now()));
    }

    #[test]
    fn weekly_window_is_seven_days() {
        let start = Timeframe::Weekly.window_start(now()).unwrap();
        assert_eq!(now() - start, Duration::days(7));
    }

    #[test]
    fn window_lower_bound_is_inclusive() {
        let start = Timeframe::Daily.window_start(now()).unwrap();
        assert!(Timeframe::Daily.contains(start, now()));
        assert!(!Timeframe::Daily.contains(start - Duration::seconds(1), now()));
    }

    #[test]
    fn window_upper_bound_is_now() {
        assert!(Timeframe::Weekly.contains(now(), now()));
        assert!(!Timeframe::Weekly.contains(now() + Duration::seconds(1), now()));
    }

    #[test]
    fn parse_round_trips() {
        for t in Timeframe::ALL {
            assert_eq!(t.as_str().parse::<Timeframe>().unwrap(), t);
        }
        assert!("yearly".parse::<Timeframe>().is_err());
    }
}
