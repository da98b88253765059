//! Exchange time zone and weekly session calendar.
//!
//! Setup and feed synthesis read only `time_zone`. The session calendar is
//! part of what an `ExchangeHoursPort` returns, for callers that filter by
//! trading hours.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionHours {
    Closed,
    AllDay,
    /// Open from `open` (inclusive) to `close` (exclusive), local time.
    /// A close of midnight runs to the end of the day.
    Window { open: NaiveTime, close: NaiveTime },
}

impl SessionHours {
    fn contains(&self, time: NaiveTime) -> bool {
        match *self {
            SessionHours::Closed => false,
            SessionHours::AllDay => true,
            SessionHours::Window { open, close } => {
                time >= open && (close == NaiveTime::MIN || time < close)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeHours {
    pub time_zone: Tz,
    /// Indexed by `Weekday::num_days_from_monday`.
    pub sessions: [SessionHours; 7],
}

impl ExchangeHours {
    pub fn always_open(time_zone: Tz) -> Self {
        Self {
            time_zone,
            sessions: [SessionHours::AllDay; 7],
        }
    }

    /// Same window every weekday, closed on weekends.
    pub fn weekdays(time_zone: Tz, open: NaiveTime, close: NaiveTime) -> Self {
        let mut sessions = [SessionHours::Window { open, close }; 7];
        sessions[Weekday::Sat.num_days_from_monday() as usize] = SessionHours::Closed;
        sessions[Weekday::Sun.num_days_from_monday() as usize] = SessionHours::Closed;
        Self {
            time_zone,
            sessions,
        }
    }

    pub fn with_session(mut self, day: Weekday, hours: SessionHours) -> Self {
        self.sessions[day.num_days_from_monday() as usize] = hours;
        self
    }

    pub fn session(&self, day: Weekday) -> SessionHours {
        self.sessions[day.num_days_from_monday() as usize]
    }

    /// Whether the exchange is open at `local`, expressed in the exchange's time zone.
    pub fn is_open(&self, local: NaiveDateTime) -> bool {
        self.session(local.weekday()).contains(local.time())
    }
}
