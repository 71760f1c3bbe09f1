//! Daily fire-time calculation.
//!
//! A `DailySchedule` is a wall-clock time of day ("HH:MM") in a fixed IANA
//! time zone. The scheduler asks it for the first fire instant strictly after
//! "now"; later fires are fixed 24-hour increments from that instant.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed interval between consecutive fires after the first one.
pub const FIRE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// Errors that can occur when parsing or using schedules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Time of day is not `HH:MM` with hour 0–23 and minute 0–59.
    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    /// Invalid timezone.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// A wall-clock time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Create a time of day, validating the ranges.
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime(format!("{}:{}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Hour component (0–23).
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Minute component (0–59).
    pub fn minute(&self) -> u32 {
        self.minute
    }

    fn as_naive(&self) -> NaiveTime {
        // Ranges are validated on construction.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Parses `H:MM`/`HH:MM`, tolerating surrounding whitespace and single-digit
/// components ("8:5" is 08:05).
impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A once-a-day schedule anchored to a time zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySchedule {
    at: TimeOfDay,
    timezone: Tz,
}

impl DailySchedule {
    /// Create a schedule for `at` in the given IANA time zone.
    pub fn new(at: TimeOfDay, timezone: &str) -> Result<Self, ScheduleError> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ScheduleError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { at, timezone })
    }

    /// Time of day this schedule fires at.
    pub fn at(&self) -> TimeOfDay {
        self.at
    }

    /// The schedule's time zone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Next fire strictly after `after`.
    ///
    /// If today's local occurrence is not in the future the target moves to
    /// tomorrow. A local time that falls into a DST gap resolves to the first
    /// valid instant after the gap; an ambiguous one to its earlier instant.
    pub fn next_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let local_today = after.with_timezone(&self.timezone).date_naive();
        let mut day = local_today;
        loop {
            let candidate = self.resolve(day.and_time(self.at.as_naive()));
            if candidate > after {
                return candidate;
            }
            day = day.succ_opt().unwrap_or(day);
        }
    }

    /// Delay from `now` until the next fire.
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        self.next_after(now) - now
    }

    fn resolve(&self, local: chrono::NaiveDateTime) -> DateTime<Utc> {
        match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                // Skipped by a DST transition; walk forward to the first valid minute.
                let mut shifted = local;
                loop {
                    shifted += Duration::minutes(1);
                    if let Some(dt) = self.timezone.from_local_datetime(&shifted).earliest() {
                        return dt.with_timezone(&Utc);
                    }
                }
            }
        }
    }
}
