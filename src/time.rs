use crate::error::TowerError;
use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use std::ops::{Add, Sub};

/// Wall-clock instant, minute resolution for display.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, PartialOrd)]
pub struct Time(pub NaiveDateTime);

impl Time {
    pub fn now() -> Self {
        Time(Local::now().naive_local())
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        date.and_hms_opt(hour, minute, 0).map(Time)
    }

    /// Resolves an `HH:MM` time of day against `now`. A time that is not
    /// strictly after `now` is taken to mean the same time tomorrow.
    pub fn departure_from(time_of_day: &str, now: Time) -> Result<Time, TowerError> {
        let invalid = || TowerError::InvalidTimeFormat {
            input: time_of_day.to_string(),
        };
        let (hour, minute) = time_of_day.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        let departure = Time::at(now.0.date(), hour, minute).ok_or_else(invalid)?;
        if departure <= now {
            Ok(departure + TimeDelta::days(1))
        } else {
            Ok(departure)
        }
    }

    /// Fractional minutes from `self` until `later`; negative if `later` is in the past.
    pub fn minutes_until(self, later: Time) -> f64 {
        (later - self).num_milliseconds() as f64 / 60_000.0
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Add<TimeDelta> for Time {
    type Output = Self;

    fn add(self, rhs: TimeDelta) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl Sub<TimeDelta> for Time {
    type Output = Self;

    fn sub(self, rhs: TimeDelta) -> Self::Output {
        Time(self.0 - rhs)
    }
}

impl Sub<Time> for Time {
    type Output = TimeDelta;

    fn sub(self, rhs: Time) -> Self::Output {
        self.0 - rhs.0
    }
}
