//! CF-convention time coordinates: `"<unit> since <reference>"`.

use crate::gridded::error::GriddedDataError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn seconds(self) -> f64 {
        match self {
            TimeUnit::Days => 86_400.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Seconds => 1.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            "hours" | "hour" | "h" | "hr" => Ok(TimeUnit::Hours),
            "minutes" | "minute" | "min" => Ok(TimeUnit::Minutes),
            "seconds" | "second" | "s" | "sec" => Ok(TimeUnit::Seconds),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
        };
        write!(f, "{name}")
    }
}

/// Parsed `units` attribute of a time coordinate. Decoding uses the proleptic Gregorian
/// calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub reference: NaiveDateTime,
}

impl TimeUnits {
    /// Parses strings such as `"days since 1850-01-01"` or
    /// `"hours since 1970-01-01 00:00:00"`. A trailing `T`, `Z` or timezone offset on the
    /// reference is ignored.
    pub fn parse(units: &str) -> Result<TimeUnits, GriddedDataError> {
        let invalid = || GriddedDataError::InvalidTimeUnits(units.to_string());

        let mut parts = units.split_whitespace();
        let unit: TimeUnit = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        if !parts.next().is_some_and(|word| word.eq_ignore_ascii_case("since")) {
            return Err(invalid());
        }

        let date_part = parts.next().ok_or_else(invalid)?;
        let (date_str, inline_time) = match date_part.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (date_part, None),
        };
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| invalid())?;

        let time = match inline_time.or_else(|| parts.next()) {
            Some(raw) => parse_time_of_day(raw).ok_or_else(invalid)?,
            None => NaiveTime::MIN,
        };

        Ok(TimeUnits {
            unit,
            reference: date.and_time(time),
        })
    }

    /// Converts a raw coordinate value to a timestamp. Returns `None` when the result is
    /// outside chrono's range or the value is not finite.
    pub fn decode(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let seconds = value * self.unit.seconds();
        let whole = seconds.trunc();
        if whole.abs() > i64::MAX as f64 {
            return None;
        }
        let nanos = ((seconds - whole) * 1e9).round() as i64;
        let delta = TimeDelta::try_seconds(whole as i64)?.checked_add(&TimeDelta::nanoseconds(nanos))?;
        self.reference.checked_add_signed(delta)
    }

    pub fn decode_date(&self, value: f64) -> Option<NaiveDate> {
        self.decode(value).map(|t| t.date())
    }
}

impl fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} since {}",
            self.unit,
            self.reference.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim_end_matches('Z');
    let trimmed = trimmed
        .find(['+', '-'])
        .map_or(trimmed, |offset| &trimmed[..offset]);
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
}
