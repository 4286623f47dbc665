//! Immutable UTC instant.
//!
//! Every constructor resolves its input to UTC before anything else, and
//! input that does not name exactly one moment (naive text, a local time
//! that is skipped or repeated by a zone transition) is rejected.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::TimeError;
use crate::julian::{SECONDS_PER_DAY, UNIX_EPOCH_JD, calendar_to_jd};

/// A UTC point in time with a derived Julian Day (UT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    utc: DateTime<Utc>,
}

impl Instant {
    /// Wrap a UTC datetime.
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        Self { utc }
    }

    /// Resolve any zone-aware datetime to UTC.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            utc: dt.with_timezone(&Utc),
        }
    }

    /// Interpret a naive local datetime in `tz`.
    ///
    /// Fails with [`TimeError::InvalidTime`] when the local time is repeated
    /// (DST fall-back) or skipped (DST spring-forward) in that zone.
    pub fn from_local<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Result<Self, TimeError> {
        resolve_local(tz.from_local_datetime(&naive), naive)
    }

    /// Build from UTC calendar fields.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeError> {
        match Utc.with_ymd_and_hms(year, month, day, hour, minute, second) {
            LocalResult::Single(utc) => Ok(Self { utc }),
            _ => Err(TimeError::InvalidTime(format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} is not a valid UTC time"
            ))),
        }
    }

    /// Parse RFC 3339 text. An explicit offset (`Z` or `±hh:mm`) is required.
    pub fn parse(text: &str) -> Result<Self, TimeError> {
        match DateTime::parse_from_rfc3339(text) {
            Ok(dt) => Ok(Self::from_datetime(&dt)),
            Err(e) => {
                if text.parse::<NaiveDateTime>().is_ok() {
                    Err(TimeError::InvalidTime(format!(
                        "'{text}' has no UTC offset; naive timestamps are ambiguous"
                    )))
                } else {
                    Err(TimeError::InvalidTime(format!("'{text}': {e}")))
                }
            }
        }
    }

    /// Instant at a Julian Day (UT).
    pub fn from_julian_day(jd: f64) -> Result<Self, TimeError> {
        if !jd.is_finite() {
            return Err(TimeError::OutOfRange(jd));
        }
        let micros = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1e6).round();
        if micros.abs() > i64::MAX as f64 {
            return Err(TimeError::OutOfRange(jd));
        }
        DateTime::from_timestamp_micros(micros as i64)
            .map(Self::from_utc)
            .ok_or(TimeError::OutOfRange(jd))
    }

    /// Julian Day (UT) of this instant.
    pub fn julian_day(&self) -> f64 {
        let day_fraction = (self.utc.hour() as f64
            + self.utc.minute() as f64 / 60.0
            + (self.utc.second() as f64 + self.utc.nanosecond() as f64 / 1e9) / 3600.0)
            / 24.0;
        calendar_to_jd(
            self.utc.year(),
            self.utc.month(),
            self.utc.day() as f64 + day_fraction,
        )
    }

    /// Midnight UTC at the start of this instant's calendar day.
    pub fn start_of_day(&self) -> Self {
        let midnight = self.utc.date_naive().and_time(chrono::NaiveTime::MIN);
        Self {
            utc: Utc.from_utc_datetime(&midnight),
        }
    }

    /// Underlying UTC datetime.
    pub fn datetime(&self) -> DateTime<Utc> {
        self.utc
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(utc: DateTime<Utc>) -> Self {
        Self::from_utc(utc)
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.utc.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

fn resolve_local<Tz: TimeZone>(
    result: LocalResult<DateTime<Tz>>,
    naive: NaiveDateTime,
) -> Result<Instant, TimeError> {
    match result {
        LocalResult::Single(dt) => Ok(Instant::from_datetime(&dt)),
        LocalResult::Ambiguous(_, _) => Err(TimeError::InvalidTime(format!(
            "local time {naive} is ambiguous in the given zone"
        ))),
        LocalResult::None => Err(TimeError::InvalidTime(format!(
            "local time {naive} does not exist in the given zone"
        ))),
    }
}
