use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use std::{fmt, str::FromStr};

use crate::error::OutlookError;

/// Format of the calendar-day key used to group samples.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format of sunrise / sunset times in a day summary.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Time zone in which timestamps are turned into calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// Whatever the host considers local time.
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    pub const fn utc() -> Self {
        Zone::Named(Tz::UTC)
    }

    /// Wall-clock time of the instant in this zone. `None` when the instant
    /// or its shifted local value falls outside chrono's range.
    fn localize(&self, ts: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0)?.naive_utc();

        let offset = match self {
            Zone::Local => chrono::Local.offset_from_utc_datetime(&utc).fix(),
            Zone::Named(tz) => tz.offset_from_utc_datetime(&utc).fix(),
        };

        utc.checked_add_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
    }

    /// `YYYY-MM-DD` of the instant in this zone, or `None` when the
    /// timestamp cannot be represented.
    pub fn date_key(&self, ts: i64) -> Option<String> {
        self.localize(ts).map(|dt| dt.format(DATE_KEY_FORMAT).to_string())
    }

    /// `HH:MM:SS` of the instant in this zone.
    pub fn time_of_day(&self, ts: i64) -> Option<String> {
        self.localize(ts).map(|dt| dt.format(TIME_OF_DAY_FORMAT).to_string())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = OutlookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }

        trimmed
            .parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| OutlookError::UnknownTimeZone(trimmed.to_string()))
    }
}
