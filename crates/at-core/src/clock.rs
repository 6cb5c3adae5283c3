//! Conversions between clock text and minute values.
//!
//! Everything here is total: malformed text degrades to a fixed default
//! instead of returning an error, so a single bad record can never abort a
//! timeline computation.
//!
//! Absolute values are minutes since 1970-01-01 00:00 on a naive calendar
//! (no time zones, every day is exactly 1440 minutes long).

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// [`MINUTES_PER_DAY`] as a float, for absolute-time arithmetic.
pub const DAY_MINUTES: f64 = 1440.0;

/// Duration used when a duration expression cannot be understood.
pub const DEFAULT_DURATION_MINUTES: f64 = 30.0;

/// Last representable minute of a day (23:59).
const LAST_MINUTE: u32 = MINUTES_PER_DAY - 1;

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parses `"HH:MM"` into minutes since midnight.
///
/// Missing or non-numeric components count as zero and values past 23:59 are
/// clamped to 1439. Never fails.
pub fn parse_time_of_day(text: &str) -> u32 {
    let mut parts = text.split(':');
    let hours = parts.next().and_then(parse_component).unwrap_or(0);
    let minutes = parts.next().and_then(parse_component).unwrap_or(0);
    hours
        .saturating_mul(60)
        .saturating_add(minutes)
        .min(LAST_MINUTE)
}

fn parse_component(part: &str) -> Option<u32> {
    part.trim().parse().ok()
}

/// Formats minutes as zero-padded `"HH:MM"`, wrapping modulo one day.
///
/// Fractional minutes are floored.
#[allow(clippy::cast_possible_truncation)]
pub fn format_time_of_day(minutes: f64) -> String {
    let whole = if minutes.is_finite() {
        minutes.floor() as i64
    } else {
        0
    };
    let wrapped = whole.rem_euclid(i64::from(MINUTES_PER_DAY));
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Parses a duration expression into minutes.
///
/// Accepts `"H:MM:SS"`, `"MM:SS"` or a bare (possibly fractional) minute
/// count. Returns `None` for any other shape, and for values that are not
/// strictly positive.
pub fn try_parse_duration(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let minutes = if text.contains(':') {
        let parts = text
            .split(':')
            .map(|part| part.trim().parse::<f64>().ok().filter(|v| *v >= 0.0))
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [hours, minutes, seconds] => hours * 60.0 + minutes + seconds / 60.0,
            [minutes, seconds] => minutes + seconds / 60.0,
            _ => return None,
        }
    } else {
        text.parse::<f64>().ok()?
    };

    (minutes.is_finite() && minutes > 0.0).then_some(minutes)
}

/// Parses a duration expression, falling back to
/// [`DEFAULT_DURATION_MINUTES`] when it is unrecognized.
pub fn parse_duration(text: &str) -> f64 {
    try_parse_duration(text).unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// Formats minutes as `"H:MM:SS"`, or `"M:SS"` under one hour.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(minutes: f64) -> String {
    let total_seconds = if minutes.is_finite() && minutes > 0.0 {
        (minutes * 60.0).round() as u64
    } else {
        0
    };
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

/// Absolute minute of `date`'s midnight.
pub fn day_start(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) * DAY_MINUTES
}

/// Calendar date containing the absolute minute `absolute`.
///
/// Values outside chrono's date range saturate to [`NaiveDate::MIN`] or
/// [`NaiveDate::MAX`].
#[allow(clippy::cast_possible_truncation)]
pub fn date_of(absolute: f64) -> NaiveDate {
    let days = (absolute / DAY_MINUTES).floor() as i64;
    i64::from(UNIX_EPOCH_DAYS_FROM_CE)
        .checked_add(days)
        .and_then(|d| i32::try_from(d).ok())
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// A minute of the day in `[0, 1439]`.
///
/// Serializes as `"HH:MM"`; deserialization is lenient and follows
/// [`parse_time_of_day`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// 00:00.
    pub const MIDNIGHT: Self = Self(0);

    /// Builds a time of day, wrapping `minutes` modulo one day.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(u16::try_from(minutes % MINUTES_PER_DAY).unwrap_or_default())
    }

    /// Parses `"HH:MM"` leniently.
    pub fn parse(text: &str) -> Self {
        Self::from_minutes(parse_time_of_day(text))
    }

    /// Time of day of an absolute minute, floored to the whole minute.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn of_absolute(absolute: f64) -> Self {
        let offset = (absolute - day_start(date_of(absolute))).floor();
        Self::from_minutes(offset.clamp(0.0, f64::from(LAST_MINUTE)) as u32)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}
