use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use chrono::{DateTime, FixedOffset, Local, NaiveDate};

pub type Timestamp = DateTime<FixedOffset>;

const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The current wall clock time with the local offset.
pub fn now() -> Timestamp {
    Local::now().fixed_offset()
}

/// Parses a timestamp as written in the trip tables.
///
/// Accepts `2018-05-25 11:52:40 -0700`, RFC 3339, and a bare date which is
/// read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_str(value, STORAGE_FORMAT) {
        return Some(time);
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time);
    }
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().fixed_offset())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes * 60)
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self(hours * 60 * 60)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    /// Whole seconds from `start` to `end`.
    /// None if `end` is before `start` or the span does not fit.
    pub fn between(start: &Timestamp, end: &Timestamp) -> Option<Self> {
        let secs = end.signed_duration_since(start).num_seconds();
        u32::try_from(secs).ok().map(Self)
    }

    pub fn to_hms_string(&self) -> String {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, value| acc + value)
    }
}
