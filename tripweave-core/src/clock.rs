//! Wall-clock and week-relative time.
//!
//! Opening hours are expressed as [`ClockTime`] values on a [`Weekday`]; the
//! search clock is a [`WeekInstant`], a count of seconds since Monday 00:00 of
//! the planning week.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds in one day.
pub const SECONDS_PER_DAY: u32 = 86_400;
/// Seconds in one week.
pub const SECONDS_PER_WEEK: u32 = 7 * SECONDS_PER_DAY;

const SECONDS_PER_HOUR: u32 = 3_600;

/// Errors returned when parsing a [`ClockTime`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockTimeError {
    /// The value was not four ASCII digits.
    #[error("clock time {raw:?} must be four digits in HHMM form")]
    Malformed {
        /// Offending input.
        raw: String,
    },
    /// Hours or minutes were out of range.
    #[error("clock time {raw:?} is outside 0000..=2400")]
    OutOfRange {
        /// Offending input.
        raw: String,
    },
}

/// Time of day with second precision, `00:00` to `24:00` inclusive.
///
/// The wire form is the four-digit `"HHMM"` string used by opening hours and
/// fixed-time requests.
///
/// # Examples
/// ```
/// use tripweave_core::ClockTime;
///
/// let lunch: ClockTime = "1300".parse()?;
/// assert_eq!(lunch.hours(), 13);
/// assert_eq!(lunch.to_string(), "1300");
/// # Ok::<(), tripweave_core::ClockTimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    /// Start of the day.
    pub const MIDNIGHT: Self = Self(0);
    /// End of the day (`"2400"`).
    pub const END_OF_DAY: Self = Self(SECONDS_PER_DAY);

    /// Build a time from hours and minutes; `24:00` is the latest value.
    #[must_use]
    pub const fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if minutes > 59 || hours > 24 || (hours == 24 && minutes > 0) {
            return None;
        }
        Some(Self(hours * SECONDS_PER_HOUR + minutes * 60))
    }

    /// Build a time from seconds since midnight.
    #[must_use]
    pub const fn from_seconds(seconds: u32) -> Option<Self> {
        if seconds > SECONDS_PER_DAY {
            None
        } else {
            Some(Self(seconds))
        }
    }

    /// Seconds since midnight.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Whole hours since midnight.
    #[expect(clippy::integer_division, reason = "partial hours are discarded")]
    #[must_use]
    pub const fn hours(self) -> u32 {
        self.0 / SECONDS_PER_HOUR
    }

    /// Minutes past the hour.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "minutes are the truncated remainder of the hour"
    )]
    #[must_use]
    pub const fn minutes(self) -> u32 {
        (self.0 % SECONDS_PER_HOUR) / 60
    }

    /// Parse the four-digit `"HHMM"` form.
    pub fn parse_hhmm(raw: &str) -> Result<Self, ClockTimeError> {
        if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClockTimeError::Malformed {
                raw: raw.to_owned(),
            });
        }
        let (hh, mm) = raw.split_at(2);
        let parse = |part: &str| {
            part.parse::<u32>().map_err(|_| ClockTimeError::Malformed {
                raw: raw.to_owned(),
            })
        };
        Self::from_hm(parse(hh)?, parse(mm)?).ok_or_else(|| ClockTimeError::OutOfRange {
            raw: raw.to_owned(),
        })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Zero-based index with Monday as `0`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    /// Inverse of [`Weekday::index`]; indices wrap modulo seven.
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "day indices wrap around the week"
    )]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index % 7 {
            0 => Self::Monday,
            1 => Self::Tuesday,
            2 => Self::Wednesday,
            3 => Self::Thursday,
            4 => Self::Friday,
            5 => Self::Saturday,
            _ => Self::Sunday,
        }
    }

    /// Convert from the venue-data convention where `0` is Sunday.
    #[must_use]
    pub const fn from_sunday_based(day: u8) -> Option<Self> {
        match day {
            0 => Some(Self::Sunday),
            1..=6 => Some(Self::from_index(day as usize - 1)),
            _ => None,
        }
    }

    /// Index in the venue-data convention where `0` is Sunday.
    #[must_use]
    pub const fn sunday_based(self) -> u8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// The day before, wrapping Monday to Sunday.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 6)
    }

    /// Three-letter English abbreviation.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Seconds since Monday 00:00 of the planning week.
///
/// Values past the end of the week are allowed so the clock can run over
/// Sunday midnight; [`WeekInstant::weekday`] wraps.
///
/// # Examples
/// ```
/// use tripweave_core::{ClockTime, WeekInstant, Weekday};
///
/// let at = WeekInstant::new(Weekday::Tuesday, ClockTime::from_hm(9, 30).unwrap());
/// assert_eq!(at.weekday(), Weekday::Tuesday);
/// assert_eq!(at.hour_bucket(), 9);
/// assert_eq!(at.plus_seconds(3_600).clock().to_string(), "1030");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WeekInstant(u32);

impl WeekInstant {
    /// The instant `time` on `day`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "weekday indices are below seven"
    )]
    #[must_use]
    pub const fn new(day: Weekday, time: ClockTime) -> Self {
        let day_offset = day.index() as u32 * SECONDS_PER_DAY;
        Self(day_offset + time.seconds())
    }

    /// Wrap a raw second count.
    #[must_use]
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Seconds since Monday 00:00.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Day of the week this instant falls on.
    #[expect(clippy::integer_division, reason = "whole days since Monday")]
    #[must_use]
    pub const fn weekday(self) -> Weekday {
        Weekday::from_index((self.0 / SECONDS_PER_DAY) as usize)
    }

    /// Time of day.
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "the clock wraps every day"
    )]
    #[must_use]
    pub const fn clock(self) -> ClockTime {
        ClockTime(self.0 % SECONDS_PER_DAY)
    }

    /// Hour-of-day bucket in `0..24`.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "buckets truncate to the hour of the day"
    )]
    #[must_use]
    pub const fn hour_bucket(self) -> usize {
        ((self.0 % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as usize
    }

    /// Advance by `seconds`, saturating.
    #[must_use]
    pub const fn plus_seconds(self, seconds: u32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Advance by a [`Duration`], saturating.
    #[must_use]
    pub fn plus(self, duration: Duration) -> Self {
        let seconds = u32::try_from(duration.as_secs()).unwrap_or(u32::MAX);
        self.plus_seconds(seconds)
    }

    /// Seconds from `earlier` to `self`, or zero when `earlier` is later.
    #[must_use]
    pub const fn seconds_since(self, earlier: Self) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// Absolute distance in seconds between two instants.
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for WeekInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday(), self.clock())
    }
}
