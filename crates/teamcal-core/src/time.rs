//! Time-of-day types for calendar scheduling.
//!
//! This module provides [`TimeOfDay`] for representing a wall-clock time as a
//! minute-of-day value, and [`TimeSlot`] for a half-open `[start, end)`
//! interval within a single day.
//!
//! All times are local wall-clock; no timezone handling happens here.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Minutes in a day. [`TimeOfDay`] values are always strictly below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error raised when a time string cannot be parsed as `HH:MM`.
///
/// Unparsable input is always a hard error; it is never silently replaced
/// with a default time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed time string: {input:?} (expected HH:MM)")]
pub struct MalformedTimeError {
    /// The input that failed to parse.
    pub input: String,
}

impl MalformedTimeError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// A wall-clock time of day, stored as a minute-of-day integer (`0..1440`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Creates a time of day from hour and minute components.
    ///
    /// Returns `None` if `hour > 23` or `minute > 59`.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Creates a time of day from a raw minute-of-day value.
    ///
    /// Returns `None` if the value is out of range.
    pub fn from_minute_of_day(minute: u16) -> Option<Self> {
        (minute < MINUTES_PER_DAY).then_some(Self(minute))
    }

    /// Returns the minute-of-day value (`0..1440`).
    pub fn minute_of_day(&self) -> u16 {
        self.0
    }

    /// Returns the hour component (`0..24`).
    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    /// Returns the minute component (`0..60`).
    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Adds a number of minutes, returning `None` if the result would pass
    /// midnight.
    pub fn checked_add_minutes(&self, minutes: u16) -> Option<Self> {
        let total = self.0.checked_add(minutes)?;
        // A slot may end exactly at midnight (1440), which is a valid
        // exclusive endpoint but not a valid start.
        (total <= MINUTES_PER_DAY).then_some(Self(total))
    }

    /// Converts to a [`chrono::NaiveTime`] at second zero.
    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour()) % 24, u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = MalformedTimeError;

    /// Parses a strict `HH:MM` time string.
    ///
    /// Accepts one or two digits for the hour and exactly two for the
    /// minute. Anything else is a [`MalformedTimeError`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hh, mm) = s.split_once(':').ok_or_else(|| MalformedTimeError::new(s))?;
        if hh.is_empty()
            || hh.len() > 2
            || mm.len() != 2
            || !hh.bytes().all(|b| b.is_ascii_digit())
            || !mm.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(MalformedTimeError::new(s));
        }
        let hour: u16 = hh.parse().map_err(|_| MalformedTimeError::new(s))?;
        let minute: u16 = mm.parse().map_err(|_| MalformedTimeError::new(s))?;
        Self::from_hm(hour, minute).ok_or_else(|| MalformedTimeError::new(s))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` interval within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start of the slot (inclusive).
    pub start: TimeOfDay,
    /// End of the slot (exclusive).
    pub end: TimeOfDay,
}

impl TimeSlot {
    /// Creates a new time slot.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not strictly before `end`. Callers that accept
    /// untrusted input must validate the window first.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        assert!(start < end, "TimeSlot start must be < end");
        Self { start, end }
    }

    /// Parses a slot from two `HH:MM` strings.
    ///
    /// Returns `None` (wrapped) when the window is inverted or empty; the
    /// parse itself fails with [`MalformedTimeError`] on bad input.
    pub fn parse(start: &str, end: &str) -> Result<Option<Self>, MalformedTimeError> {
        let start: TimeOfDay = start.parse()?;
        let end: TimeOfDay = end.parse()?;
        Ok((start < end).then(|| Self { start, end }))
    }

    /// Returns the slot duration in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minute_of_day() - self.start.minute_of_day()
    }

    /// Checks whether two half-open slots overlap.
    ///
    /// Uses `a.start < b.end && a.end > b.start`: slots that merely touch
    /// at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Checks whether a time of day falls within this slot.
    pub fn contains(&self, t: TimeOfDay) -> bool {
        self.start <= t && t < self.end
    }
}

impl PartialOrd for TimeSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tod(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::from_hm(h, m).unwrap()
    }

    mod time_of_day {
        use super::*;

        #[test]
        fn creation() {
            let t = tod(9, 30);
            assert_eq!(t.hour(), 9);
            assert_eq!(t.minute(), 30);
            assert_eq!(t.minute_of_day(), 570);
        }

        #[test]
        fn out_of_range_components() {
            assert!(TimeOfDay::from_hm(24, 0).is_none());
            assert!(TimeOfDay::from_hm(9, 60).is_none());
            assert!(TimeOfDay::from_minute_of_day(1440).is_none());
            assert!(TimeOfDay::from_minute_of_day(1439).is_some());
        }

        #[test]
        fn parse_valid() {
            assert_eq!("09:00".parse::<TimeOfDay>().unwrap(), tod(9, 0));
            assert_eq!("9:05".parse::<TimeOfDay>().unwrap(), tod(9, 5));
            assert_eq!("23:59".parse::<TimeOfDay>().unwrap(), tod(23, 59));
            assert_eq!("00:00".parse::<TimeOfDay>().unwrap(), tod(0, 0));
        }

        #[test]
        fn parse_malformed() {
            for input in ["", "9am", "24:00", "12:60", "12:5", "1200", ":30", "12:", "a:bc"] {
                let err = input.parse::<TimeOfDay>().unwrap_err();
                assert_eq!(err.input, input, "input {input:?} must fail");
            }
        }

        #[test]
        fn no_silent_default_on_parse_failure() {
            // The engine used to fall back to 09:00/10:00 on bad input;
            // bad input must now surface as an error.
            assert!("garbage".parse::<TimeOfDay>().is_err());
        }

        #[test]
        fn display_roundtrip() {
            let t = tod(7, 5);
            assert_eq!(t.to_string(), "07:05");
            assert_eq!(t.to_string().parse::<TimeOfDay>().unwrap(), t);
        }

        #[test]
        fn checked_add() {
            assert_eq!(tod(9, 0).checked_add_minutes(60), Some(tod(10, 0)));
            assert_eq!(
                tod(23, 0).checked_add_minutes(60).unwrap().minute_of_day(),
                MINUTES_PER_DAY
            );
            assert!(tod(23, 30).checked_add_minutes(60).is_none());
        }

        #[test]
        fn ordering() {
            assert!(tod(9, 0) < tod(9, 30));
            assert!(tod(17, 0) > tod(9, 30));
        }

        #[test]
        fn serde_as_string() {
            let json = serde_json::to_string(&tod(14, 30)).unwrap();
            assert_eq!(json, "\"14:30\"");
            let parsed: TimeOfDay = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, tod(14, 30));
            assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
        }
    }

    mod time_slot {
        use super::*;

        fn slot(sh: u16, sm: u16, eh: u16, em: u16) -> TimeSlot {
            TimeSlot::new(tod(sh, sm), tod(eh, em))
        }

        #[test]
        fn creation_and_duration() {
            let s = slot(9, 0, 10, 30);
            assert_eq!(s.duration_minutes(), 90);
            assert_eq!(s.to_string(), "09:00-10:30");
        }

        #[test]
        #[should_panic(expected = "start must be < end")]
        fn inverted_window() {
            slot(10, 0, 9, 0);
        }

        #[test]
        fn parse_rejects_inverted_and_malformed() {
            assert!(TimeSlot::parse("10:00", "09:00").unwrap().is_none());
            assert!(TimeSlot::parse("10:00", "10:00").unwrap().is_none());
            assert!(TimeSlot::parse("10:00", "bogus").is_err());
            assert_eq!(
                TimeSlot::parse("09:00", "10:00").unwrap(),
                Some(slot(9, 0, 10, 0))
            );
        }

        #[test]
        fn overlap_half_open() {
            let busy = slot(9, 0, 10, 0);

            // Fully inside / equal
            assert!(busy.overlaps(&slot(9, 15, 9, 45)));
            assert!(busy.overlaps(&slot(9, 0, 10, 0)));

            // Straddling either edge
            assert!(busy.overlaps(&slot(8, 30, 9, 30)));
            assert!(busy.overlaps(&slot(9, 30, 10, 30)));

            // Containing
            assert!(busy.overlaps(&slot(8, 0, 11, 0)));

            // Touching endpoints is not overlap
            assert!(!busy.overlaps(&slot(8, 0, 9, 0)));
            assert!(!busy.overlaps(&slot(10, 0, 11, 0)));

            // Disjoint
            assert!(!busy.overlaps(&slot(11, 0, 12, 0)));
        }

        #[test]
        fn contains() {
            let s = slot(9, 0, 10, 0);
            assert!(s.contains(tod(9, 0)));
            assert!(s.contains(tod(9, 59)));
            assert!(!s.contains(tod(10, 0)));
            assert!(!s.contains(tod(8, 59)));
        }

        #[test]
        fn ordering_by_start_then_end() {
            let mut slots = vec![slot(10, 0, 11, 0), slot(9, 0, 10, 0), slot(9, 0, 9, 30)];
            slots.sort();
            assert_eq!(
                slots,
                vec![slot(9, 0, 9, 30), slot(9, 0, 10, 0), slot(10, 0, 11, 0)]
            );
        }

        #[test]
        fn serde_roundtrip() {
            let s = slot(9, 0, 17, 0);
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, r#"{"start":"09:00","end":"17:00"}"#);
            let parsed: TimeSlot = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, s);
        }
    }
}
