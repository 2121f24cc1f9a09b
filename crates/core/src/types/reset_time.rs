//! Daily reset time of day.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize, de};

/// Errors that can occur when parsing a [`ResetTime`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ResetTimeError {
    /// The input does not match `HH:MM`.
    #[error("reset time must match HH:MM")]
    BadFormat,
    /// The hour is outside 00-23.
    #[error("reset time hour must be 00-23 (got {0})")]
    HourOutOfRange(u8),
    /// The minute is outside 00-59.
    #[error("reset time minute must be 00-59 (got {0})")]
    MinuteOutOfRange(u8),
}

/// The wall-clock UTC time of day at which the daily reset becomes due.
///
/// Stored and transmitted as `HH:MM`. The external scheduler runs on UTC, so
/// no timezone offset is ever applied.
///
/// ## Examples
///
/// ```
/// use chargeboard_core::ResetTime;
///
/// let t = ResetTime::parse("06:30").unwrap();
/// assert_eq!(t.hour(), 6);
/// assert_eq!(t.minute(), 30);
/// assert_eq!(t.to_string(), "06:30");
///
/// assert!(ResetTime::parse("6:30").is_err());  // needs two digits
/// assert!(ResetTime::parse("25:00").is_err()); // no such hour
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ResetTime {
    hour: u8,
    minute: u8,
}

impl ResetTime {
    /// The value seeded into a fresh database.
    pub const DEFAULT: Self = Self { hour: 6, minute: 0 };

    /// Parse a `ResetTime` from an `HH:MM` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not match `\d{2}:\d{2}` or the
    /// hour/minute fall outside a valid time of day.
    pub fn parse(s: &str) -> Result<Self, ResetTimeError> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes.get(2) != Some(&b':') {
            return Err(ResetTimeError::BadFormat);
        }

        let (hh, mm) = (
            s.get(0..2).ok_or(ResetTimeError::BadFormat)?,
            s.get(3..5).ok_or(ResetTimeError::BadFormat)?,
        );
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ResetTimeError::BadFormat);
        }
        let hour: u8 = hh.parse().map_err(|_| ResetTimeError::BadFormat)?;
        let minute: u8 = mm.parse().map_err(|_| ResetTimeError::BadFormat)?;

        if hour > 23 {
            return Err(ResetTimeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(ResetTimeError::MinuteOutOfRange(minute));
        }

        Ok(Self { hour, minute })
    }

    /// Hour of day, 0-23.
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of hour, 0-59.
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }
}

impl Default for ResetTime {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ResetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl From<ResetTime> for String {
    fn from(t: ResetTime) -> Self {
        t.to_string()
    }
}

impl FromStr for ResetTime {
    type Err = ResetTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ResetTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
