//! Time-related types for Premier League seasons and gameweeks.

use crate::error::{FplError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Premier League season, displayed as `"YYYY-YY"` (e.g. `2024-25`).
///
/// ```rust
/// use fpl_gameweek::SeasonLabel;
///
/// let season = SeasonLabel::starting(2024);
/// assert_eq!(season.to_string(), "2024-25");
/// assert_eq!(season.end_year(), 2025);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeasonLabel {
    start_year: i32,
}

impl SeasonLabel {
    pub fn starting(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }
}

impl fmt::Display for SeasonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}",
            self.start_year,
            self.end_year().rem_euclid(100)
        )
    }
}

impl FromStr for SeasonLabel {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FplError::MissingSchedule {
            reason: format!("`{}` is not a season label of the form YYYY-YY", s),
        };

        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start_year: i32 = start.parse().map_err(|_| invalid())?;
        let end_suffix: i32 = end.parse().map_err(|_| invalid())?;
        let season = Self::starting(start_year);

        if end.len() != 2 || season.end_year().rem_euclid(100) != end_suffix {
            return Err(invalid());
        }
        Ok(season)
    }
}

impl Serialize for SeasonLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeasonLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Gameweek number within a season, always in `1..=38`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GameweekNumber(u8);

impl GameweekNumber {
    pub const FIRST: GameweekNumber = GameweekNumber(1);
    pub const LAST: GameweekNumber = GameweekNumber(38);

    /// Create a gameweek number, rejecting anything outside `1..=38`.
    pub fn new(number: u8) -> Result<Self> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&number) {
            Ok(Self(number))
        } else {
            Err(FplError::InvalidGameweek {
                value: number.to_string(),
            })
        }
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// All gameweeks from 1 through `self`, ascending.
    pub fn up_to(self) -> impl Iterator<Item = GameweekNumber> {
        (Self::FIRST.0..=self.0).map(GameweekNumber)
    }
}

impl TryFrom<u8> for GameweekNumber {
    type Error = FplError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<GameweekNumber> for u8 {
    fn from(gw: GameweekNumber) -> u8 {
        gw.0
    }
}

impl fmt::Display for GameweekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameweekNumber {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self> {
        let number: u8 = s.trim().parse().map_err(|_| FplError::InvalidGameweek {
            value: s.to_string(),
        })?;
        Self::new(number)
    }
}
