use co2_utils::error::ParseError;
use co2_utils::numbers::parse_year;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Earliest year a period may name.
pub const MIN_YEAR: i32 = 1000;
/// Latest year a period may name.
pub const MAX_YEAR: i32 = 9999;

/// A time filter: one exact year, or the closed decade `[start, start + 9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Year(i32),
    Decade(i32),
}

impl Period {
    /// Build a single-year period. The year must have four digits.
    pub fn year(year: i32) -> Result<Period, ParseError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(Period::Year(year))
        } else {
            Err(ParseError::YearOutOfRange(year))
        }
    }

    /// Build a decade period. The start must be a four-digit multiple of 10.
    pub fn decade(start: i32) -> Result<Period, ParseError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&start) {
            Err(ParseError::YearOutOfRange(start))
        } else if start.rem_euclid(10) != 0 {
            Err(ParseError::InvalidDecade(start))
        } else {
            Ok(Period::Decade(start))
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        let (first, last) = self.bounds();
        first <= year && year <= last
    }

    /// First and last year covered, inclusive.
    pub fn bounds(&self) -> (i32, i32) {
        match *self {
            Period::Year(y) => (y, y),
            Period::Decade(start) => (start, start.saturating_add(9)),
        }
    }

    /// Every year in this period as its own `Period::Year`.
    pub fn years(&self) -> Vec<Period> {
        let (first, last) = self.bounds();
        (first..=last).map(Period::Year).collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(y) => write!(f, "{y}"),
            Period::Decade(start) => write!(f, "{start}s"),
        }
    }
}

/// `"2000"` is a year, `"2000s"` a decade.
impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.strip_suffix('s') {
            Some(start) => {
                let start = parse_year(start).ok_or_else(|| ParseError::InvalidYear(s.to_string()))?;
                Period::decade(start)
            }
            None => {
                let year = parse_year(trimmed).ok_or_else(|| ParseError::InvalidYear(s.to_string()))?;
                Period::year(year)
            }
        }
    }
}

/// Years serialize as numbers so chart axes can treat them as values.
impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Period::Year(y) => serializer.serialize_i32(*y),
            Period::Decade(_) => serializer.collect_str(self),
        }
    }
}

/// Accepts a bare number (a year) or any string [`Period::from_str`] takes.
impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Year(i32),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Year(y) => Period::year(y).map_err(serde::de::Error::custom),
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
