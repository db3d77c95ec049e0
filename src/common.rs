/// Common types and utilities shared across handlers and services
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Calendar quarter used to bucket usage records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Quarter containing the given calendar month (1-12)
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Quarter::Q1),
            2 => Some(Quarter::Q2),
            3 => Some(Quarter::Q3),
            4 => Some(Quarter::Q4),
            _ => None,
        }
    }
}

/// A fiscal-quarter bucket such as `Q1 2025`.
///
/// Ordering is chronological: year first, then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub quarter: Quarter,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid period label '{0}', expected e.g. 'Q1 2025'")]
pub struct PeriodParseError(pub String);

impl Period {
    pub fn new(year: i32, quarter: Quarter) -> Self {
        Self { year, quarter }
    }

    /// Period that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: Quarter::from_month(date.month()),
        }
    }

    /// Label for the period containing `date`, e.g. `"Q4 2025"`
    pub fn label_for(date: NaiveDate) -> String {
        Self::containing(date).to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter.number(), self.year)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PeriodParseError(s.to_string());
        let mut parts = s.split_whitespace();
        let (quarter, year) = match (parts.next(), parts.next(), parts.next()) {
            (Some(q), Some(y), None) => (q, y),
            _ => return Err(err()),
        };

        let quarter = quarter
            .strip_prefix('Q')
            .or_else(|| quarter.strip_prefix('q'))
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(Quarter::from_number)
            .ok_or_else(err)?;
        let year = year.parse::<i32>().map_err(|_| err())?;

        Ok(Period { year, quarter })
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
