//! Trailing range window definitions.
//!
//! This module defines [`RangeWindow`], the caller-selected span used to
//! truncate a price series before statistics are computed.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NoteError;

/// Trailing window applied to a price series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeWindow {
    /// Six calendar months.
    #[serde(rename = "6mo")]
    SixMonths,
    /// One calendar year.
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    /// Two calendar years.
    #[serde(rename = "2y")]
    TwoYears,
    /// Five calendar years.
    #[serde(rename = "5y")]
    FiveYears,
}

impl RangeWindow {
    /// All windows in ascending order of length.
    pub const ALL: [Self; 4] = [
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
    ];

    /// Returns the window length in calendar months.
    #[must_use]
    pub const fn months(&self) -> u32 {
        match self {
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
            Self::FiveYears => 60,
        }
    }

    /// Returns the earliest date included by this window, relative to `today`.
    ///
    /// Uses calendar subtraction, so a month-end date clamps to the last day
    /// of the target month.
    #[must_use]
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Short label for status lines and chart titles.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::TwoYears => "2Y",
            Self::FiveYears => "5Y",
        }
    }

    /// Wire value as sent by the range selector.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// Parses a selector value, falling back to one year for anything unknown.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for RangeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangeWindow {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "6mo" | "6m" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            other => Err(NoteError::Config(format!("unknown range window: {other}"))),
        }
    }
}
