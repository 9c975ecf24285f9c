//! Core data types for the equity pipeline.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Ticker`] - User-entered ticker symbol
//! - [`PricePoint`] - One daily close
//! - [`PriceSeries`] - Ordered collection of closes with helper methods
//! - [`EquityStats`] - Derived statistics, all present or all absent
//! - [`ChartImage`] - Rasterized chart ready for embedding

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{NoteError, Result};

/// A ticker symbol as typed by the author.
///
/// Tickers are trimmed and uppercased on creation. A ticker may already carry
/// a market suffix (`VOD.UK`); otherwise the source appends its default.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a ticker, rejecting empty or unmappable input.
    pub fn new(s: impl AsRef<str>) -> Result<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NoteError::InvalidTicker("ticker is empty".to_string()));
        }
        if trimmed.starts_with('.') || trimmed.ends_with('.') {
            return Err(NoteError::InvalidTicker(format!(
                "'{trimmed}' has an empty symbol or market part"
            )));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '^')))
        {
            return Err(NoteError::InvalidTicker(format!(
                "'{trimmed}' contains unsupported character '{bad}'"
            )));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ticker already names its market (contains a period).
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// One daily close.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price, strictly positive.
    pub close: f64,
}

impl PricePoint {
    /// Creates a new price point.
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Returns true if the close is finite and strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Ordered daily price series, ascending by date in source order.
///
/// Gaps (non-trading days) are expected. Duplicate dates are not rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a series from points already in date order.
    #[must_use]
    pub const fn from_points(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Appends a point.
    pub fn push(&mut self, point: PricePoint) {
        self.points.push(point);
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First (oldest) point.
    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Last (most recent) point.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Points as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing prices in series order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Dates formatted as `YYYY-MM-DD`, in series order.
    #[must_use]
    pub fn date_labels(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect()
    }

    /// Returns the date range covered by the series.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }

    /// Consumes the series and returns the underlying vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<PricePoint> {
        self.points
    }
}

impl IntoIterator for PriceSeries {
    type Item = PricePoint;
    type IntoIter = std::vec::IntoIter<PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Statistics derived from one filtered series.
///
/// Produced as a unit by a single computation and reset as a unit on any
/// failure, so a reader never sees values from two different fetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityStats {
    /// Close of the last point in the window.
    pub current_price: Option<f64>,
    /// Annualized realized volatility of daily returns.
    pub realised_vol_ann: Option<f64>,
    /// Return from the first to the last close in the window.
    pub range_return: Option<f64>,
}

impl EquityStats {
    /// Statistics with every field absent.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            current_price: None,
            realised_vol_ann: None,
            range_return: None,
        }
    }

    /// Returns true if no field is present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.current_price.is_none()
            && self.realised_vol_ann.is_none()
            && self.range_return.is_none()
    }

    /// Returns true if every field is present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current_price.is_some()
            && self.realised_vol_ann.is_some()
            && self.range_return.is_some()
    }
}

/// PNG rendering of the last successful chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartImage {
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl ChartImage {
    /// Wraps encoded PNG bytes.
    #[must_use]
    pub const fn new(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self { png, width, height }
    }

    /// Returns the encoded size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.png.len()
    }

    /// Returns true if no bytes were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}
