//! Live read-outs and the status line.

use std::fmt;

use note_core::{EquityStats, RangeWindow};
use note_stats::{format_pct, format_price, upside_to_target};
use serde::{Deserialize, Serialize};

/// State of the most recent fetch, as shown on the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Nothing fetched yet, or the form was reset.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded for this window.
    Ready(RangeWindow),
    /// The last fetch failed for this reason.
    Failed(String),
}

impl Status {
    /// Returns true while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Loading => f.write_str("Fetching price data…"),
            Self::Ready(window) => write!(f, "✓ Chart updated ({window})"),
            Self::Failed(reason) => write!(f, "✗ {reason}"),
        }
    }
}

/// The four textual read-outs next to the chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readouts {
    /// Current price, two decimals.
    pub current_price: String,
    /// Annualized realized volatility, one-decimal percent.
    pub realised_vol: String,
    /// Range return, one-decimal percent.
    pub range_return: String,
    /// Upside to target, one-decimal percent.
    pub upside: String,
}

impl Readouts {
    /// Formats `stats`, computing upside against `target_price`.
    #[must_use]
    pub fn new(stats: &EquityStats, target_price: Option<f64>) -> Self {
        Self {
            current_price: format_price(stats.current_price),
            realised_vol: format_pct(stats.realised_vol_ann),
            range_return: format_pct(stats.range_return),
            upside: format_pct(upside_to_target(stats.current_price, target_price)),
        }
    }
}
