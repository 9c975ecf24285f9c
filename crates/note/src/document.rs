//! Hand-off to the document builder.
//!
//! The builder owns every document-format concern. This module only gathers
//! what it needs for the equity section and checks what an export is missing.

use std::fmt;

use note_core::{ChartImage, EquityStats};
use serde::{Deserialize, Serialize};

use crate::session::PipelineOutputs;
use crate::visibility::Visibility;

/// Form fields the equity section depends on, as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    /// Note type selector value.
    pub note_type: String,
    /// Ticker input.
    pub ticker: String,
    /// Rating selector value, empty if unset.
    pub rating: String,
    /// Target price input, empty if unset.
    pub target_price: String,
}

impl NoteForm {
    /// Visibility derived from the note type.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        Visibility::from_note_type(&self.note_type)
    }

    /// Parsed target price; `None` when blank or not a number.
    #[must_use]
    pub fn target_price_value(&self) -> Option<f64> {
        parse_price(&self.target_price)
    }
}

/// Parses a price input, accepting blanks and thousands separators.
pub(crate) fn parse_price(input: &str) -> Option<f64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Size at which the chart image is placed in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDisplay {
    /// Display width in document units.
    pub width: u32,
    /// Display height in document units.
    pub height: u32,
}

impl Default for ChartDisplay {
    fn default() -> Self {
        Self {
            width: 650,
            height: 300,
        }
    }
}

/// Everything the document builder receives for the equity section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Note type selector value.
    pub note_type: String,
    /// Ticker as entered.
    pub ticker: String,
    /// Rating, if set.
    pub rating: Option<String>,
    /// Target price, if set.
    pub target_price: Option<f64>,
    /// Statistics from the last successful fetch, or all absent.
    pub stats: EquityStats,
    /// Upside from the current price to the target.
    pub upside: Option<f64>,
    /// PNG chart from the last successful fetch.
    pub chart: Option<ChartImage>,
    /// Placement size for the chart image.
    pub display: ChartDisplay,
    /// Whether the builder should emit the equity section at all.
    pub equity_section: bool,
}

/// A required item an export is missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingItem {
    /// Ticker input is blank.
    Ticker,
    /// Rating is unset.
    Rating,
    /// No successful price fetch has been made.
    PriceStatistics,
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ticker => "Ticker",
            Self::Rating => "Rating",
            Self::PriceStatistics => "Price chart and statistics",
        })
    }
}

/// Lists what the equity section still needs before export.
///
/// Outside equity research nothing is required here, even if statistics from
/// an earlier fetch are still held.
#[must_use]
pub fn missing_for_export(form: &NoteForm, outputs: &PipelineOutputs) -> Vec<MissingItem> {
    let requirements = form.visibility().requirements();
    let mut missing = Vec::new();

    if requirements.stats_required && form.ticker.trim().is_empty() {
        missing.push(MissingItem::Ticker);
    }
    if requirements.rating_required && form.rating.trim().is_empty() {
        missing.push(MissingItem::Rating);
    }
    if requirements.stats_required && !outputs.stats.is_complete() {
        missing.push(MissingItem::PriceStatistics);
    }
    missing
}
