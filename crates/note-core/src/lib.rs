#![doc(issue_tracker_base_url = "https://github.com/factordynamics/note/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the research note equity pipeline.
//!
//! This crate provides the foundational abstractions shared by every stage of
//! the price-statistics pipeline:
//!
//! - [`Ticker`](types::Ticker), [`PricePoint`](types::PricePoint) and
//!   [`PriceSeries`](types::PriceSeries) - the normalized time series
//! - [`RangeWindow`](range::RangeWindow) - trailing window selection
//! - [`EquityStats`](types::EquityStats) and [`ChartImage`](types::ChartImage) -
//!   the pipeline outputs consumed at export time
//! - [`TextFetcher`](provider::TextFetcher) - pluggable fetch strategy
//! - [`PriceSource`](provider::PriceSource) - daily price source
//! - [`NoteError`](error::NoteError) - the error taxonomy

/// Error types for pipeline operations.
pub mod error;
/// Provider traits for fetching price data.
pub mod provider;
/// Trailing range window definitions.
pub mod range;
/// Core data types (Ticker, PriceSeries, EquityStats, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{NoteError, Result};
pub use provider::{PriceSource, TextFetcher};
pub use range::RangeWindow;
pub use types::{ChartImage, EquityStats, PricePoint, PriceSeries, Ticker};
