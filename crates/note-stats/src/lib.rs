#![doc(issue_tracker_base_url = "https://github.com/factordynamics/note/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Range filtering and price statistics.
//!
//! Everything here is a pure function over a [`PriceSeries`](note_core::PriceSeries):
//!
//! - [`filter_range`] - trailing window with a minimum sample size
//! - [`compute_stats`] - current price, range return, annualized volatility
//! - [`upside_to_target`] - live upside against an analyst target
//! - [`format_pct`] / [`format_price`] - read-out formatting

/// Read-out formatting.
pub mod format;
/// Trailing window filtering.
pub mod range;
/// Returns, volatility and derived statistics.
pub mod returns;

pub use format::{PLACEHOLDER, format_pct, format_price};
pub use range::{MIN_RANGE_POINTS, filter_range};
pub use returns::{
    MIN_CONFIDENT_RETURNS, StatsSummary, TRADING_DAYS_PER_YEAR, compute_stats, daily_returns,
    sample_std_dev, summarize, upside_to_target,
};
