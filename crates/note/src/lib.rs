#![doc(issue_tracker_base_url = "https://github.com/factordynamics/note/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Equity section pipeline for research notes.
//!
//! This crate ties the pipeline stages together behind an [`EquitySession`]:
//! a ticker and range go in; statistics, a PNG chart and four read-outs come
//! out. The session commits statistics and chart as one unit and resets both
//! on any failure, so the document builder never sees a mix of two fetches.
//!
//! The [`Visibility`] state machine decides whether the equity section is
//! shown and what an export requires.
//!
//! # Features
//!
//! - `stooq` - Stooq daily price source through a text-extraction proxy
//!
//! # Example
//!
//! ```rust,ignore
//! use note::{EquitySession, PipelineConfig, RangeWindow};
//!
//! #[tokio::main]
//! async fn main() -> note::Result<()> {
//!     let session = EquitySession::from_config(PipelineConfig::from_env()?)?;
//!
//!     session.set_target_price(Some(210.0));
//!     session.fetch_chart("AAPL", RangeWindow::OneYear).await?;
//!
//!     let readouts = session.readouts();
//!     println!("{} | vol {} | upside {}", readouts.current_price, readouts.realised_vol, readouts.upside);
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use note_core::*;

// Pipeline stages
pub use note_chart::{ChartSpec, ChartStyle, ChartSurface, RenderedChart};
pub use note_stats::{
    PLACEHOLDER, compute_stats, filter_range, format_pct, format_price, upside_to_target,
};

// Sources
#[cfg(feature = "stooq")]
pub use note_stooq::{HttpFetcher, SourceConfig, StooqSource};

mod config;
mod document;
mod readout;
mod session;
mod visibility;

pub use config::PipelineConfig;
pub use document::{ChartDisplay, DocumentRequest, MissingItem, NoteForm, missing_for_export};
pub use readout::{Readouts, Status};
pub use session::{EquitySession, PipelineOutputs};
pub use visibility::{EQUITY_RESEARCH, FieldRequirements, Transition, Visibility};
