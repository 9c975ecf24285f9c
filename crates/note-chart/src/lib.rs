#![doc(issue_tracker_base_url = "https://github.com/factordynamics/note/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Price line chart rendering.
//!
//! A [`ChartSurface`] owns at most one live [`RenderedChart`]. Rendering a new
//! chart tears the previous one down first; rasterizing encodes the live
//! chart as PNG for embedding in the exported document.
//!
//! # Example
//!
//! ```no_run
//! use note_chart::{ChartSpec, ChartStyle, ChartSurface};
//!
//! # fn example() -> note_core::Result<()> {
//! let mut surface = ChartSurface::new(ChartStyle::default());
//! let spec = ChartSpec::new(
//!     vec!["2024-01-02".into(), "2024-01-03".into()],
//!     vec![185.64, 184.25],
//!     "AAPL (6M)",
//! );
//! surface.render(spec)?;
//! let image = surface.rasterize()?;
//! println!("{} PNG bytes", image.map(|i| i.len()).unwrap_or(0));
//! # Ok(())
//! # }
//! ```

mod font;
mod smooth;
mod style;
mod surface;

pub use smooth::smooth_line;
pub use style::{ChartStyle, DEFAULT_FONT_PATHS};
pub use surface::{ChartSpec, ChartSurface, RenderedChart};
