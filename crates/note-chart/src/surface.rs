//! The chart surface and its single live chart.

use std::ops::Range;

use image::ExtendedColorType;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use note_core::{ChartImage, NoteError, PriceSeries, Result};
use plotters::prelude::*;
use tracing::{debug, instrument};

use crate::font::{FAMILY, ensure_font};
use crate::smooth::smooth_line;
use crate::style::ChartStyle;

const GRID: RGBColor = RGBColor(232, 232, 232);
const TITLE_SIZE: u32 = 28;
const LABEL_SIZE: u32 = 18;

/// What to draw: parallel date labels and closes plus a title.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// X-axis labels, one per value.
    pub labels: Vec<String>,
    /// Closing prices.
    pub values: Vec<f64>,
    /// Chart title.
    pub title: String,
}

impl ChartSpec {
    /// Creates a spec from parallel arrays.
    #[must_use]
    pub fn new(labels: Vec<String>, values: Vec<f64>, title: impl Into<String>) -> Self {
        Self {
            labels,
            values,
            title: title.into(),
        }
    }

    /// Creates a spec from a price series.
    #[must_use]
    pub fn from_series(series: &PriceSeries, title: impl Into<String>) -> Self {
        Self::new(series.date_labels(), series.closes(), title)
    }

    fn validate(&self) -> Result<()> {
        if self.labels.len() != self.values.len() {
            return Err(NoteError::Render(format!(
                "{} labels for {} values",
                self.labels.len(),
                self.values.len()
            )));
        }
        if self.values.len() < 2 {
            return Err(NoteError::InsufficientData(
                "a line chart needs at least two points".to_string(),
            ));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(NoteError::Render("non-finite value in chart data".to_string()));
        }
        Ok(())
    }
}

/// A drawn chart held in memory as an RGB pixel buffer.
#[derive(Clone)]
pub struct RenderedChart {
    spec: ChartSpec,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    plot_x: Range<i32>,
    labelled: bool,
}

impl std::fmt::Debug for RenderedChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedChart")
            .field("title", &self.spec.title)
            .field("points", &self.spec.values.len())
            .field("size", &(self.width, self.height))
            .field("labelled", &self.labelled)
            .finish()
    }
}

impl RenderedChart {
    /// The data this chart was drawn from.
    #[must_use]
    pub const fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    /// Pixel dimensions.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether title and tick labels were drawn.
    #[must_use]
    pub const fn is_labelled(&self) -> bool {
        self.labelled
    }

    /// Tooltip text for the point at `index`.
    #[must_use]
    pub fn tooltip_at(&self, index: usize) -> Option<String> {
        let label = self.spec.labels.get(index)?;
        let value = self.spec.values.get(index)?;
        Some(format!("{label}: {value:.2}"))
    }

    /// Index-mode lookup: the point nearest to pixel column `x`.
    #[must_use]
    pub fn index_at_pixel(&self, x: i32) -> Option<usize> {
        let last = self.spec.values.len().checked_sub(1)?;
        let span = (self.plot_x.end - self.plot_x.start).max(1) as f64;
        let frac = (x.saturating_sub(self.plot_x.start) as f64 / span).clamp(0.0, 1.0);
        Some((frac * last as f64).round() as usize)
    }

    /// Tooltip for whatever point sits under pixel column `x`.
    #[must_use]
    pub fn tooltip_at_pixel(&self, x: i32) -> Option<String> {
        self.tooltip_at(self.index_at_pixel(x)?)
    }

    /// Encodes the pixel buffer as PNG.
    pub fn to_png(&self) -> Result<ChartImage> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&self.pixels, self.width, self.height, ExtendedColorType::Rgb8)
            .map_err(render_err)?;
        Ok(ChartImage::new(png, self.width, self.height))
    }
}

/// Display surface holding at most one live chart.
#[derive(Debug)]
pub struct ChartSurface {
    style: ChartStyle,
    available: bool,
    live: Option<RenderedChart>,
}

impl ChartSurface {
    /// Creates a surface that draws with `style`.
    #[must_use]
    pub const fn new(style: ChartStyle) -> Self {
        Self {
            style,
            available: true,
            live: None,
        }
    }

    /// Creates a surface without charting capability.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            style: ChartStyle::default(),
            available: false,
            live: None,
        }
    }

    /// Returns true if this surface can draw.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Returns the drawing style.
    #[must_use]
    pub const fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// The live chart, if any.
    #[must_use]
    pub const fn live(&self) -> Option<&RenderedChart> {
        self.live.as_ref()
    }

    /// Tears down the live chart. Returns true if there was one.
    pub fn destroy(&mut self) -> bool {
        match self.live.take() {
            Some(chart) => {
                debug!(title = %chart.spec.title, "Destroyed live chart");
                true
            }
            None => false,
        }
    }

    /// Draws `spec`, replacing the live chart.
    ///
    /// The previous chart is destroyed before drawing starts, so a failed draw
    /// leaves the surface empty.
    ///
    /// # Errors
    ///
    /// [`NoteError::RenderingUnavailable`] on a surface without charting,
    /// [`NoteError::InsufficientData`] for fewer than two points,
    /// [`NoteError::Render`] if drawing fails.
    #[instrument(skip(self, spec), fields(title = %spec.title, points = spec.values.len()))]
    pub fn render(&mut self, spec: ChartSpec) -> Result<&RenderedChart> {
        if !self.available {
            return Err(NoteError::RenderingUnavailable);
        }
        self.destroy();
        spec.validate()?;

        let labelled = ensure_font(&self.style.font_paths);
        let (pixels, plot_x) = draw(&spec, &self.style, labelled)?;
        debug!(labelled, "Rendered chart");

        Ok(&*self.live.insert(RenderedChart {
            spec,
            pixels,
            width: self.style.width,
            height: self.style.height,
            plot_x,
            labelled,
        }))
    }

    /// Encodes the live chart as PNG. `None` if nothing is rendered.
    pub fn rasterize(&self) -> Result<Option<ChartImage>> {
        self.live.as_ref().map(RenderedChart::to_png).transpose()
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> NoteError {
    NoteError::Render(e.to_string())
}

fn value_bounds(values: &[f64]) -> Range<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = if max > min { (max - min) * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - pad)..(max + pad)
}

fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn draw(spec: &ChartSpec, style: &ChartStyle, labelled: bool) -> Result<(Vec<u8>, Range<i32>)> {
    let (width, height) = (style.width, style.height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    let x_max = (spec.values.len() - 1) as f64;
    let (r, g, b) = style.line_color;
    let line = RGBColor(r, g, b).stroke_width(style.line_width);

    let plot_x = {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if labelled {
            builder
                .caption(&spec.title, (FAMILY, TITLE_SIZE))
                .x_label_area_size(40)
                .y_label_area_size(80);
        }
        let mut chart = builder
            .build_cartesian_2d(0f64..x_max, value_bounds(&spec.values))
            .map_err(render_err)?;

        let x_fmt = |x: &f64| label_at(&spec.labels, *x);
        let y_fmt = |y: &f64| format!("{y:.2}");
        {
            let mut mesh = chart.configure_mesh();
            mesh.x_labels(style.max_ticks)
                .y_labels(style.max_ticks)
                .light_line_style(&GRID)
                .label_style((FAMILY, LABEL_SIZE))
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt);
            if !labelled {
                mesh.disable_x_axis().disable_y_axis();
            }
            mesh.draw().map_err(render_err)?;
        }

        chart
            .draw_series(LineSeries::new(
                smooth_line(&spec.values, style.tension),
                line,
            ))
            .map_err(render_err)?;

        let plot_x = chart.plotting_area().get_pixel_range().0;
        root.present().map_err(render_err)?;
        plot_x
    };

    Ok((pixels, plot_x))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn small_style() -> ChartStyle {
        ChartStyle::default().with_size(320, 160)
    }

    fn spec(n: usize) -> ChartSpec {
        let labels = (0..n).map(|i| format!("2024-01-{:02}", i + 1)).collect();
        let values = (0..n).map(|i| 100.0 + i as f64).collect();
        ChartSpec::new(labels, values, "TEST (6M)")
    }

    #[test]
    fn test_render_and_rasterize() {
        let mut surface = ChartSurface::new(small_style());
        surface.render(spec(12)).unwrap();

        let image = surface.rasterize().unwrap().unwrap();
        assert!(image.png.starts_with(PNG_MAGIC));
        assert_eq!((image.width, image.height), (320, 160));
    }

    #[test]
    fn test_render_replaces_live_chart() {
        let mut surface = ChartSurface::new(small_style());
        surface.render(spec(10)).unwrap();
        surface.render(spec(15)).unwrap();

        assert_eq!(surface.live().unwrap().spec().values.len(), 15);
        assert!(surface.destroy());
        assert!(!surface.destroy());
        assert!(surface.rasterize().unwrap().is_none());
    }

    #[test]
    fn test_failed_render_clears_previous() {
        let mut surface = ChartSurface::new(small_style());
        surface.render(spec(10)).unwrap();

        let err = surface.render(spec(1)).unwrap_err();
        assert!(err.is_insufficient_data());
        assert!(surface.live().is_none());
    }

    #[test]
    fn test_mismatched_spec_is_rejected() {
        let mut surface = ChartSurface::new(small_style());
        let bad = ChartSpec::new(vec!["a".into()], vec![1.0, 2.0], "bad");
        assert!(matches!(surface.render(bad), Err(NoteError::Render(_))));
    }

    #[test]
    fn test_unavailable_surface() {
        let mut surface = ChartSurface::unavailable();
        assert!(!surface.is_available());
        assert_eq!(
            surface.render(spec(10)).unwrap_err(),
            NoteError::RenderingUnavailable
        );
        assert!(surface.rasterize().unwrap().is_none());
    }

    #[test]
    fn test_index_mode_tooltip() {
        let mut surface = ChartSurface::new(small_style());
        let chart = surface.render(spec(10)).unwrap();

        assert_eq!(chart.tooltip_at(0).unwrap(), "2024-01-01: 100.00");
        assert_eq!(chart.tooltip_at(9).unwrap(), "2024-01-10: 109.00");
        assert!(chart.tooltip_at(10).is_none());
        assert_eq!(chart.index_at_pixel(i32::MIN / 2), Some(0));
        assert_eq!(chart.index_at_pixel(i32::MAX / 2), Some(9));
    }

    #[test]
    fn test_index_at_extreme_pixels() {
        let mut surface = ChartSurface::new(small_style());
        let chart = surface.render(spec(10)).unwrap();

        assert_eq!(chart.index_at_pixel(i32::MIN), Some(0));
        assert_eq!(chart.index_at_pixel(i32::MAX), Some(9));
        assert_eq!(
            chart.tooltip_at_pixel(i32::MIN).unwrap(),
            "2024-01-01: 100.00"
        );
    }

    #[test]
    fn test_from_series() {
        use chrono::NaiveDate;
        use note_core::PricePoint;

        let series: PriceSeries = (0..3)
            .map(|i| {
                PricePoint::new(
                    NaiveDate::from_ymd_opt(2024, 3, 1 + i).unwrap(),
                    10.0 + f64::from(i),
                )
            })
            .collect();
        let spec = ChartSpec::from_series(&series, "X");
        assert_eq!(spec.labels, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert_eq!(spec.values, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_flat_series_bounds() {
        let bounds = value_bounds(&[50.0, 50.0]);
        assert!(bounds.start < 50.0 && bounds.end > 50.0);
    }
}
