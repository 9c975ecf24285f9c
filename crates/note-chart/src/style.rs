use std::path::PathBuf;

/// Fonts tried, in order, for titles and tick labels.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Appearance of the price chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    /// Pixel width of the rendered chart.
    pub width: u32,
    /// Pixel height of the rendered chart.
    pub height: u32,
    /// Stroke width of the price line.
    pub line_width: u32,
    /// Curve smoothing, 0.0 draws straight segments.
    pub tension: f64,
    /// Upper bound on tick labels per axis.
    pub max_ticks: usize,
    /// Price line colour as RGB.
    pub line_color: (u8, u8, u8),
    /// Fonts tried for text; the first readable one wins.
    pub font_paths: Vec<PathBuf>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1300,
            height: 600,
            line_width: 2,
            tension: 0.3,
            max_ticks: 6,
            line_color: (31, 78, 121),
            font_paths: DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl ChartStyle {
    /// Sets the pixel size.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Replaces the font search list.
    #[must_use]
    pub fn with_font_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.font_paths = paths;
        self
    }
}
