//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use note_chart::ChartStyle;
use note_core::{NoteError, Result};
use serde::{Deserialize, Serialize};

/// Settings for one equity session.
///
/// Every field has a default; [`PipelineConfig::from_env`] overlays `NOTE_*`
/// environment variables on top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Text-extraction proxy base URL.
    pub proxy_base: String,
    /// Price provider host.
    pub provider_host: String,
    /// Suffix for tickers without a market part.
    pub market_suffix: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// HTTP user agent.
    pub user_agent: String,
    /// Pause between drawing the chart and capturing it, in milliseconds.
    pub capture_delay_ms: u64,
    /// Rendered chart width in pixels.
    pub chart_width: u32,
    /// Rendered chart height in pixels.
    pub chart_height: u32,
    /// Width of the chart as placed in the document.
    pub display_width: u32,
    /// Height of the chart as placed in the document.
    pub display_height: u32,
    /// Extra font files tried before the built-in search list.
    pub font_paths: Vec<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        #[cfg_attr(not(feature = "stooq"), allow(unused_mut))]
        let mut config = Self {
            proxy_base: String::new(),
            provider_host: String::new(),
            market_suffix: String::new(),
            timeout_secs: 0,
            user_agent: String::new(),
            capture_delay_ms: 300,
            chart_width: 1300,
            chart_height: 600,
            display_width: 650,
            display_height: 300,
            font_paths: Vec::new(),
        };

        #[cfg(feature = "stooq")]
        {
            let source = note_stooq::SourceConfig::default();
            config.proxy_base = source.proxy_base;
            config.provider_host = source.provider_host;
            config.market_suffix = source.market_suffix;
            config.timeout_secs = note_stooq::DEFAULT_TIMEOUT_SECS;
            config.user_agent = note_stooq::USER_AGENT.to_string();
        }

        config
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `NOTE_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`NoteError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("NOTE_PROXY_BASE") {
            config.proxy_base = v;
        }
        if let Some(v) = lookup("NOTE_PROVIDER_HOST") {
            config.provider_host = v;
        }
        if let Some(v) = lookup("NOTE_MARKET_SUFFIX") {
            config.market_suffix = v;
        }
        if let Some(v) = lookup("NOTE_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = lookup("NOTE_HTTP_TIMEOUT_SECS") {
            config.timeout_secs = parse_var("NOTE_HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("NOTE_CAPTURE_DELAY_MS") {
            config.capture_delay_ms = parse_var("NOTE_CAPTURE_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("NOTE_CHART_WIDTH") {
            config.chart_width = parse_var("NOTE_CHART_WIDTH", &v)?;
        }
        if let Some(v) = lookup("NOTE_CHART_HEIGHT") {
            config.chart_height = parse_var("NOTE_CHART_HEIGHT", &v)?;
        }
        if let Some(v) = lookup("NOTE_FONT_PATH") {
            config.font_paths.push(PathBuf::from(v));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make the pipeline unusable.
    pub fn validate(&self) -> Result<()> {
        #[cfg(feature = "stooq")]
        {
            if self.proxy_base.trim().is_empty() {
                return Err(NoteError::Config("proxy base must not be empty".to_string()));
            }
            if self.provider_host.trim().is_empty() {
                return Err(NoteError::Config("provider host must not be empty".to_string()));
            }
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(NoteError::Config(format!(
                "chart size {}x{} has a zero side",
                self.chart_width, self.chart_height
            )));
        }
        Ok(())
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pause before capturing the chart.
    #[must_use]
    pub const fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture_delay_ms)
    }

    /// Chart style at the configured pixel size.
    #[must_use]
    pub fn chart_style(&self) -> ChartStyle {
        let style = ChartStyle::default().with_size(self.chart_width, self.chart_height);
        if self.font_paths.is_empty() {
            return style;
        }
        let mut paths = self.font_paths.clone();
        paths.extend(style.font_paths.iter().cloned());
        style.with_font_paths(paths)
    }

    /// Request settings for the Stooq source.
    #[cfg(feature = "stooq")]
    #[must_use]
    pub fn source_config(&self) -> note_stooq::SourceConfig {
        note_stooq::SourceConfig {
            proxy_base: self.proxy_base.clone(),
            provider_host: self.provider_host.clone(),
            market_suffix: self.market_suffix.clone(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| NoteError::Config(format!("{key}={value:?} is not a valid number")))
}
