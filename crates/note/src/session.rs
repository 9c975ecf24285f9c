//! The equity pipeline session.
//!
//! One [`EquitySession`] owns the price source, the single chart surface and
//! the committed statistics/chart pair. Fetches run sequentially: ingestion,
//! range filter, statistics, render, capture delay, rasterize. Outputs are
//! committed together only when every stage succeeds.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use note_chart::{ChartSpec, ChartSurface};
use note_core::{ChartImage, EquityStats, NoteError, PriceSource, RangeWindow, Result, Ticker};
use note_stats::{filter_range, summarize, upside_to_target};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::document::{ChartDisplay, DocumentRequest, NoteForm, parse_price};
use crate::readout::{Readouts, Status};

/// Statistics and chart from one successful fetch.
///
/// Replaced as a whole on success and cleared as a whole on failure or reset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineOutputs {
    /// Derived statistics.
    pub stats: EquityStats,
    /// PNG chart; absent when charting is unavailable.
    pub chart: Option<ChartImage>,
    /// Ticker the outputs belong to.
    pub ticker: Option<Ticker>,
    /// Window the outputs were computed over.
    pub window: Option<RangeWindow>,
}

impl PipelineOutputs {
    /// Returns true if nothing has been computed.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.stats.is_absent() && self.chart.is_none()
    }
}

#[derive(Debug)]
struct SessionState {
    surface: ChartSurface,
    outputs: PipelineOutputs,
    target_price: Option<f64>,
    status: Status,
}

impl SessionState {
    fn new(surface: ChartSurface) -> Self {
        Self {
            surface,
            outputs: PipelineOutputs::default(),
            target_price: None,
            status: Status::Idle,
        }
    }
}

/// Equity section session: fetch, compute, chart, read out.
///
/// All methods take `&self`; share the session behind an `Arc` between the
/// UI event handlers. Only one fetch runs at a time; a second call while one
/// is in flight fails with [`NoteError::Busy`].
#[derive(Debug)]
pub struct EquitySession {
    source: Arc<dyn PriceSource>,
    config: PipelineConfig,
    state: Mutex<SessionState>,
    busy: AtomicBool,
    generation: AtomicU64,
}

impl EquitySession {
    /// Create a session over `source` with the default configuration.
    #[must_use]
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self::with_parts(source, PipelineConfig::default(), None)
    }

    /// Create a Stooq-backed session from `config`.
    #[cfg(feature = "stooq")]
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = note_stooq::HttpFetcher::with_settings(&config.user_agent, config.timeout())?;
        let source = note_stooq::StooqSource::with_fetcher(Arc::new(fetcher))
            .with_config(config.source_config());
        Ok(Self::with_parts(Arc::new(source), config, None))
    }

    /// Replace the configuration. Rebuilds the chart surface at the new size.
    #[must_use]
    pub fn with_config(self, config: PipelineConfig) -> Self {
        Self::with_parts(self.source, config, None)
    }

    /// Replace the chart surface, e.g. with [`ChartSurface::unavailable`].
    #[must_use]
    pub fn with_surface(self, surface: ChartSurface) -> Self {
        Self::with_parts(self.source, self.config, Some(surface))
    }

    fn with_parts(
        source: Arc<dyn PriceSource>,
        config: PipelineConfig,
        surface: Option<ChartSurface>,
    ) -> Self {
        let surface = surface.unwrap_or_else(|| ChartSurface::new(config.chart_style()));
        Self {
            source,
            config,
            state: Mutex::new(SessionState::new(surface)),
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch, compute and chart `ticker` over `window`, relative to today.
    pub async fn fetch_chart(&self, ticker: &str, window: RangeWindow) -> Result<EquityStats> {
        self.fetch_chart_at(ticker, window, Local::now().date_naive())
            .await
    }

    /// Fetch, compute and chart `ticker` over `window`, relative to `today`.
    ///
    /// On success the statistics and chart are committed together and the
    /// status shows the window. On failure both are cleared, the live chart is
    /// torn down and the status carries the reason; nothing is retried.
    ///
    /// # Errors
    ///
    /// [`NoteError::Busy`] if another fetch is in flight (state untouched);
    /// otherwise the first error from any stage.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn fetch_chart_at(
        &self,
        ticker: &str,
        window: RangeWindow,
        today: NaiveDate,
    ) -> Result<EquityStats> {
        let guard = FetchGuard::acquire(self)?;
        let generation = self.generation.load(Ordering::Acquire);
        self.state().status = Status::Loading;

        let result = self.run_pipeline(ticker, window, today).await;

        let mut state = self.state();
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("Session was reset during fetch, discarding result");
            state.surface.destroy();
            guard.complete();
            return result.map(|_| EquityStats::absent());
        }

        match result {
            Ok(outputs) => {
                let stats = outputs.stats;
                info!(
                    window = %window,
                    chart_bytes = outputs.chart.as_ref().map_or(0, ChartImage::len),
                    "Equity statistics updated"
                );
                state.outputs = outputs;
                state.status = Status::Ready(window);
                guard.complete();
                Ok(stats)
            }
            Err(e) => {
                warn!(error = %e, "Price pipeline failed");
                state.outputs = PipelineOutputs::default();
                state.surface.destroy();
                state.status = Status::Failed(e.user_message());
                guard.complete();
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        ticker: &str,
        window: RangeWindow,
        today: NaiveDate,
    ) -> Result<PipelineOutputs> {
        let ticker = Ticker::new(ticker)?;
        let series = self.source.fetch_series(&ticker).await?;
        let filtered = filter_range(&series, window, today)?;

        let summary = summarize(&filtered);
        if summary.stats.is_absent() {
            return Err(NoteError::InsufficientData(
                "statistics could not be computed for this window".to_string(),
            ));
        }
        if summary.low_confidence() {
            warn!(
                returns = summary.return_count,
                "Volatility estimated from a small sample"
            );
        }

        let spec = ChartSpec::from_series(&filtered, format!("{ticker} ({window})"));
        let render = {
            let mut state = self.state();
            state.surface.render(spec).map(|_| ())
        };
        let rendered = match render {
            Ok(()) => true,
            Err(NoteError::RenderingUnavailable) => {
                debug!("Charting unavailable, continuing without chart");
                false
            }
            Err(e) => return Err(e),
        };

        let chart = if rendered {
            sleep(self.config.capture_delay()).await;
            let chart = self.state().surface.rasterize()?;
            if chart.is_none() {
                return Err(NoteError::Render(
                    "chart was torn down before capture".to_string(),
                ));
            }
            chart
        } else {
            None
        };

        Ok(PipelineOutputs {
            stats: summary.stats,
            chart,
            ticker: Some(ticker),
            window: Some(window),
        })
    }

    /// Returns true while a fetch is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Sets the analyst target price. Upside is recomputed on read.
    pub fn set_target_price(&self, target: Option<f64>) {
        self.state().target_price = target;
    }

    /// Sets the target price from raw input; blank or invalid input clears it.
    pub fn set_target_input(&self, input: &str) {
        self.set_target_price(parse_price(input));
    }

    /// Returns the target price.
    #[must_use]
    pub fn target_price(&self) -> Option<f64> {
        self.state().target_price
    }

    /// Upside from the latest committed current price to the target.
    #[must_use]
    pub fn upside(&self) -> Option<f64> {
        let state = self.state();
        upside_to_target(state.outputs.stats.current_price, state.target_price)
    }

    /// Statistics from the last successful fetch.
    #[must_use]
    pub fn stats(&self) -> EquityStats {
        self.state().outputs.stats
    }

    /// PNG chart from the last successful fetch.
    #[must_use]
    pub fn chart(&self) -> Option<ChartImage> {
        self.state().outputs.chart.clone()
    }

    /// Snapshot of the committed outputs.
    #[must_use]
    pub fn outputs(&self) -> PipelineOutputs {
        self.state().outputs.clone()
    }

    /// The four read-outs, with placeholders for anything absent.
    #[must_use]
    pub fn readouts(&self) -> Readouts {
        let state = self.state();
        Readouts::new(&state.outputs.stats, state.target_price)
    }

    /// The status line state.
    #[must_use]
    pub fn status(&self) -> Status {
        self.state().status.clone()
    }

    /// Tooltip text for point `index` of the live chart.
    #[must_use]
    pub fn tooltip_at(&self, index: usize) -> Option<String> {
        self.state().surface.live()?.tooltip_at(index)
    }

    /// Clears outputs, chart, target price and status.
    ///
    /// A fetch still in flight will not commit its results.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let mut state = self.state();
        state.outputs = PipelineOutputs::default();
        state.surface.destroy();
        state.target_price = None;
        state.status = Status::Idle;
        debug!("Equity session reset");
    }

    /// Builds the document builder's request from `form` and the committed outputs.
    ///
    /// The form's target price is authoritative at export time.
    #[must_use]
    pub fn document_request(&self, form: &NoteForm) -> DocumentRequest {
        let outputs = self.outputs();
        let target_price = form.target_price_value();
        let rating = Some(form.rating.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        DocumentRequest {
            note_type: form.note_type.clone(),
            ticker: form.ticker.trim().to_string(),
            rating,
            target_price,
            upside: upside_to_target(outputs.stats.current_price, target_price),
            stats: outputs.stats,
            chart: outputs.chart,
            display: ChartDisplay {
                width: self.config.display_width,
                height: self.config.display_height,
            },
            equity_section: form.visibility().is_equity(),
        }
    }
}

/// Marks the session busy for the duration of one fetch.
///
/// Dropping it without [`FetchGuard::complete`] means the fetch future was
/// cancelled; the loading status is cleared and committed outputs stay as they
/// were.
struct FetchGuard<'a> {
    session: &'a EquitySession,
    completed: bool,
}

impl<'a> FetchGuard<'a> {
    fn acquire(session: &'a EquitySession) -> Result<Self> {
        session
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| NoteError::Busy)?;
        Ok(Self {
            session,
            completed: false,
        })
    }

    fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            debug!("Fetch cancelled before completion");
            let mut state = self.session.state();
            if state.status.is_loading() {
                state.status = Status::Idle;
            }
        }
        self.session.busy.store(false, Ordering::Release);
    }
}
