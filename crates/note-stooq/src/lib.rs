#![doc(issue_tracker_base_url = "https://github.com/factordynamics/note/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Stooq daily price ingestion.
//!
//! Stooq serves daily OHLCV as CSV but does not allow cross-origin requests,
//! so the download URL is wrapped in a text-extraction proxy. The proxy may
//! surround the CSV with its own prose; parsing seeks the header line and
//! falls back to the raw body when it cannot find one.
//!
//! # Example
//!
//! ```no_run
//! use note_core::{PriceSource, Ticker};
//! use note_stooq::StooqSource;
//!
//! # async fn example() -> note_core::Result<()> {
//! let source = StooqSource::new()?;
//! let series = source.fetch_series(&Ticker::new("AAPL")?).await?;
//! println!("Fetched {} closes", series.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use note_core::{NoteError, PriceSeries, PriceSource, Result, TextFetcher, Ticker};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

mod parse;
mod symbol;

pub use parse::{CSV_HEADER, Extracted, MIN_RAW_LINES, extract_csv, parse_series};
pub use symbol::{map_symbol, provider_url, proxied_url};

/// Default text-extraction proxy.
pub const DEFAULT_PROXY_BASE: &str = "https://r.jina.ai";

/// Default provider host.
pub const DEFAULT_PROVIDER_HOST: &str = "stooq.com";

/// Market suffix appended to tickers that do not name one.
pub const DEFAULT_MARKET_SUFFIX: &str = ".us";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent for HTTP requests.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Where and how to request the daily CSV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Proxy base URL; the encoded provider URL is appended after a slash.
    pub proxy_base: String,
    /// Provider host serving `/q/d/l/`.
    pub provider_host: String,
    /// Suffix for tickers without a market part.
    pub market_suffix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            proxy_base: DEFAULT_PROXY_BASE.to_string(),
            provider_host: DEFAULT_PROVIDER_HOST.to_string(),
            market_suffix: DEFAULT_MARKET_SUFFIX.to_string(),
        }
    }
}

impl SourceConfig {
    /// Full proxied request URL for `ticker`.
    #[must_use]
    pub fn request_url(&self, ticker: &Ticker) -> String {
        let symbol = map_symbol(ticker.as_str(), &self.market_suffix);
        proxied_url(&self.proxy_base, &provider_url(&self.provider_host, &symbol))
    }
}

/// [`TextFetcher`] backed by `reqwest`.
///
/// Issues one GET per call. No retry, no rate limiting.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default user agent and timeout.
    pub fn new() -> Result<Self> {
        Self::with_settings(USER_AGENT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom user agent and timeout.
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| NoteError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Create a fetcher around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NoteError::FetchFailed(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| NoteError::Network(e.to_string()))
    }
}

/// Daily price source: ticker in, normalized [`PriceSeries`] out.
#[derive(Debug, Clone)]
pub struct StooqSource {
    fetcher: Arc<dyn TextFetcher>,
    config: SourceConfig,
}

impl StooqSource {
    /// Create a source using [`HttpFetcher`] and the default configuration.
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(Arc::new(HttpFetcher::new()?)))
    }

    /// Create a source with a custom fetch strategy.
    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn TextFetcher>) -> Self {
        Self {
            fetcher,
            config: SourceConfig::default(),
        }
    }

    /// Replace the request configuration.
    #[must_use]
    pub fn with_config(mut self, config: SourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the request configuration.
    #[must_use]
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }
}

#[async_trait]
impl PriceSource for StooqSource {
    fn name(&self) -> &str {
        "Stooq"
    }

    /// Fetch and normalize the full daily history for `ticker`.
    ///
    /// # Errors
    ///
    /// [`NoteError::FetchFailed`] / [`NoteError::Network`] from the fetcher,
    /// [`NoteError::InsufficientData`] from parsing.
    #[instrument(skip(self, ticker), fields(fetcher = self.fetcher.name(), ticker = %ticker))]
    async fn fetch_series(&self, ticker: &Ticker) -> Result<PriceSeries> {
        let url = self.config.request_url(ticker);
        debug!(url = %url, "Fetching daily prices");

        let raw = self.fetcher.fetch(&url).await?;
        let extracted = extract_csv(&raw);
        if !extracted.header_found {
            warn!(bytes = raw.len(), "CSV header not found, parsing raw response");
        }

        let series = parse_series(extracted.payload)?;
        if let Some((start, end)) = series.date_range() {
            debug!(points = series.len(), %start, %end, "Normalized price series");
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CannedFetcher {
        body: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextFetcher for CannedFetcher {
        fn name(&self) -> &str {
            "canned"
        }

        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.body
                .clone()
                .ok_or_else(|| NoteError::FetchFailed("HTTP 403 Forbidden".to_string()))
        }
    }

    fn canned(body: Option<&str>) -> Arc<CannedFetcher> {
        Arc::new(CannedFetcher {
            body: body.map(str::to_string),
            requested: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_request_url() {
        let config = SourceConfig::default();
        let url = config.request_url(&Ticker::new("aapl").unwrap());
        assert_eq!(
            url,
            "https://r.jina.ai/http%3A%2F%2Fstooq.com%2Fq%2Fd%2Fl%2F%3Fs%3Daapl.us%26i%3Dd"
        );
    }

    #[tokio::test]
    async fn test_fetch_series_through_proxy_text() {
        let body = "Title: \n\nURL Source: http://stooq.com/q/d/l/?s=aapl.us&i=d\n\n\
Markdown Content:\nDate,Open,High,Low,Close,Volume\n\
2024-01-02,1,1,1,185.64,1\n2024-01-03,1,1,1,184.25,1\n\
2024-01-04,1,1,1,181.91,1\n2024-01-05,1,1,1,181.18,1\n";
        let fetcher = canned(Some(body));
        let source = StooqSource::with_fetcher(fetcher.clone());

        let series = source
            .fetch_series(&Ticker::new("AAPL").unwrap())
            .await
            .unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.last().unwrap().close, 181.18);
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_retried() {
        let fetcher = canned(None);
        let source = StooqSource::with_fetcher(fetcher.clone());

        let err = source
            .fetch_series(&Ticker::new("AAPL").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, NoteError::FetchFailed(_)));
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_data_body_is_insufficient() {
        let source = StooqSource::with_fetcher(canned(Some("No data")));
        let err = source
            .fetch_series(&Ticker::new("ZZZZ").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_custom_config() {
        let source = StooqSource::with_fetcher(canned(None)).with_config(SourceConfig {
            proxy_base: "http://localhost:9000".to_string(),
            provider_host: "example.test".to_string(),
            market_suffix: ".uk".to_string(),
        });
        let url = source.config().request_url(&Ticker::new("VOD").unwrap());
        assert!(url.starts_with("http://localhost:9000/http%3A%2F%2Fexample.test"));
        assert!(url.contains("vod.uk"));
    }
}
