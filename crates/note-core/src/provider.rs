//! Provider traits for fetching price data.
//!
//! - [`TextFetcher`] - raw text retrieval. The price provider cannot be reached
//!   cross-origin directly, so requests go through a text-extraction proxy;
//!   this trait abstracts that hop so the header-seeking parser can be
//!   exercised against canned text.
//! - [`PriceSource`] - ticker in, normalized daily series out.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Result;
use crate::types::{PriceSeries, Ticker};

/// Retrieves the body of a URL as text.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait TextFetcher: Send + Sync + Debug {
    /// Returns the name of this fetcher (e.g., "http").
    fn name(&self) -> &str;

    /// Fetches `url` and returns the response body.
    ///
    /// A non-success status is reported as [`NoteError::FetchFailed`](crate::NoteError::FetchFailed).
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: TextFetcher + ?Sized> TextFetcher for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}

/// Source of daily closing prices.
#[async_trait]
pub trait PriceSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "Stooq").
    fn name(&self) -> &str;

    /// Fetches the full daily history for `ticker`, oldest first.
    ///
    /// Issues at most one network request and never retries.
    async fn fetch_series(&self, ticker: &Ticker) -> Result<PriceSeries>;
}
