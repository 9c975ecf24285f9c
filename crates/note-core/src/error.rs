//! Error types for pipeline operations.
//!
//! This module defines [`NoteError`] which covers every failure the equity
//! pipeline can surface. All of them are local and recoverable by retrying the
//! fetch; none is fatal to the host application.

use thiserror::Error;

/// Errors that can occur while fetching, normalizing, or charting a price series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoteError {
    /// The ticker input was empty or could not be mapped to a market symbol.
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// The proxy or provider answered with a non-success status.
    #[error("Could not fetch price data ({0})")]
    FetchFailed(String),

    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("Could not fetch price data: {0}")]
    Network(String),

    /// Not enough rows to work with.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Charting is not available in this environment.
    #[error("Charting unavailable")]
    RenderingUnavailable,

    /// Drawing or encoding the chart failed.
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A fetch is already in flight for this session.
    #[error("A price fetch is already in progress")]
    Busy,
}

impl NoteError {
    /// Returns the reason string shown on the status line.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Returns true if the error means the series was too short to use.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}

/// Result type alias using [`NoteError`].
pub type Result<T> = std::result::Result<T, NoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_message() {
        let err = NoteError::FetchFailed("HTTP 503".to_string());
        assert_eq!(err.user_message(), "Could not fetch price data (HTTP 503)");
    }

    #[test]
    fn test_status_line_messages() {
        let cases = [
            (NoteError::InvalidTicker("empty".into()), "Invalid ticker: empty"),
            (NoteError::Network("timed out".into()), "Could not fetch price data: timed out"),
            (NoteError::InsufficientData("3 rows".into()), "Insufficient data: 3 rows"),
            (NoteError::RenderingUnavailable, "Charting unavailable"),
            (NoteError::Render("encode".into()), "Chart rendering failed: encode"),
            (NoteError::Config("width".into()), "Invalid configuration: width"),
            (NoteError::Busy, "A price fetch is already in progress"),
        ];
        for (err, message) in cases {
            assert_eq!(err.user_message(), message);
        }
    }

    #[test]
    fn test_is_insufficient_data() {
        assert!(NoteError::InsufficientData("x".into()).is_insufficient_data());
        assert!(!NoteError::Busy.is_insufficient_data());
    }
}
