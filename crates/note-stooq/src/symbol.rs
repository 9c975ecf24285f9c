//! Symbol mapping and request URL construction.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Maps a ticker to the provider's market symbol.
///
/// A ticker containing a period already names its market and is only
/// lower-cased. Anything else gets `default_suffix` appended first.
#[must_use]
pub fn map_symbol(ticker: &str, default_suffix: &str) -> String {
    if ticker.contains('.') {
        ticker.to_lowercase()
    } else {
        format!("{ticker}{default_suffix}").to_lowercase()
    }
}

/// Builds the provider's daily CSV download URL for `symbol`.
#[must_use]
pub fn provider_url(host: &str, symbol: &str) -> String {
    format!(
        "http://{}/q/d/l/?s={}&i=d",
        host,
        utf8_percent_encode(symbol, URI_COMPONENT)
    )
}

/// Wraps `url` for the text-extraction proxy: `<proxy-base>/<encoded url>`.
#[must_use]
pub fn proxied_url(proxy_base: &str, url: &str) -> String {
    format!(
        "{}/{}",
        proxy_base.trim_end_matches('/'),
        utf8_percent_encode(url, URI_COMPONENT)
    )
}
