//! Where the search API lives and how long we wait for it.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SEARCH_API_URL: &str = "http://localhost:5033/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Base URL of the catalog API, without a trailing slash.
    pub base_url: String,
    /// Upper bound for one search round trip.
    pub timeout: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_API_URL)
    }
}

impl IndexConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Reads `SEARCH_API_URL` and `SEARCH_API_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var("SEARCH_API_URL").unwrap_or(DEFAULT_SEARCH_API_URL.to_string());
        let timeout_ms = match std::env::var("SEARCH_API_TIMEOUT_MS") {
            Ok(raw) => parse_timeout_ms(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "ignoring invalid SEARCH_API_TIMEOUT_MS, using {DEFAULT_TIMEOUT_MS}ms");
                DEFAULT_TIMEOUT_MS
            }),
            Err(_) => DEFAULT_TIMEOUT_MS,
        };
        Self::new(base_url).with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_timeout_ms(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|ms| *ms > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let config = IndexConfig::new("http://example.test/api/");
        assert_eq!(config.base_url, "http://example.test/api");
        assert_eq!(config.endpoint("/search/mixlists"), "http://example.test/api/search/mixlists");
        assert_eq!(config.endpoint("topics"), "http://example.test/api/topics");
    }

    #[test]
    fn timeout_parsing_rejects_garbage_and_zero() {
        assert_eq!(parse_timeout_ms(" 2500 "), Some(2500));
        assert_eq!(parse_timeout_ms("0"), None);
        assert_eq!(parse_timeout_ms("soon"), None);
    }
}
