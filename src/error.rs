// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Only configuration problems are fatal. Everything that can go wrong with a
// single page (network failure, bad status, empty content) is reported as a
// per-page error that the scheduler logs and then moves past.
//
// We use the `thiserror` crate which:
// - Derives std::error::Error for our enums
// - Generates Display from the #[error("...")] attributes
// - Wires up #[from] conversions so `?` works across error types
// =============================================================================

use thiserror::Error;

// Why a single page could not be fetched
//
// Each variant keeps the URL so log lines stay useful on their own
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request took longer than the configured fetch timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered, but not with a 2xx status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Redirect chain longer than the configured limit (or a loop)
    #[error("too many redirects for {url}")]
    TooManyRedirects { url: String },

    /// DNS failure, refused connection, TLS handshake problems...
    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// The response was not an HTML document
    #[error("{url} is not HTML (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },

    /// The body could not be read or decoded as text
    #[error("could not read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other request failure reported by reqwest
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

// Why a fetched document produced no page
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No visible text left once boilerplate was stripped
    #[error("no extractable content on {url}")]
    EmptyContent { url: String },
}

// Invalid crawl settings, detected before any request is made
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("max_pages must be at least 1")]
    ZeroMaxPages,

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid client identifier '{0}': not a valid HTTP header value")]
    InvalidClientIdentifier(String),

    #[error("site id must not be empty")]
    EmptySiteId,

    #[error("crawl config starts at {config_seed}, but the site's seed is {site_seed}")]
    SiteSeedMismatch {
        site_seed: String,
        config_seed: String,
    },
}

// Failures that stop a crawl job before it starts
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// Errors for one URL's pipeline, caught by the scheduler
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/missing");
    }

    #[test]
    fn test_config_error_converts_into_crawl_error() {
        let err: CrawlError = ConfigError::ZeroMaxPages.into();
        assert!(matches!(err, CrawlError::Config(ConfigError::ZeroMaxPages)));
        assert_eq!(err.to_string(), "max_pages must be at least 1");
    }
}
