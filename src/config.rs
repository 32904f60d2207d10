// src/config.rs
// =============================================================================
// Crawl configuration.
//
// A CrawlConfig is created once per crawl job through CrawlConfigBuilder and
// never changes afterwards. build() is the single place where settings are
// validated, so the crawler itself never has to second-guess its budgets.
//
// Defaults:
//   max_pages          50
//   max_depth          3   (seed is depth 0)
//   fetch_timeout      30 seconds
//   client_identifier  "AI-Chatbot-Crawler/1.0"
//   concurrency        10 in-flight fetches
//   max_redirects      10
//   thresholds         > 100 characters and > 20 words
// =============================================================================

use crate::error::ConfigError;
use reqwest::header::HeaderValue;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CLIENT_IDENTIFIER: &str = "AI-Chatbot-Crawler/1.0";
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

// Minimum size a page must exceed to be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentThresholds {
    /// Content must have strictly more characters than this
    pub min_chars: usize,
    /// Content must have strictly more words than this
    pub min_words: usize,
}

impl Default for ContentThresholds {
    fn default() -> Self {
        Self {
            min_chars: 100,
            min_words: 20,
        }
    }
}

// Immutable settings for one crawl job
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    seed_url: Url,
    max_pages: usize,
    max_depth: usize,
    fetch_timeout: Duration,
    client_identifier: String,
    concurrency: usize,
    max_redirects: usize,
    thresholds: ContentThresholds,
    follow_rejected_links: bool,
}

impl CrawlConfig {
    // Starts a builder for crawling from `seed_url`
    //
    // Nothing is validated until build() is called
    pub fn builder(seed_url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            seed_url: seed_url.into(),
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client_identifier: DEFAULT_CLIENT_IDENTIFIER.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            thresholds: ContentThresholds::default(),
            follow_rejected_links: false,
        }
    }

    pub fn seed_url(&self) -> &Url {
        &self.seed_url
    }

    /// Global cap on distinct URLs claimed (and therefore fetched)
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Maximum hop distance from the seed
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Sent as the User-Agent header
    pub fn client_identifier(&self) -> &str {
        &self.client_identifier
    }

    /// Maximum number of fetches in flight at once
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn thresholds(&self) -> ContentThresholds {
        self.thresholds
    }

    /// Whether links found on rejected (too thin) pages are still followed
    pub fn follow_rejected_links(&self) -> bool {
        self.follow_rejected_links
    }
}

// Collects settings and validates them into a CrawlConfig
#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    seed_url: String,
    max_pages: usize,
    max_depth: usize,
    fetch_timeout: Duration,
    client_identifier: String,
    concurrency: usize,
    max_redirects: usize,
    thresholds: ContentThresholds,
    follow_rejected_links: bool,
}

impl CrawlConfigBuilder {
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn client_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.client_identifier = identifier.into();
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn thresholds(mut self, thresholds: ContentThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn follow_rejected_links(mut self, follow: bool) -> Self {
        self.follow_rejected_links = follow;
        self
    }

    // Validates every setting and freezes the configuration
    //
    // Returns: the first ConfigError found, checked in field order
    pub fn build(self) -> Result<CrawlConfig, ConfigError> {
        let seed_url = parse_seed(&self.seed_url)?;

        if self.max_pages == 0 {
            return Err(ConfigError::ZeroMaxPages);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if HeaderValue::from_str(&self.client_identifier).is_err() {
            return Err(ConfigError::InvalidClientIdentifier(self.client_identifier));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        Ok(CrawlConfig {
            seed_url,
            max_pages: self.max_pages,
            max_depth: self.max_depth,
            fetch_timeout: self.fetch_timeout,
            client_identifier: self.client_identifier,
            concurrency: self.concurrency,
            max_redirects: self.max_redirects,
            thresholds: self.thresholds,
            follow_rejected_links: self.follow_rejected_links,
        })
    }
}

// Parses the seed and checks it is a crawlable http(s) URL with a host
pub(crate) fn parse_seed(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSeedUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("only http and https are supported"));
    }
    if url.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }

    Ok(url)
}
