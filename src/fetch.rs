// src/fetch.rs
// =============================================================================
// This module downloads pages over HTTP.
//
// Key functionality:
// - One GET per URL, no retries
// - Follows redirects up to a limit
// - Per-request timeout and a custom User-Agent (the "client identifier")
// - Sorts reqwest failures into FetchError variants (timeout, DNS, ...)
//
// The fetcher returns the raw HTML text, not a parsed DOM. scraper's Html
// type is not Send, so parsing happens later inside a synchronous function
// and the DOM never has to live across an .await.
// =============================================================================

use crate::config::CrawlConfig;
use crate::error::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

// An HTML document straight off the wire
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Where the response actually came from (after redirects)
    pub final_url: Url,
    /// The HTML body
    pub html: String,
}

// Wraps a reqwest Client configured for crawling
//
// Client is cheap to clone (it's an Arc internally), and so is PageFetcher
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    // Builds a fetcher with the given timeout, User-Agent and redirect limit
    pub fn new(
        timeout: Duration,
        client_identifier: &str,
        max_redirects: usize,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(client_identifier)
            .redirect(redirect::Policy::limited(max_redirects))
            .build()?;

        Ok(Self { client })
    }

    // Builds a fetcher from a crawl configuration
    pub fn from_config(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.fetch_timeout(),
            config.client_identifier(),
            config.max_redirects(),
        )
    }

    // Fetches one page
    //
    // Fails on network errors, timeouts, non-2xx statuses, non-HTML
    // responses and unreadable bodies. The caller decides what to do with
    // the failure (the scheduler just skips the URL).
    pub async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A missing Content-Type is given the benefit of the doubt
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html_content_type(content_type) {
                return Err(FetchError::NotHtml {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let final_url = response.url().clone();
        // The timeout covers the whole exchange, body included
        let html = response.text().await.map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        Ok(FetchedDocument { final_url, html })
    }
}

// Accepts text/html and XHTML; everything else (images, PDFs, JSON) is not a page
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

// Categorizes reqwest errors into FetchError variants
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure / refused connection
// - Too many redirects
// - etc.
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();

    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_redirect() {
        FetchError::TooManyRedirects { url }
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        FetchError::Request { url, source: error }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Where does the timeout apply?
//    - Client::builder().timeout() covers the whole request: connecting,
//      waiting for headers and reading the body
//    - A slow body therefore fails with is_timeout() too, which is why
//      the text() error is checked as well as the send() error
//
// 2. What is redirect::Policy::limited(n)?
//    - Follow at most n redirects, then fail with a redirect error
//    - response.url() afterwards is where we ended up, not where we started
//
// 3. Why .map_err(...)?
//    - reqwest returns reqwest::Error, but callers want a FetchError
//    - map_err converts the error and leaves a success untouched
//    - The ? after it returns early on failure
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5), "test-agent/1.0", 5).unwrap()
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("Application/XHTML+XML"));
        assert!(!is_html_content_type("image/png"));
        assert!(!is_html_content_type("application/json"));
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", "test-agent/1.0")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body><p>hello</p></body></html>")
            .create_async()
            .await;

        let url = format!("{}/page", server.url());
        let document = fetcher().fetch(&url).await.unwrap();

        assert_eq!(document.final_url.as_str(), url);
        assert!(document.html.contains("hello"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/new", server.url());
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", &target)
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<p>moved</p>")
            .create_async()
            .await;

        let url = format!("{}/old", server.url());
        let document = fetcher().fetch(&url).await.unwrap();

        assert_eq!(document.final_url.path(), "/new");
        assert_ne!(document.final_url.as_str(), url);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_html() {
        let mut server = mockito::Server::new_async().await;
        let _data = server
            .mock("GET", "/data")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let url = format!("{}/data", server.url());
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::NotHtml { .. }));
    }

    #[tokio::test]
    async fn test_fetch_slow_response_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _slow = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body_from_request(|_| {
                std::thread::sleep(Duration::from_millis(800));
                b"<p>too late</p>".to_vec()
            })
            .create_async()
            .await;

        let impatient = PageFetcher::new(Duration::from_millis(150), "test-agent/1.0", 5).unwrap();
        let url = format!("{}/slow", server.url());
        let err = impatient.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }), "got {:?}", err);
        assert!(err.to_string().contains("/slow"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        // Port 1 on localhost is essentially never listening
        let err = fetcher().fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Connect { .. } | FetchError::Request { .. }
        ));
    }
}
