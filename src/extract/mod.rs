// src/extract/mod.rs
// =============================================================================
// This module turns fetched HTML into crawl output.
//
// Submodules:
// - content: boilerplate stripping, title/main-content/metadata extraction
// - links: outbound link discovery
// - validate: minimum-content acceptance checks
//
// analyze() is what the scheduler calls: it parses the HTML once, extracts
// the page, then reads the links from what is left. Links inside navigation,
// headers, footers and sidebars are never followed; only links in the page's
// own content grow the crawl.
// =============================================================================

mod content;
mod links;
mod validate;

pub use content::{extract, extract_html, visible_text, UNTITLED_PAGE};
pub use links::{extract_html_links, extract_links};
pub use validate::{is_acceptable, rejection_reason, Rejection};

use crate::error::ExtractError;
use crate::page::ExtractedPage;
use scraper::Html;
use url::Url;

// Everything learned from one HTML document
#[derive(Debug)]
pub struct Analysis {
    /// Outbound http(s) links, absolute and fragment-free
    pub links: Vec<Url>,
    /// The extracted page, or why there was none
    pub page: Result<ExtractedPage, ExtractError>,
}

// Parses `html` and extracts both its links and its page
//
// Parameters:
//   html: the document body
//   page_url: the URL the page is recorded under
//   base: the URL relative links resolve against (the post-redirect URL)
//
// Must stay synchronous: scraper's Html is not Send and has to be dropped
// before the caller's next .await.
pub fn analyze(html: &str, page_url: &str, base: &Url) -> Analysis {
    let mut document = Html::parse_document(html);
    // extract() leaves the document with its boilerplate detached
    let page = extract(&mut document, page_url);
    let links = extract_links(&document, base);

    Analysis { links, page }
}
