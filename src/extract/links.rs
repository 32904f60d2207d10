// src/extract/links.rs
// =============================================================================
// This module extracts outbound links from HTML pages.
//
// We use the `scraper` crate to select every <a href> and the `url` crate to
// resolve relative links against the page they were found on.
//
// Links come back:
// - absolute (relative hrefs are resolved against the page URL)
// - http/https only (mailto:, tel:, javascript: are dropped)
// - without #fragments (page#a and page#b are the same page)
// - de-duplicated, in document order
//
// Whether a link is worth crawling (same host, not an image...) is the URL
// classifier's job, not ours.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all crawlable links from a parsed document
//
// Parameters:
//   document: the parsed page
//   base: the URL of the page (for resolving relative links)
pub fn extract_links(document: &Html, base: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    // "a[href]" means "all <a> tags that have an href attribute"
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    // From the root element, so nodes detached as boilerplate are skipped
    for element in document.root_element().select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(base, href) {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    links
}

// Convenience wrapper for callers holding raw HTML
pub fn extract_html_links(html: &str, base: &Url) -> Vec<Url> {
    extract_links(&Html::parse_document(html), base)
}

// Resolves a link (possibly relative) to an absolute http(s) URL
//
// Examples (base = "https://example.com/page"):
//   "/docs"              -> Some("https://example.com/docs")
//   "../other"           -> Some("https://example.com/other")
//   "https://other.com"  -> Some("https://other.com/")
//   "#section"           -> None (same page)
//   "mailto:a@b.com"     -> None (not a web page)
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let mut url = base.join(href).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does base.join(href) do?
//    - Resolves href the same way a browser would
//    - "/docs" on https://example.com/a/b becomes https://example.com/docs
//    - "page2" on https://example.com/a/b becomes https://example.com/a/page2
//
// 2. Why set_fragment(None)?
//    - "#section" only scrolls within a page, it never changes the page
//    - Without it, /faq#q1 and /faq#q2 would be crawled twice
//
// 3. Why both a Vec and a HashSet?
//    - The HashSet answers "seen this one already?" in O(1)
//    - The Vec keeps document order, which a HashSet doesn't
// -----------------------------------------------------------------------------
