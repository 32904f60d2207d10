// src/extract/content.rs
// =============================================================================
// This module turns an HTML document into an ExtractedPage.
//
// Steps, applied in order:
// 1. Strip boilerplate (nav, header, footer, aside, scripts, ads, ...)
// 2. Pick a title (document title, then first <h1>, then any <title>)
// 3. Pick the main content region (main, article, common content
//    containers, then body) and flatten it to plain text
// 4. Read <meta name="description"> and <meta name="keywords">
// 5. Read the language from <html lang="...">
// 6. Count characters and words (done by ExtractedPage::new)
//
// Title and main-content selection are ordered strategy lists: each entry
// is tried in turn and the first one that yields non-empty text wins.
//
// Every query starts from the root element. Html::select scans the whole
// node arena, detached nodes included, so it would still find a <h1> inside
// a removed <header>. ElementRef::select only walks what is still attached.
//
// Nothing in here touches the network, so every heuristic can be tested
// with an inline HTML string.
// =============================================================================

use crate::error::ExtractError;
use crate::page::{ExtractedPage, DEFAULT_LANGUAGE};
use scraper::{ElementRef, Html, Selector};

/// Title used when a page offers nothing better
pub const UNTITLED_PAGE: &str = "Untitled Page";

// Regions that never carry the page's own content
const BOILERPLATE_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "aside",
    "script",
    "style",
    "noscript",
    ".navigation",
    ".menu",
    ".sidebar",
    ".ads",
    ".advertisement",
    "#navigation",
    "#sidebar",
    "#menu",
];

// Title sources, best first
const TITLE_STRATEGIES: &[&str] = &["head > title", "h1", "title"];

// Main content regions, best first; "body" is the catch-all
const MAIN_CONTENT_STRATEGIES: &[&str] = &[
    "main",
    "article",
    ".content, .main-content, #content, #main",
    "body",
];

// Extracts a page from a parsed document
//
// The document is modified: boilerplate nodes are detached from the tree.
// Parse a fresh copy if you still need the original afterwards.
//
// Returns: ExtractError::EmptyContent when no visible text survives
pub fn extract(document: &mut Html, url: &str) -> Result<ExtractedPage, ExtractError> {
    remove_boilerplate(document);

    let title = resolve_title(document);

    let content = resolve_main_content(document).ok_or_else(|| ExtractError::EmptyContent {
        url: url.to_string(),
    })?;

    let meta_description = meta_content(document, "description");
    let meta_keywords = meta_content(document, "keywords");
    let language = resolve_language(document);

    Ok(ExtractedPage::new(
        url,
        title,
        content,
        meta_description,
        meta_keywords,
        language,
    ))
}

// Convenience wrapper: parse `html` and extract it
pub fn extract_html(html: &str, url: &str) -> Result<ExtractedPage, ExtractError> {
    let mut document = Html::parse_document(html);
    extract(&mut document, url)
}

// Detaches every node matching a boilerplate selector
fn remove_boilerplate(document: &mut Html) {
    for css in BOILERPLATE_SELECTORS {
        let selector = selector(css);

        // Collect ids first: we can't mutate the tree while iterating it
        let ids: Vec<_> = document
            .root_element()
            .select(&selector)
            .map(|element| element.id())
            .collect();

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

fn resolve_title(document: &Html) -> String {
    TITLE_STRATEGIES
        .iter()
        .find_map(|css| first_match_text(document, css))
        .unwrap_or_else(|| UNTITLED_PAGE.to_string())
}

fn resolve_main_content(document: &Html) -> Option<String> {
    MAIN_CONTENT_STRATEGIES
        .iter()
        .find_map(|css| first_match_text(document, css))
}

// Text of the first element matching `css`, or None if there is no match
// or the match has no visible text
fn first_match_text(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css);
    let element = document.root_element().select(&selector).next()?;
    let text = visible_text(element);

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// Flattens an element to text with all whitespace runs collapsed to one space
//
// Text nodes are always separated, so "<p>one</p><p>two</p>" reads
// "one two" instead of "onetwo".
pub fn visible_text(element: ElementRef) -> String {
    let mut text = String::new();

    for chunk in element.text() {
        for word in chunk.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }

    text
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = selector(&format!(r#"meta[name="{}"]"#, name));

    document
        .root_element()
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

// "en-US" -> "en", missing or blank -> "en"
fn resolve_language(document: &Html) -> String {
    let lang = document
        .root_element()
        .value()
        .attr("lang")
        .map(str::trim)
        .unwrap_or("");

    if lang.is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }

    lang.chars().take(2).collect::<String>().to_lowercase()
}

// All selectors in this module are constants, so a parse failure is a
// programmer error rather than something a caller could recover from
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{}': {:?}", css, e))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does detaching need node ids?
//    - document.select() hands out ElementRefs, which borrow the document
//    - Detaching needs &mut access to the same tree
//    - Rust won't allow both at once, so we collect the ids (plain Copy
//      values) first and only then mutate
//
// 2. Html::select vs ElementRef::select
//    - A scraper document stores every node in one flat arena
//    - detach() unlinks a node from its parent but leaves it in the arena
//    - Html::select walks the arena, so it still finds detached nodes
//    - root_element().select walks the live tree from the root down
//
// 3. What does find_map do?
//    - Calls the closure on each item until one returns Some(...)
//    - Returns that first Some, or None if every item gave None
//    - Perfect for "try these strategies in order"
//
// 4. Why panic in selector()?
//    - The selectors are string constants written by us
//    - A typo there is a bug in this file, not bad input from a website
//    - Web pages can't make it fail, so there is nothing to recover from
// -----------------------------------------------------------------------------
