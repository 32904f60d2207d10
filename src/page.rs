// src/page.rs
// =============================================================================
// The data a crawl produces.
//
// - ExtractedPage: the cleaned text and metadata of one accepted page
// - CrawlResult: every accepted page from one crawl job
//
// Pages are built once by the extractor and never mutated afterwards, so the
// fields are private and only readable through getters. Derived values
// (content_length, word_count) are computed in the constructor and can never
// drift from the content they describe.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Language code used when a page does not declare one
pub const DEFAULT_LANGUAGE: &str = "en";

// One page that survived extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    url: String,
    title: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta_keywords: Option<String>,
    language: String,
    content_length: usize,
    word_count: usize,
}

impl ExtractedPage {
    // Builds a page and derives its length and word count from `content`
    //
    // An empty language falls back to DEFAULT_LANGUAGE
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        meta_description: Option<String>,
        meta_keywords: Option<String>,
        language: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let mut language = language.into();
        if language.is_empty() {
            language = DEFAULT_LANGUAGE.to_string();
        }

        Self {
            url: url.into(),
            title: title.into(),
            content_length: content.chars().count(),
            word_count: content.split_whitespace().count(),
            content,
            meta_description,
            meta_keywords,
            language,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn meta_description(&self) -> Option<&str> {
        self.meta_description.as_deref()
    }

    pub fn meta_keywords(&self) -> Option<&str> {
        self.meta_keywords.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Character count of the content (not bytes)
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Number of whitespace-separated tokens in the content
    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

// The output of one crawl job
//
// Page order reflects completion order and carries no meaning.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlResult {
    pages: Vec<ExtractedPage>,
    urls_claimed: usize,
}

impl CrawlResult {
    pub fn new(pages: Vec<ExtractedPage>, urls_claimed: usize) -> Self {
        Self { pages, urls_claimed }
    }

    pub fn pages(&self) -> &[ExtractedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<ExtractedPage> {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// How many distinct URLs the job claimed (an upper bound on fetches)
    pub fn urls_claimed(&self) -> usize {
        self.urls_claimed
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.pages.iter().any(|page| page.url() == url)
    }
}
