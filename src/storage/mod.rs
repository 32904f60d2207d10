// src/storage/mod.rs
// =============================================================================
// The storage collaborator the crawler emits accepted pages into.
//
// The crawler only needs save(); list_pages() and mark_indexed() exist for
// the indexing pipeline that runs later and turns stored text into vectors.
//
// Contract for implementations:
// - save() is an upsert keyed by (owner, url). The crawler never saves the
//   same URL twice in one job, but callers may re-run crawls, so saving an
//   existing page must replace it rather than duplicate it.
// - All methods may be called concurrently from many crawl workers.
// =============================================================================

mod memory;

pub use memory::MemoryStore;

use crate::page::ExtractedPage;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page not found: {url}")]
    PageNotFound { url: String },

    #[error("storage backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// A page as the storage layer keeps it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPage {
    /// Identifier of the site this page belongs to
    pub owner: String,
    #[serde(flatten)]
    pub page: ExtractedPage,
    pub is_indexed: bool,
    /// Opaque id assigned by the indexing collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_id: Option<String>,
}

impl StoredPage {
    pub fn new(owner: impl Into<String>, page: ExtractedPage) -> Self {
        Self {
            owner: owner.into(),
            page,
            is_indexed: false,
            vector_id: None,
        }
    }
}

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Stores (or replaces) one accepted page for `owner`
    async fn save(&self, page: &ExtractedPage, owner: &str) -> Result<(), StoreError>;

    /// Every page stored for `owner`
    async fn list_pages(&self, owner: &str) -> Result<Vec<StoredPage>, StoreError>;

    /// Records that `url` has been embedded under `vector_id`
    async fn mark_indexed(&self, owner: &str, url: &str, vector_id: &str) -> Result<(), StoreError>;
}

// Aggregate numbers for one site's stored pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteStats {
    pub total_pages: usize,
    pub total_words: usize,
    pub total_characters: usize,
    pub indexed_pages: usize,
}

impl SiteStats {
    pub fn from_pages(pages: &[StoredPage]) -> Self {
        pages.iter().fold(Self::default(), |mut stats, stored| {
            stats.total_pages += 1;
            stats.total_words += stored.page.word_count();
            stats.total_characters += stored.page.content_length();
            if stored.is_indexed {
                stats.indexed_pages += 1;
            }
            stats
        })
    }
}

// Loads a site's pages from `store` and summarizes them
pub async fn site_stats(store: &dyn PageStore, owner: &str) -> Result<SiteStats, StoreError> {
    let pages = store.list_pages(owner).await?;
    Ok(SiteStats::from_pages(&pages))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - Trait objects (dyn PageStore) can't hold plain async fns
//    - The macro rewrites each async fn to return a boxed future
//
// 2. Why Send + Sync on the trait?
//    - One store is shared by every crawl task through an Arc
//    - Tasks may run on different threads, so the store must be thread-safe
//
// 3. What does #[serde(flatten)] do?
//    - Writes the page's fields directly into the StoredPage JSON object
//    - {"owner": "...", "url": "...", "title": "..."} instead of nesting
//      them under a "page" key
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(url: &str, content: &str, indexed: bool) -> StoredPage {
        let page = ExtractedPage::new(url, "t", content, None, None, "en");
        StoredPage {
            is_indexed: indexed,
            ..StoredPage::new("site-1", page)
        }
    }

    #[test]
    fn test_stats_from_pages() {
        let pages = vec![
            stored("https://example.com/a", "one two three", true),
            stored("https://example.com/b", "four five", false),
        ];
        let stats = SiteStats::from_pages(&pages);

        assert_eq!(
            stats,
            SiteStats {
                total_pages: 2,
                total_words: 5,
                total_characters: 22,
                indexed_pages: 1,
            }
        );
    }

    #[test]
    fn test_stats_of_nothing() {
        assert_eq!(SiteStats::from_pages(&[]), SiteStats::default());
    }

    #[test]
    fn test_stored_page_json_is_flat() {
        let json = serde_json::to_value(stored("https://example.com/a", "text", false)).unwrap();
        assert_eq!(json["owner"], "site-1");
        assert_eq!(json["url"], "https://example.com/a");
        assert_eq!(json["is_indexed"], false);
        assert!(json.get("vector_id").is_none());
    }
}
