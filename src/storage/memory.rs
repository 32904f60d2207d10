// src/storage/memory.rs
// =============================================================================
// An in-process PageStore.
//
// Pages live in a map of owner -> (url -> page), behind a tokio RwLock so
// crawl workers on different threads can save concurrently. BTreeMap keeps
// list_pages() output sorted by URL, which makes CLI output and tests stable.
// =============================================================================

use super::{PageStore, StoreError, StoredPage};
use crate::page::ExtractedPage;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    sites: RwLock<HashMap<String, BTreeMap<String, StoredPage>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pages across all owners
    pub async fn len(&self) -> usize {
        self.sites.read().await.values().map(BTreeMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn save(&self, page: &ExtractedPage, owner: &str) -> Result<(), StoreError> {
        let mut sites = self.sites.write().await;
        let pages = sites.entry(owner.to_string()).or_default();

        // Same text as before keeps the existing index state; new or changed
        // text is (re)stored un-indexed
        let unchanged = pages
            .get(page.url())
            .is_some_and(|existing| existing.page == *page);

        if !unchanged {
            pages.insert(page.url().to_string(), StoredPage::new(owner, page.clone()));
        }

        Ok(())
    }

    async fn list_pages(&self, owner: &str) -> Result<Vec<StoredPage>, StoreError> {
        let sites = self.sites.read().await;

        Ok(sites
            .get(owner)
            .map(|pages| pages.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn mark_indexed(&self, owner: &str, url: &str, vector_id: &str) -> Result<(), StoreError> {
        let mut sites = self.sites.write().await;

        let stored = sites
            .get_mut(owner)
            .and_then(|pages| pages.get_mut(url))
            .ok_or_else(|| StoreError::PageNotFound {
                url: url.to_string(),
            })?;

        stored.is_indexed = true;
        stored.vector_id = Some(vector_id.to_string());
        Ok(())
    }
}
