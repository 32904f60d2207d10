// src/crawl/visited.rs
// =============================================================================
// The set of URLs a crawl job has already claimed.
//
// Every worker shares one VisitedSet. Before fetching a URL a worker must
// claim it with try_claim(); the claim succeeds for exactly one caller per
// URL, no matter how many workers discover that URL at the same time.
//
// The page budget is enforced inside the same critical section: once
// `limit` URLs have been claimed, every further claim fails. Counting and
// claiming can't race, so a crawl never fetches more than max_pages URLs.
//
// Rust concepts:
// - Mutex: Only one thread at a time can touch the HashSet inside
// - Interior mutability: try_claim takes &self, yet modifies the set
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
    limit: usize,
}

impl VisitedSet {
    // Creates an empty set that accepts at most `limit` claims
    pub fn with_limit(limit: usize) -> Self {
        Self {
            urls: Mutex::new(HashSet::new()),
            limit,
        }
    }

    // Atomically marks `url` as visited
    //
    // Returns:
    //   true  = the caller owns this URL and should fetch it
    //   false = someone already claimed it, or the budget is used up
    pub fn try_claim(&self, url: &str) -> bool {
        let mut urls = self.lock();

        if urls.len() >= self.limit || urls.contains(url) {
            return false;
        }

        urls.insert(url.to_string())
    }

    /// Number of URLs claimed so far
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// True once no further claim can succeed
    pub fn is_full(&self) -> bool {
        self.size() >= self.limit
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // A panic in another worker can't leave the set half-updated (insert
    // either happened or it didn't), so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why std::sync::Mutex and not tokio::sync::Mutex?
//    - The lock is held for a single lookup and insert, never across .await
//    - The std mutex is faster for that and works from plain threads too
//      (the tests below use std::thread)
//
// 2. What does HashSet::insert return?
//    - true if the value was new, false if it was already there
//    - So "check, then insert" is one call, done while holding the lock
//
// 3. What is lock poisoning?
//    - If a thread panics while holding a Mutex, the Mutex is "poisoned"
//    - lock() then returns Err, but the data is still inside
//    - into_inner() takes the guard anyway
// -----------------------------------------------------------------------------
