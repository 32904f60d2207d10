// src/crawl/scheduler.rs
// =============================================================================
// The crawl scheduler: expands the link graph from the seed, concurrently.
//
// How it works:
// 1. The seed is claimed in the visited set and visited at depth 0
// 2. Visiting a URL runs its pipeline: fetch -> extract -> validate -> emit
// 3. Links of an accepted page that pass the URL classifier, sit within
//    max_depth and win a claim are spawned as child tasks at depth + 1
// 4. A visit only finishes after all of its children have finished
//    (structured join), so when the seed's visit returns the crawl is done
//
// Limits:
// - max_pages: enforced by the visited set; a failed claim means "skip"
// - max_depth: children are only spawned while depth < max_depth
// - concurrency: a semaphore caps how many fetches are in flight. The permit
//   is held only while fetching, never while waiting on children, so parents
//   can't starve their own children of permits.
//
// Failures of a single page are logged and skipped; they never stop the
// crawl.
//
// Rust concepts:
// - Arc<Self>: every spawned task holds its own handle to the scheduler
// - BoxFuture: async recursion needs a boxed, type-erased future
// - JoinSet: owns the child tasks so we can wait for all of them
// =============================================================================

use crate::config::CrawlConfig;
use crate::crawl::classifier::{is_eligible_url, normalize_url};
use crate::crawl::visited::VisitedSet;
use crate::error::PageError;
use crate::extract::{self, Analysis, Rejection};
use crate::fetch::PageFetcher;
use crate::page::ExtractedPage;
use crate::storage::PageStore;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

// What happened to one URL
#[derive(Debug)]
pub struct PageOutcome {
    pub url: String,
    /// Outbound links found on the page (empty if the fetch failed)
    pub links: Vec<Url>,
    pub verdict: Verdict,
}

#[derive(Debug)]
pub enum Verdict {
    /// Passed extraction and validation
    Accepted(ExtractedPage),
    /// Extracted fine, but too thin to keep
    Rejected(Rejection),
    /// Could not be fetched or had no extractable content
    Failed(PageError),
}

pub struct Scheduler {
    config: CrawlConfig,
    fetcher: PageFetcher,
    visited: VisitedSet,
    permits: Semaphore,
    store: Arc<dyn PageStore>,
    owner: String,
}

impl Scheduler {
    // Creates a scheduler for one crawl job
    //
    // Parameters:
    //   config: budgets and thresholds
    //   fetcher: HTTP client wrapper used for every page
    //   store: where accepted pages are emitted
    //   owner: site identifier attached to every stored page
    pub fn new(
        config: CrawlConfig,
        fetcher: PageFetcher,
        store: Arc<dyn PageStore>,
        owner: impl Into<String>,
    ) -> Self {
        let permits = config.concurrency().min(Semaphore::MAX_PERMITS);

        Self {
            visited: VisitedSet::with_limit(config.max_pages()),
            permits: Semaphore::new(permits),
            config,
            fetcher,
            store,
            owner: owner.into(),
        }
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    // Crawls everything reachable from the seed within budget
    //
    // Returns: every accepted page, in completion order
    pub async fn run(self: Arc<Self>) -> Vec<ExtractedPage> {
        let Some(seed) = normalize_url(self.config.seed_url().as_str()) else {
            return Vec::new();
        };

        if !self.visited.try_claim(&seed) {
            debug!(url = %seed, "seed already claimed");
            return Vec::new();
        }

        Arc::clone(&self).visit(seed, 0).await
    }

    // Runs one URL's pipeline up to (not including) emission
    //
    // Fetch, extract and validate happen strictly in that order. The caller
    // must already own a claim on `url`.
    pub async fn process(&self, url: &str) -> PageOutcome {
        let fetched = {
            // The semaphore is never closed, so acquire() can't fail here
            let _permit = self.permits.acquire().await.ok();
            self.fetcher.fetch(url).await
        };

        let document = match fetched {
            Ok(document) => document,
            Err(error) => {
                return PageOutcome {
                    url: url.to_string(),
                    links: Vec::new(),
                    verdict: Verdict::Failed(error.into()),
                }
            }
        };

        let Analysis { links, page } = extract::analyze(&document.html, url, &document.final_url);

        let verdict = match page {
            Ok(page) => match extract::rejection_reason(&page, self.config.thresholds()) {
                None => Verdict::Accepted(page),
                Some(reason) => Verdict::Rejected(reason),
            },
            Err(error) => Verdict::Failed(error.into()),
        };

        PageOutcome {
            url: url.to_string(),
            links,
            verdict,
        }
    }

    // Visits a claimed URL, then its children, and returns every accepted page
    // in this branch of the crawl
    fn visit(self: Arc<Self>, url: String, depth: usize) -> BoxFuture<'static, Vec<ExtractedPage>> {
        async move {
            info!(url = %url, depth, "crawling");

            let outcome = self.process(&url).await;
            let mut accepted = Vec::new();

            let follow_links = match outcome.verdict {
                Verdict::Accepted(page) => {
                    debug!(url = %url, words = page.word_count(), "page accepted");
                    self.emit(&page).await;
                    accepted.push(page);
                    true
                }
                Verdict::Rejected(reason) => {
                    debug!(url = %url, %reason, "page rejected");
                    self.config.follow_rejected_links()
                }
                Verdict::Failed(PageError::Fetch(error)) => {
                    warn!(url = %url, %error, "failed to fetch page");
                    false
                }
                Verdict::Failed(PageError::Extract(error)) => {
                    debug!(url = %url, %error, "nothing to extract");
                    self.config.follow_rejected_links()
                }
            };

            if follow_links && depth < self.config.max_depth() {
                accepted.extend(self.expand(outcome.links, depth + 1).await);
            }

            accepted
        }
        .boxed()
    }

    // Claims eligible links and crawls them in parallel at `depth`
    //
    // Waits for every spawned child before returning.
    async fn expand(self: &Arc<Self>, links: Vec<Url>, depth: usize) -> Vec<ExtractedPage> {
        let mut children = JoinSet::new();

        for link in links {
            if !is_eligible_url(&link, self.config.seed_url()) {
                continue;
            }

            let Some(key) = normalize_url(link.as_str()) else {
                continue;
            };

            if self.visited.try_claim(&key) {
                children.spawn(Arc::clone(self).visit(key, depth));
            } else if self.visited.is_full() {
                debug!(limit = self.visited.limit(), "page budget reached");
                break;
            }
        }

        let mut pages = Vec::new();
        while let Some(joined) = children.join_next().await {
            match joined {
                Ok(mut branch) => pages.append(&mut branch),
                Err(error) => warn!(%error, "crawl task failed"),
            }
        }

        pages
    }

    // Hands an accepted page to the storage collaborator
    //
    // A storage failure is logged; the page still counts as accepted.
    async fn emit(&self, page: &ExtractedPage) {
        if let Err(error) = self.store.save(page, &self.owner).await {
            warn!(url = page.url(), %error, "failed to store page");
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does visit() return a BoxFuture?
//    - An async fn that calls itself would need a future type containing
//      itself, which has infinite size
//    - .boxed() puts the future on the heap, so its size is just a pointer
//
// 2. What is a Semaphore?
//    - A counter of "permits"; acquire() waits until one is free
//    - The permit is given back when it is dropped
//    - Here it limits how many HTTP requests run at the same time
//
// 3. What does JoinSet do?
//    - Owns a group of spawned tasks
//    - join_next() returns the next task to finish, None once all are done
//    - A task that panicked comes back as Err instead of crashing us
//
// 4. Why self: Arc<Self>?
//    - tokio::spawn needs 'static data, so a child can't borrow the scheduler
//    - Each child gets its own Arc clone, which is just a reference count bump
// -----------------------------------------------------------------------------
