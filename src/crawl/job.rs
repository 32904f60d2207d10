// src/crawl/job.rs
// =============================================================================
// The top-level entry point: one crawl of one site.
//
// A CrawlJob moves through four phases:
//
//   Idle -> Running -> Draining -> Done
//
//   Idle      constructed, configuration validated, nothing fetched yet
//   Running   seed claimed, pages being fetched and expanded
//   Draining  every branch has been joined; the result is being assembled
//   Done      the CrawlResult has been handed back
//
// Construction is the only place a job can fail (bad configuration or an
// HTTP client that can't be built). Once running, a job always produces a
// CrawlResult, possibly empty.
// =============================================================================

use crate::config::{parse_seed, CrawlConfig, CrawlConfigBuilder};
use crate::crawl::scheduler::Scheduler;
use crate::error::{ConfigError, CrawlError};
use crate::fetch::PageFetcher;
use crate::page::CrawlResult;
use crate::storage::PageStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Idle,
    Running,
    Draining,
    Done,
}

// The site being crawled: where to start, and the id its pages are stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDescriptor {
    pub id: String,
    pub seed_url: String,
}

impl SiteDescriptor {
    pub fn new(id: impl Into<String>, seed_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            seed_url: seed_url.into(),
        }
    }

    // A config builder seeded with this site's URL and default budgets
    pub fn config_builder(&self) -> CrawlConfigBuilder {
        CrawlConfig::builder(self.seed_url.clone())
    }
}

pub struct CrawlJob {
    scheduler: Arc<Scheduler>,
    owner: String,
    phase: CrawlPhase,
}

impl CrawlJob {
    // Prepares a crawl job
    //
    // Parameters:
    //   config: validated crawl settings
    //   owner: site identifier attached to every stored page
    //   store: storage collaborator receiving accepted pages
    //
    // Fails fast on an empty owner id or if the HTTP client can't be built
    pub fn new(
        config: CrawlConfig,
        owner: impl Into<String>,
        store: Arc<dyn PageStore>,
    ) -> Result<Self, CrawlError> {
        let owner = owner.into();
        if owner.trim().is_empty() {
            return Err(ConfigError::EmptySiteId.into());
        }

        let fetcher = PageFetcher::from_config(&config)?;
        let scheduler = Arc::new(Scheduler::new(config, fetcher, store, owner.clone()));

        Ok(Self {
            scheduler,
            owner,
            phase: CrawlPhase::Idle,
        })
    }

    // Prepares a crawl job for `site`
    //
    // `config` must start from the site's own seed (see
    // SiteDescriptor::config_builder); pages would otherwise be stored under
    // a site they don't belong to.
    pub fn for_site(
        site: &SiteDescriptor,
        config: CrawlConfig,
        store: Arc<dyn PageStore>,
    ) -> Result<Self, CrawlError> {
        let site_seed = parse_seed(&site.seed_url)?;
        if &site_seed != config.seed_url() {
            return Err(ConfigError::SiteSeedMismatch {
                site_seed: site_seed.to_string(),
                config_seed: config.seed_url().to_string(),
            }
            .into());
        }

        Self::new(config, site.id.clone(), store)
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    // Runs the crawl to completion
    //
    // Per-page failures are logged, never returned. A job runs once; calling
    // run() again returns an empty result.
    pub async fn run(&mut self) -> CrawlResult {
        if self.phase != CrawlPhase::Idle {
            warn!(owner = %self.owner, phase = ?self.phase, "crawl job already ran");
            return CrawlResult::new(Vec::new(), self.scheduler.visited().size());
        }

        let config = self.scheduler.config();
        info!(
            seed = %config.seed_url(),
            owner = %self.owner,
            max_pages = config.max_pages(),
            max_depth = config.max_depth(),
            concurrency = config.concurrency(),
            "starting crawl"
        );
        let started = Instant::now();

        self.enter(CrawlPhase::Running);
        let pages = Arc::clone(&self.scheduler).run().await;

        self.enter(CrawlPhase::Draining);
        let result = CrawlResult::new(pages, self.scheduler.visited().size());

        info!(
            owner = %self.owner,
            accepted = result.len(),
            claimed = result.urls_claimed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "crawl finished"
        );

        self.enter(CrawlPhase::Done);
        result
    }

    fn enter(&mut self, phase: CrawlPhase) {
        debug!(owner = %self.owner, from = ?self.phase, to = ?phase, "crawl phase");
        self.phase = phase;
    }
}

// Builds and runs a crawl job in one call
pub async fn run_crawl(
    config: CrawlConfig,
    owner: impl Into<String>,
    store: Arc<dyn PageStore>,
) -> Result<CrawlResult, CrawlError> {
    let mut job = CrawlJob::new(config, owner, store)?;
    Ok(job.run().await)
}
