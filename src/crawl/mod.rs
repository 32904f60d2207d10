// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Submodules:
// - classifier: which discovered links are eligible (same host, no assets)
// - visited: the shared, budget-capped set of claimed URLs
// - scheduler: concurrent, depth-bounded expansion of the link graph
// - job: the entry point that runs one crawl and returns its result
// =============================================================================

mod classifier;
mod job;
mod scheduler;
mod visited;

pub use classifier::{is_eligible, is_eligible_url, normalize_url, SKIPPED_EXTENSIONS};
pub use job::{run_crawl, CrawlJob, CrawlPhase, SiteDescriptor};
pub use scheduler::{PageOutcome, Scheduler, Verdict};
pub use visited::VisitedSet;
