// src/lib.rs
// =============================================================================
// page-harvester: a bounded, concurrent site crawler.
//
// Starting from a seed URL it discovers same-host pages, strips navigation,
// scripts and other boilerplate, and keeps only pages with enough real text.
// Accepted pages are handed to a storage collaborator (see `storage`) for a
// later indexing step.
//
// Modules:
// - config: crawl budgets and thresholds (CrawlConfig)
// - crawl: URL classifier, visited set, scheduler and crawl job
// - fetch: one HTTP GET per page
// - extract: content, metadata and link extraction plus validation
// - page: ExtractedPage and CrawlResult
// - storage: the PageStore trait and an in-memory store
// - error: error types
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod page;
pub mod storage;

pub use config::{ContentThresholds, CrawlConfig};
pub use crawl::{run_crawl, CrawlJob, SiteDescriptor};
pub use error::{ConfigError, CrawlError, ExtractError, FetchError};
pub use page::{CrawlResult, ExtractedPage};
pub use storage::{MemoryStore, PageStore};
