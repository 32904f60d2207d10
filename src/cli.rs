// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every crawl budget flag can also be set through an environment variable
// (HARVEST_MAX_PAGES, HARVEST_MAX_DEPTH, ...). An explicit flag wins over the
// environment, and the environment wins over the built-in default.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use page_harvester::config::{
    DEFAULT_CLIENT_IDENTIFIER, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES,
    DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(
    name = "page-harvester",
    version,
    about = "Crawl a website and extract the clean text of its pages",
    long_about = "page-harvester crawls a website from a seed URL, stays on the seed's host, \
                  strips navigation and other boilerplate, and keeps only pages with enough \
                  real text. Results can be printed as a table or as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and extract every substantive page
    ///
    /// Example: page-harvester crawl https://example.com --max-depth 2 --max-pages 100
    Crawl {
        /// Website URL to start from (e.g., https://example.com)
        website_url: String,

        /// Maximum number of distinct URLs to fetch
        #[arg(long, env = "HARVEST_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: usize,

        /// Maximum link hops from the starting page
        ///
        /// Depth 0 = just the starting page
        /// Depth 1 = starting page + all pages it links to
        #[arg(long, env = "HARVEST_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of pages fetched at the same time
        #[arg(long, env = "HARVEST_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Identifier pages are stored under (defaults to the site's host)
        #[arg(long)]
        site_id: Option<String>,

        /// Keep following links found on pages that were too thin to keep
        #[arg(long)]
        follow_rejected: bool,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single page and show what would be extracted from it
    ///
    /// Example: page-harvester extract https://example.com/about
    Extract {
        /// Page URL to fetch
        page_url: String,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Output the extracted page as JSON
        #[arg(long)]
        json: bool,
    },
}

// HTTP settings shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Per-request timeout in seconds
    #[arg(long, env = "HARVEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[arg(long, env = "HARVEST_USER_AGENT", default_value = DEFAULT_CLIENT_IDENTIFIER)]
    pub user_agent: String,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - Copies the fields of FetchArgs into the subcommand as if they were
//      written there
//    - Both subcommands share --timeout-secs and --user-agent without
//      repeating them
//
// 2. What does env = "..." do?
//    - If the flag is missing, clap reads that environment variable
//    - If that is missing too, default_value_t is used
//    - Needs clap's "env" feature (see Cargo.toml)
//
// 3. Why usize for --max-depth?
//    - usize can't be negative, so clap rejects "-1" for us
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_crawl_flags() {
        let cli = Cli::try_parse_from([
            "page-harvester",
            "crawl",
            "https://example.com",
            "--max-pages",
            "5",
            "--max-depth",
            "0",
            "--site-id",
            "docs",
            "--timeout-secs",
            "3",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Crawl {
                website_url,
                max_pages,
                max_depth,
                site_id,
                fetch,
                json,
                ..
            } => {
                assert_eq!(website_url, "https://example.com");
                assert_eq!(max_pages, 5);
                assert_eq!(max_depth, 0);
                assert_eq!(site_id.as_deref(), Some("docs"));
                assert_eq!(fetch.timeout_secs, 3);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_depth_rejected() {
        let parsed = Cli::try_parse_from([
            "page-harvester",
            "crawl",
            "https://example.com",
            "--max-depth",
            "-1",
        ]);
        assert!(parsed.is_err());
    }
}
