// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results as a table or JSON on stdout
// 5. Exit with proper code (0 = pages found, 1 = nothing accepted, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FetchArgs};
use page_harvester::crawl::{CrawlJob, Scheduler, SiteDescriptor, Verdict};
use page_harvester::extract::UNTITLED_PAGE;
use page_harvester::fetch::PageFetcher;
use page_harvester::storage::{site_stats, MemoryStore, SiteStats};
use page_harvester::{CrawlConfig, ExtractedPage};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,page_harvester=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            website_url,
            max_pages,
            max_depth,
            concurrency,
            site_id,
            follow_rejected,
            fetch,
            json,
        } => {
            let config = CrawlConfig::builder(website_url.as_str())
                .max_pages(max_pages)
                .max_depth(max_depth)
                .concurrency(concurrency)
                .fetch_timeout(Duration::from_secs(fetch.timeout_secs))
                .client_identifier(fetch.user_agent)
                .follow_rejected_links(follow_rejected)
                .build()
                .context("invalid crawl settings")?;

            // Default the site id to the host, which the builder guarantees exists
            let site_id = site_id
                .unwrap_or_else(|| config.seed_url().host_str().unwrap_or_default().to_string());
            let site = SiteDescriptor::new(site_id, website_url);

            handle_crawl(&site, config, json).await
        }
        Commands::Extract {
            page_url,
            fetch,
            json,
        } => handle_extract(&page_url, &fetch, json).await,
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(site: &SiteDescriptor, config: CrawlConfig, json: bool) -> Result<i32> {
    let store = Arc::new(MemoryStore::new());

    let mut job = CrawlJob::for_site(site, config, store.clone())
        .context("could not start crawl")?;
    let result = job.run().await;

    let stats = site_stats(store.as_ref(), &site.id)
        .await
        .context("could not read stored pages")?;

    if json {
        let output = serde_json::json!({
            "site_id": site.id,
            "seed_url": site.seed_url,
            "urls_claimed": result.urls_claimed(),
            "stats": stats,
            "pages": result.pages(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(result.pages());
        print_stats(&stats, result.urls_claimed());
    }

    Ok(if result.is_empty() { 1 } else { 0 })
}

// Handles the 'extract' subcommand: one page, no crawling, nothing stored
async fn handle_extract(page_url: &str, fetch: &FetchArgs, json: bool) -> Result<i32> {
    let config = CrawlConfig::builder(page_url)
        .max_pages(1)
        .max_depth(0)
        .fetch_timeout(Duration::from_secs(fetch.timeout_secs))
        .client_identifier(fetch.user_agent.clone())
        .build()
        .context("invalid page URL or fetch settings")?;

    let fetcher = PageFetcher::from_config(&config).context("could not build HTTP client")?;
    let scheduler = Scheduler::new(
        config.clone(),
        fetcher,
        Arc::new(MemoryStore::new()),
        "extract",
    );

    let outcome = scheduler.process(config.seed_url().as_str()).await;

    match outcome.verdict {
        Verdict::Accepted(page) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page);
                println!("✅ Accepted ({} links found)", outcome.links.len());
            }
            Ok(0)
        }
        Verdict::Rejected(reason) => {
            println!("⚠️  Rejected: {}", reason);
            Ok(1)
        }
        Verdict::Failed(error) => {
            println!("❌ Failed: {}", error);
            Ok(1)
        }
    }
}

// Prints accepted pages as a human-readable table
fn print_table(pages: &[ExtractedPage]) {
    println!("{:<60} {:>7} {:<5} {:<40}", "URL", "WORDS", "LANG", "TITLE");
    println!("{}", "=".repeat(115));

    for page in pages {
        println!(
            "{:<60} {:>7} {:<5} {:<40}",
            truncate(page.url(), 57),
            page.word_count(),
            page.language(),
            truncate(page.title(), 37)
        );
    }

    println!();
}

fn print_stats(stats: &SiteStats, urls_claimed: usize) {
    println!("📊 Summary:");
    println!("   🌐 URLs fetched: {}", urls_claimed);
    println!("   ✅ Pages kept: {}", stats.total_pages);
    println!("   📝 Words: {}", stats.total_words);
    println!("   🔤 Characters: {}", stats.total_characters);
}

fn print_page(page: &ExtractedPage) {
    println!("URL:         {}", page.url());
    if page.title() != UNTITLED_PAGE {
        println!("Title:       {}", page.title());
    }
    println!("Language:    {}", page.language());
    println!("Words:       {}", page.word_count());
    println!("Characters:  {}", page.content_length());
    if let Some(description) = page.meta_description() {
        println!("Description: {}", description);
    }
    if let Some(keywords) = page.meta_keywords() {
        println!("Keywords:    {}", keywords);
    }
    println!();
    println!("{}", truncate(page.content(), 500));
    println!();
}

// Shortens `text` to `max` characters, adding "..." when something was cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
