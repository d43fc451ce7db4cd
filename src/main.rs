// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the results
// 5. Exit with proper code (0 = clean crawl, 1 = failed fetches, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use graph_crawler::crawl::{CrawlObserver, CrawlReport};
use graph_crawler::logging::{init_logging, LoggingConfig};
use graph_crawler::{CrawlConfig, Crawler, DelayedFetcher, FetchError, Fetcher, NodeId, Page, StaticFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        format: cli.log_format,
        default_level: cli.log_level,
    });

    match cli.command {
        Commands::Crawl {
            seed,
            depth,
            fixture,
            json,
            jitter_ms,
            timeout_ms,
            max_concurrency,
        } => {
            let mut config = CrawlConfig::default().with_max_concurrent_fetches(max_concurrency);
            if let Some(ms) = timeout_ms {
                config = config.with_fetch_timeout(Duration::from_millis(ms));
            }
            let args = CrawlArgs { seed, depth, fixture, json, jitter_ms, config };
            handle_crawl(args).await
        }
        Commands::Fixture => handle_fixture(),
    }
}

struct CrawlArgs {
    seed: String,
    depth: i64,
    fixture: Option<PathBuf>,
    json: bool,
    jitter_ms: u64,
    config: CrawlConfig,
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let graph = match &args.fixture {
        Some(path) => StaticFetcher::from_path(path)
            .with_context(|| format!("loading fixture {}", path.display()))?,
        None => StaticFetcher::golang_tour(),
    };

    let fetcher: Arc<dyn Fetcher> = if args.jitter_ms > 0 {
        Arc::new(DelayedFetcher::with_jitter(graph, Duration::from_millis(args.jitter_ms)))
    } else {
        Arc::new(graph)
    };

    let mut builder = Crawler::builder().shared_fetcher(fetcher).config(args.config);
    if !args.json {
        println!("🔍 Crawling from: {}", args.seed);
        println!("📊 Max crawl depth: {}", args.depth);
        builder = builder.observer(ConsoleObserver);
    }
    let crawler = builder.build()?;

    // Ctrl-C stops the crawl; what was fetched so far is still reported
    let cancel = crawler.cancel_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let report = crawler.crawl(args.seed.as_str(), args.depth).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    Ok(if report.is_clean() { 0 } else { 1 })
}

// Handles the 'fixture' subcommand
fn handle_fixture() -> Result<i32> {
    println!("{}", StaticFetcher::golang_tour().to_json()?);
    Ok(0)
}

// Prints pages as they arrive, in whatever order the tasks finish
struct ConsoleObserver;

impl CrawlObserver for ConsoleObserver {
    fn on_fetched(&self, id: &NodeId, _hops: usize, page: &Page) {
        println!("found: {} {:?}", id, page.content);
    }

    fn on_failed(&self, _id: &NodeId, _hops: usize, error: &FetchError) {
        println!("{}", error);
    }
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &CrawlReport) {
    println!();
    println!("{:<60} {:<6} {:<10} {:<30}", "NODE", "HOPS", "STATUS", "DETAIL");
    println!("{}", "=".repeat(106));

    for record in &report.fetched {
        println!(
            "{:<60} {:<6} {:<10} {:<30}",
            truncate(record.id.as_str()),
            record.hops,
            "✅ OK",
            format!("{} link(s)", record.links)
        );
    }
    for record in &report.failures {
        println!(
            "{:<60} {:<6} {:<10} {:<30}",
            truncate(record.id.as_str()),
            record.hops,
            "❌ FAILED",
            record.error
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", report.fetched.len());
    println!("   ❌ Failed: {}", report.failures.len());
    println!("   🔁 Already seen: {}", report.duplicates);
    println!("   ⏱️  Elapsed: {}ms", report.elapsed_ms);
    if report.cancelled {
        println!("   ⚠️  Crawl was cancelled before it finished");
    }
}

// Truncate ids too long for the table column
fn truncate(id: &str) -> String {
    if id.chars().count() > 57 {
        let head: String = id.chars().take(57).collect();
        format!("{}...", head)
    } else {
        id.to_string()
    }
}
