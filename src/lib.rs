// src/lib.rs
// =============================================================================
// graph-crawler: a concurrent, deduplicating graph crawler.
//
// Give it a seed node, a depth and something that can fetch nodes, and it
// explores everything reachable in parallel, fetching each node at most once
// and returning only when all of the work is done.
//
//   let crawler = Crawler::new(StaticFetcher::golang_tour());
//   let report = crawler.crawl("https://golang.org/", 4).await?;
//
// Modules:
// - node: NodeId, the key every node is known by
// - fetch: The Fetcher trait and the fetchers that ship with the crate
// - crawl: The crawler itself
// - error: Errors that stop a crawl before it starts
// - logging: tracing-subscriber setup for the binary
// =============================================================================

pub mod crawl;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod node;

pub use crawl::{CancelSignal, CrawlConfig, CrawlObserver, CrawlReport, Crawler};
pub use error::{CrawlError, CrawlResult};
pub use fetch::{DelayedFetcher, FetchError, Fetcher, Page, StaticFetcher};
pub use node::NodeId;
