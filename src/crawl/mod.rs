// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a graph.
//
// Features:
// - Parallel exploration: one tokio task per node
// - Every node fetched at most once, however many paths lead to it
// - Configurable depth limit
// - Waits for every spawned task before returning
// - Optional per-fetch timeout, concurrency cap and cancellation
//
// Submodules:
// - tracker: The visited set (who claimed which node)
// - barrier: Counts outstanding tasks, wakes the crawl when it hits zero
// - driver: The Crawler and the per-node explore step
// - cancel, config, observer, report: Supporting pieces
// =============================================================================

mod barrier;
mod cancel;
mod config;
mod driver;
mod observer;
mod report;
mod tracker;

pub use barrier::{CompletionBarrier, CompletionToken};
pub use cancel::CancelSignal;
pub use config::{CrawlConfig, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use driver::{Crawler, CrawlerBuilder};
pub use observer::{CrawlObserver, NoopObserver};
pub use report::{CrawlReport, FailureRecord, VisitRecord};
pub use tracker::VisitedTracker;
