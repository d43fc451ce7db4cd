// src/crawl/observer.rs
// =============================================================================
// Hooks for whoever wants to watch a crawl as it happens.
//
// The crawler itself keeps only a summary (see report.rs); page bodies are
// handed to the observer and then dropped. The CLI uses an observer to print
// "found: ..." lines as pages arrive.
//
// Calls come from many tasks at once and in no particular order, which is
// why the trait requires Send + Sync and takes &self.
// =============================================================================

use crate::fetch::{FetchError, Page};
use crate::node::NodeId;

/// Receives per-node outcomes. Every method defaults to doing nothing.
pub trait CrawlObserver: Send + Sync {
    /// A node was fetched. `hops` is its distance from the seed.
    fn on_fetched(&self, _id: &NodeId, _hops: usize, _page: &Page) {}

    fn on_failed(&self, _id: &NodeId, _hops: usize, _error: &FetchError) {}

    /// A node was reached again after some other task had claimed it.
    fn on_skipped(&self, _id: &NodeId, _hops: usize) {}
}

/// Observer used when the caller does not supply one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}
