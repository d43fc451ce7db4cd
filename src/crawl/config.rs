// src/crawl/config.rs
//! Tuning knobs for a crawl.

use std::time::Duration;
use tokio::sync::Semaphore;

/// Same cap the link checker has always used for concurrent requests.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 50;

/// Configuration for the crawler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Per-fetch time limit. A fetch that runs over is reported as a
    /// `FetchError::Timeout`, exactly like any other failed fetch.
    pub fetch_timeout: Option<Duration>,
    /// How many fetches may be in flight at once. `None` means unbounded.
    ///
    /// Only fetches wait for a permit. Claiming never does, so a pile of
    /// waiting tasks can never stop another task from claiming a node.
    pub max_concurrent_fetches: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: None,
            max_concurrent_fetches: Some(DEFAULT_MAX_CONCURRENT_FETCHES),
        }
    }
}

impl CrawlConfig {
    /// Sets the per-fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Caps concurrent fetches. A limit of 0 is treated as "no limit", and
    /// limits above `Semaphore::MAX_PERMITS` are clamped to it.
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = Some(limit);
        self.max_concurrent_fetches = self.fetch_permits();
        self
    }

    /// The permit count the crawler actually uses. The field is public, so
    /// it is normalized here as well: `Some(0)` would starve every fetch and
    /// is read as unbounded, and anything tokio cannot represent is clamped.
    pub fn fetch_permits(&self) -> Option<usize> {
        match self.max_concurrent_fetches {
            None | Some(0) => None,
            Some(limit) => Some(limit.min(Semaphore::MAX_PERMITS)),
        }
    }

    pub fn unbounded(mut self) -> Self {
        self.max_concurrent_fetches = None;
        self
    }
}
