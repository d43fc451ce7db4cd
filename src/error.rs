// src/error.rs
//! Errors that stop a crawl before it starts.
//!
//! A failed fetch is not one of these: it only ends its own branch and shows
//! up in the report. These are caller mistakes, caught before a single task
//! is spawned.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    /// The crawler was built without a fetcher.
    #[error("no fetcher configured")]
    MissingFetcher,

    #[error("crawl depth must not be negative (got {0})")]
    NegativeDepth(i64),

    #[error("crawl depth {0} is too large")]
    DepthTooLarge(i64),

    #[error("seed node id is empty")]
    EmptySeed,
}

/// Result type for crawl operations.
pub type CrawlResult<T> = Result<T, CrawlError>;
