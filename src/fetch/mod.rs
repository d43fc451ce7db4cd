// src/fetch/mod.rs
// =============================================================================
// The fetch capability: the crawler's only window onto the graph.
//
// The crawler never talks to a network itself. Whoever starts a crawl hands
// it something that implements `Fetcher`, and the crawler calls it once per
// node it claims. A fetcher answers "given this id, what is its content and
// which ids does it link to?", or fails.
//
// Submodules:
// - fixture: A lookup table fetcher (canned pages, used by tests and the CLI)
// - delay: A wrapper that adds latency and jitter to any other fetcher
//
// Rust concepts:
// - Traits: The Fetcher interface, implemented by several types
// - async-trait: Lets us store a fetcher as Arc<dyn Fetcher>
// - thiserror: Typed error enums with Display generated for us
// =============================================================================

mod delay;
mod fixture;

pub use delay::DelayedFetcher;
pub use fixture::{FixtureError, StaticFetcher};

use crate::node::NodeId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// What a successful fetch returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// The body of the node
    pub content: String,
    /// Ids the node references, in document order
    #[serde(default)]
    pub links: Vec<NodeId>,
}

impl Page {
    pub fn new<I, L>(content: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<NodeId>,
    {
        Page {
            content: content.into(),
            links: links.into_iter().map(Into::into).collect(),
        }
    }
}

/// Why a fetch failed. Only ever ends the branch of the node that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The fetcher has no such node
    #[error("not found: {id}")]
    NotFound { id: NodeId },

    /// The fetch took longer than the configured timeout
    #[error("timed out after {after_ms}ms: {id}")]
    Timeout { id: NodeId, after_ms: u64 },

    /// Any other failure reported by the fetcher
    #[error("fetch failed for {id}: {message}")]
    Failed { id: NodeId, message: String },
}

impl FetchError {
    pub fn id(&self) -> &NodeId {
        match self {
            FetchError::NotFound { id }
            | FetchError::Timeout { id, .. }
            | FetchError::Failed { id, .. } => id,
        }
    }
}

/// Resolves a node id to its content and outgoing links.
///
/// Implementations must be safe to call from many tasks at once, including
/// racing calls for the same id.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError>;
}

// Lets callers keep their own handle on a fetcher (to inspect it after the
// crawl, for example) while also handing a clone to the crawler.
#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
        (**self).fetch(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new_converts_links() {
        let page = Page::new("Packages", ["https://golang.org/", "https://golang.org/cmd/"]);
        assert_eq!(page.content, "Packages");
        assert_eq!(
            page.links,
            vec![NodeId::from("https://golang.org/"), NodeId::from("https://golang.org/cmd/")]
        );
    }

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::NotFound { id: "https://golang.org/cmd/".into() };
        assert_eq!(err.to_string(), "not found: https://golang.org/cmd/");
        assert_eq!(err.id().as_str(), "https://golang.org/cmd/");

        let err = FetchError::Timeout { id: "a".into(), after_ms: 250 };
        assert_eq!(err.to_string(), "timed out after 250ms: a");
    }

    #[test]
    fn test_page_links_default_to_empty() {
        let page: Page = serde_json::from_str(r#"{"content": "leaf"}"#).unwrap();
        assert!(page.links.is_empty());
    }
}
