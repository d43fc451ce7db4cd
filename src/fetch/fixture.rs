// src/fetch/fixture.rs
// =============================================================================
// A fetcher backed by a fixed lookup table.
//
// Every id in the table maps to canned content and a list of links. Asking
// for an id that is not in the table fails with NotFound, exactly like a
// dead link would. This is what the tests and the CLI crawl.
//
// Fixtures can be built in code, loaded from a JSON file, or taken from the
// built-in golang.org tour graph:
//
//   {
//     "https://golang.org/": {
//       "content": "The Go Programming Language",
//       "links": ["https://golang.org/pkg/", "https://golang.org/cmd/"]
//     }
//   }
//
// Rust concepts:
// - HashMap: O(1) lookup from id to page
// - BTreeMap: Sorted keys so dumped fixtures are stable
// - Error sources: FixtureError keeps the underlying io/json error
// =============================================================================

use super::{FetchError, Fetcher, Page};
use crate::node::NodeId;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("could not read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lookup-table fetcher. Read-only once built, so it is trivially safe to
/// share between tasks.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<NodeId, Page>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds (or replaces) one page. Returns self so fixtures can be chained:
    //   StaticFetcher::new().with_page("x", Page::new("X", ["y"]))
    pub fn with_page(mut self, id: impl Into<NodeId>, page: Page) -> Self {
        self.insert(id, page);
        self
    }

    pub fn insert(&mut self, id: impl Into<NodeId>, page: Page) {
        self.pages.insert(id.into(), page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.pages.contains_key(id)
    }

    // Parses a fixture from a JSON object of { id: { content, links } }
    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let pages: HashMap<NodeId, Page> = serde_json::from_str(json)?;
        Ok(StaticFetcher { pages })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    // Pretty JSON with sorted keys, the same shape from_json_str accepts
    pub fn to_json(&self) -> Result<String, FixtureError> {
        let sorted: BTreeMap<&NodeId, &Page> = self.pages.iter().collect();
        Ok(serde_json::to_string_pretty(&sorted)?)
    }

    // The four-page golang.org graph from the Go tour's crawler exercise.
    //
    // Note that "https://golang.org/cmd/" is linked from two pages but has no
    // entry, so crawling it always produces one NotFound.
    pub fn golang_tour() -> Self {
        StaticFetcher::new()
            .with_page(
                "https://golang.org/",
                Page::new(
                    "The Go Programming Language",
                    ["https://golang.org/pkg/", "https://golang.org/cmd/"],
                ),
            )
            .with_page(
                "https://golang.org/pkg/",
                Page::new(
                    "Packages",
                    [
                        "https://golang.org/",
                        "https://golang.org/cmd/",
                        "https://golang.org/pkg/fmt/",
                        "https://golang.org/pkg/os/",
                    ],
                ),
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                Page::new("Package fmt", ["https://golang.org/", "https://golang.org/pkg/"]),
            )
            .with_page(
                "https://golang.org/pkg/os/",
                Page::new("Package os", ["https://golang.org/", "https://golang.org/pkg/"]),
            )
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { id: id.clone() })
    }
}
