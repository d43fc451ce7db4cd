// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Parser, Subcommand};
use graph_crawler::crawl::DEFAULT_MAX_CONCURRENT_FETCHES;
use graph_crawler::logging::LogFormat;
use std::path::PathBuf;
use tracing::Level;

// The entry page of the built-in fixture
pub const DEFAULT_SEED: &str = "https://golang.org/";

#[derive(Parser, Debug)]
#[command(
    name = "graph-crawler",
    version = "0.1.0",
    about = "Crawl a graph in parallel, fetching every node at most once",
    long_about = "graph-crawler explores every node reachable from a seed, up to a depth limit, \
                  fetching nodes concurrently and never fetching the same node twice. \
                  Graphs come from JSON fixture files, or the built-in golang.org tour graph."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log output format (logs are written to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Default log level; RUST_LOG takes precedence when set
    #[arg(long, global = true, default_value_t = Level::WARN)]
    pub log_level: Level,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a graph starting from a seed node
    ///
    /// Example: graph-crawler crawl https://golang.org/ --depth 4
    Crawl {
        /// Node to start from
        #[arg(default_value = DEFAULT_SEED)]
        seed: String,

        /// Maximum crawl depth
        ///
        /// Depth 1 = just the seed
        /// Depth 2 = seed + every node it links to
        /// etc.
        #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
        depth: i64,

        /// JSON fixture describing the graph (see the `fixture` command);
        /// the built-in golang.org graph is used when omitted
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Output the crawl report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Add up to this many milliseconds of random latency to every fetch
        #[arg(long, default_value_t = 0)]
        jitter_ms: u64,

        /// Give up on a single fetch after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Maximum number of fetches in flight at once (0 = unlimited)
        #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_FETCHES)]
        max_concurrency: usize,
    },

    /// Print the built-in golang.org fixture as JSON
    ///
    /// Example: graph-crawler fixture > graph.json
    Fixture,
}
