// src/crawl/driver.rs
// =============================================================================
// The crawler: explores a graph in parallel, fetching every node at most once.
//
// How it works:
// 1. crawl() checks its inputs, then spawns one task for the seed
// 2. Each task runs explore() for one node:
//      - depth used up?       -> stop (cutoff)
//      - crawl cancelled?     -> stop
//      - already claimed?     -> stop (duplicate)
//      - fetch it             -> on error, report and stop
//      - for each link found  -> register work, spawn explore(link, depth - 1)
// 3. crawl() waits on the completion barrier until every task is done
//
// There is no queue. The old breadth-first loop fetched one page at a time;
// here every link becomes its own tokio task and the runtime runs as many as
// it can at once. The visited tracker is what keeps two tasks from fetching
// the same page, and the completion barrier is what tells us when the last
// task has finished.
//
// Shared state (tracker, barrier, recorder) lives in one Traversal behind an
// Arc. Each piece has its own lock, none of them is ever locked while
// another is held, and the tracker lock is never held during a fetch.
//
// Rust concepts:
// - Arc<dyn Trait>: Shared ownership of a fetcher/observer picked at runtime
// - BoxFuture: A recursive async function has to box its future
// - tokio::select!: Race a fetch against cancellation
// - Semaphore: Cap how many fetches run at the same time
// =============================================================================

use super::barrier::{CompletionBarrier, CompletionToken};
use super::cancel::CancelSignal;
use super::config::CrawlConfig;
use super::observer::{CrawlObserver, NoopObserver};
use super::report::{CrawlReport, Recorder};
use super::tracker::VisitedTracker;
use crate::error::{CrawlError, CrawlResult};
use crate::fetch::{FetchError, Fetcher, Page};
use crate::node::NodeId;
use futures::future::{BoxFuture, FutureExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Runs crawls over the graph exposed by a fetcher.
///
/// A crawler can run any number of crawls, one after the other or at the same
/// time. Each crawl gets its own visited set, so a node fetched by one crawl
/// is fetched again by the next.
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    observer: Arc<dyn CrawlObserver>,
    config: CrawlConfig,
    cancel: CancelSignal,
}

/// Assembles a [`Crawler`]. Only the fetcher is required.
#[derive(Default)]
pub struct CrawlerBuilder {
    fetcher: Option<Arc<dyn Fetcher>>,
    observer: Option<Arc<dyn CrawlObserver>>,
    config: CrawlConfig,
    cancel: Option<CancelSignal>,
}

impl CrawlerBuilder {
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn shared_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn observer(mut self, observer: impl CrawlObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn shared_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    // Use a signal created elsewhere, e.g. one wired to Ctrl-C
    pub fn cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> CrawlResult<Crawler> {
        let fetcher = self.fetcher.ok_or(CrawlError::MissingFetcher)?;
        Ok(Crawler {
            fetcher,
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
            config: self.config,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Crawler {
    pub fn builder() -> CrawlerBuilder {
        CrawlerBuilder::default()
    }

    /// A crawler with default settings and no observer.
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Crawler {
            fetcher: Arc::new(fetcher),
            observer: Arc::new(NoopObserver),
            config: CrawlConfig::default(),
            cancel: CancelSignal::new(),
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Handle for stopping crawls from another task.
    ///
    /// Cancelling is permanent for this crawler: crawls already running wind
    /// down, and later crawls return straight away with `cancelled` set.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Crawls everything reachable from `seed` within `depth` hops.
    ///
    /// `depth` counts fetch levels: 0 fetches nothing, 1 fetches only the
    /// seed, 2 the seed and the pages it links to, and so on. Returns once
    /// every spawned task has finished. Fetch failures do not make this fail;
    /// they are listed in the report.
    pub async fn crawl(&self, seed: impl Into<NodeId>, depth: i64) -> CrawlResult<CrawlReport> {
        let seed = seed.into();
        if seed.is_empty() {
            return Err(CrawlError::EmptySeed);
        }
        let depth = match u32::try_from(depth) {
            Ok(depth) => depth,
            Err(_) if depth < 0 => return Err(CrawlError::NegativeDepth(depth)),
            Err(_) => return Err(CrawlError::DepthTooLarge(depth)),
        };

        let started = Instant::now();
        let traversal = Arc::new(Traversal {
            fetcher: self.fetcher.clone(),
            observer: self.observer.clone(),
            tracker: VisitedTracker::new(),
            barrier: CompletionBarrier::new(),
            recorder: Recorder::default(),
            cancel: self.cancel.clone(),
            permits: self.config.fetch_permits().map(Semaphore::new),
            fetch_timeout: self.config.fetch_timeout,
        });

        info!(seed = %seed, depth, "starting crawl");

        let root = traversal.barrier.register();
        tokio::spawn(explore(traversal.clone(), seed.clone(), depth, 0, root));
        traversal.barrier.wait().await;

        let cancelled = traversal.cancel.is_cancelled();
        let report = traversal
            .recorder
            .take_report(seed, depth, cancelled, started.elapsed());

        info!(
            fetched = report.fetched.len(),
            failed = report.failures.len(),
            duplicates = report.duplicates,
            cancelled,
            elapsed_ms = report.elapsed_ms,
            "crawl finished"
        );
        Ok(report)
    }
}

// Everything the tasks of one crawl share
struct Traversal {
    fetcher: Arc<dyn Fetcher>,
    observer: Arc<dyn CrawlObserver>,
    tracker: VisitedTracker,
    barrier: CompletionBarrier,
    recorder: Recorder,
    cancel: CancelSignal,
    permits: Option<Semaphore>,
    fetch_timeout: Option<Duration>,
}

impl Traversal {
    // Fetches one node, honouring the concurrency cap and the timeout.
    // Returns None if the crawl was cancelled before or during the fetch.
    async fn fetch(&self, id: &NodeId) -> Option<Result<Page, FetchError>> {
        let _permit = match &self.permits {
            Some(permits) => tokio::select! {
                permit = permits.acquire() => permit.ok(),
                _ = self.cancel.cancelled() => return None,
            },
            None => None,
        };
        if self.cancel.is_cancelled() {
            return None;
        }

        // A panicking fetcher is a failed fetch like any other
        let call = AssertUnwindSafe(self.fetcher.fetch(id))
            .catch_unwind()
            .map(|outcome| {
                outcome.unwrap_or_else(|_| {
                    Err(FetchError::Failed {
                        id: id.clone(),
                        message: "fetcher panicked".to_string(),
                    })
                })
            });

        let attempt = async {
            match self.fetch_timeout {
                Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                    Err(FetchError::Timeout {
                        id: id.clone(),
                        after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }),
                None => call.await,
            }
        };

        tokio::select! {
            result = attempt => Some(result),
            _ = self.cancel.cancelled() => None,
        }
    }
}

// Explores one node. The token is this task's unit of outstanding work; it
// is dropped (completing the unit) whichever way the function returns.
fn explore(
    traversal: Arc<Traversal>,
    id: NodeId,
    depth: u32,
    hops: usize,
    token: CompletionToken,
) -> BoxFuture<'static, ()> {
    async move {
        let _token = token;

        if depth == 0 {
            debug!(node = %id, hops, "depth exhausted");
            traversal.recorder.cutoff();
            return;
        }

        if traversal.cancel.is_cancelled() {
            debug!(node = %id, hops, "crawl cancelled before claim");
            return;
        }

        if !traversal.tracker.claim_if_new(&id) {
            debug!(node = %id, hops, "already claimed");
            traversal.recorder.duplicate();
            traversal.observer.on_skipped(&id, hops);
            return;
        }

        let page = match traversal.fetch(&id).await {
            Some(Ok(page)) => page,
            Some(Err(error)) => {
                warn!(node = %id, hops, %error, "fetch failed");
                traversal.recorder.failed(&id, hops, &error);
                traversal.observer.on_failed(&id, hops, &error);
                return;
            }
            None => {
                debug!(node = %id, hops, "crawl cancelled during fetch");
                return;
            }
        };

        info!(node = %id, hops, links = page.links.len(), "found");
        traversal.recorder.fetched(&id, hops, page.links.len());
        traversal.observer.on_fetched(&id, hops, &page);

        // Register each child before spawning it; our own token is still
        // held here, so the counter cannot reach zero in between.
        for link in page.links {
            let child = traversal.barrier.register();
            tokio::spawn(explore(traversal.clone(), link, depth - 1, hops + 1, child));
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{DelayedFetcher, StaticFetcher};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // Wraps a fetcher and counts how many times each id was fetched
    struct CountingFetcher<F> {
        inner: F,
        calls: Mutex<HashMap<NodeId, usize>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl<F: Fetcher> CountingFetcher<F> {
        fn new(inner: F) -> Self {
            CountingFetcher {
                inner,
                calls: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> HashMap<NodeId, usize> {
            self.calls.lock().unwrap().clone()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }
    }

    #[async_trait]
    impl<F: Fetcher> Fetcher for CountingFetcher<F> {
        async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
            *self.calls.lock().unwrap().entry(id.clone()).or_insert(0) += 1;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            let result = self.inner.fetch(id).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    // Node n links to n+1 and 2n+1, forever
    struct EndlessFetcher;

    #[async_trait]
    impl Fetcher for EndlessFetcher {
        async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
            let n: u64 = id.as_str().parse().map_err(|_| FetchError::Failed {
                id: id.clone(),
                message: "not a number".to_string(),
            })?;
            Ok(Page::new(format!("node {}", n), [(n + 1).to_string(), (2 * n + 1).to_string()]))
        }
    }

    // Never answers
    struct HangingFetcher;

    #[async_trait]
    impl Fetcher for HangingFetcher {
        async fn fetch(&self, _id: &NodeId) -> Result<Page, FetchError> {
            futures::future::pending().await
        }
    }

    fn triangle() -> StaticFetcher {
        StaticFetcher::new()
            .with_page("X", Page::new("x", ["Y", "Z"]))
            .with_page("Y", Page::new("y", ["X", "Z"]))
            .with_page("Z", Page::new("z", Vec::<&str>::new()))
    }

    // Every node links to every other node
    fn clique(size: usize) -> StaticFetcher {
        let mut fetcher = StaticFetcher::new();
        for i in 0..size {
            let links: Vec<String> = (0..size).filter(|j| *j != i).map(|j| format!("n{}", j)).collect();
            fetcher.insert(format!("n{}", i), Page::new(format!("node {}", i), links));
        }
        fetcher
    }

    #[tokio::test]
    async fn test_triangle_fetches_each_node_once() {
        let fetcher = Arc::new(CountingFetcher::new(triangle()));
        let crawler = Crawler::builder().shared_fetcher(fetcher.clone()).build().unwrap();

        let report = crawler.crawl("X", 3).await.unwrap();

        assert_eq!(report.fetched_ids(), vec![NodeId::from("X"), "Y".into(), "Z".into()]);
        assert!(report.is_clean());
        assert!(fetcher.calls().values().all(|count| *count == 1));
        assert_eq!(fetcher.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_golang_fixture() {
        let crawler = Crawler::new(StaticFetcher::golang_tour());
        let report = crawler.crawl("https://golang.org/", 4).await.unwrap();

        assert_eq!(
            report.fetched_ids(),
            vec![
                NodeId::from("https://golang.org/"),
                "https://golang.org/pkg/".into(),
                "https://golang.org/pkg/fmt/".into(),
                "https://golang.org/pkg/os/".into(),
            ]
        );
        assert_eq!(report.failed_ids(), vec![NodeId::from("https://golang.org/cmd/")]);
        assert_eq!(report.failures[0].error, "not found: https://golang.org/cmd/");
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_nothing() {
        let fetcher = Arc::new(CountingFetcher::new(triangle()));
        let crawler = Crawler::builder().shared_fetcher(fetcher.clone()).build().unwrap();

        let report = crawler.crawl("X", 0).await.unwrap();
        assert!(report.fetched.is_empty());
        assert_eq!(report.cutoffs, 1);
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_depth_one_fetches_only_the_seed() {
        let crawler = Crawler::new(triangle());
        let report = crawler.crawl("X", 1).await.unwrap();
        assert_eq!(report.fetched_ids(), vec![NodeId::from("X")]);
        // Y and Z were reached but not fetched
        assert_eq!(report.cutoffs, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_bound_holds_on_endless_graph() {
        let fetcher = Arc::new(CountingFetcher::new(EndlessFetcher));
        let crawler = Crawler::builder().shared_fetcher(fetcher.clone()).build().unwrap();

        let report = crawler.crawl("1", 5).await.unwrap();

        assert!(report.is_clean());
        assert!(report.fetched.iter().all(|record| record.hops < 5));
        // A breadth-first walk from 1 over n -> {n+1, 2n+1} reaches these
        // within 4 hops and nothing else
        let mut reachable = std::collections::HashSet::new();
        let mut frontier = vec![1u64];
        for _ in 0..5 {
            let mut next = Vec::new();
            for n in frontier {
                if reachable.insert(n) {
                    next.push(n + 1);
                    next.push(2 * n + 1);
                }
            }
            frontier = next;
        }
        for record in &report.fetched {
            let n: u64 = record.id.as_str().parse().unwrap();
            assert!(reachable.contains(&n), "{} is too far from the seed", n);
        }
        assert!(fetcher.calls().values().all(|count| *count == 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_dense_graph_with_jitter_never_double_fetches() {
        let fetcher = Arc::new(CountingFetcher::new(DelayedFetcher::with_jitter(
            clique(40),
            Duration::from_millis(3),
        )));
        let crawler = Crawler::builder()
            .shared_fetcher(fetcher.clone())
            .config(CrawlConfig::default().unbounded())
            .build()
            .unwrap();

        for _ in 0..5 {
            let report = tokio::time::timeout(Duration::from_secs(10), crawler.crawl("n0", 3))
                .await
                .expect("crawl must not hang");
            let report = report.unwrap();
            assert_eq!(report.fetched.len(), 40);
            assert!(report.is_clean());
        }
        // 5 crawls, each fetching every node exactly once
        assert!(fetcher.calls().values().all(|count| *count == 5));
        assert_eq!(fetcher.calls().len(), 40);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_crawl_returns_only_after_every_fetch_finished() {
        let fetcher = Arc::new(CountingFetcher::new(DelayedFetcher::with_jitter(
            clique(15),
            Duration::from_millis(5),
        )));
        let crawler = Crawler::builder().shared_fetcher(fetcher.clone()).build().unwrap();

        let report = crawler.crawl("n3", 4).await.unwrap();

        assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(report.fetched.len(), 15);
        assert_eq!(fetcher.total_calls(), 15);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        // "a" is missing from the table; "b" and what it links to still load
        let fetcher = StaticFetcher::new()
            .with_page("root", Page::new("root", ["a", "b"]))
            .with_page("b", Page::new("b", ["c"]))
            .with_page("c", Page::new("c", Vec::<&str>::new()));
        let crawler = Crawler::new(fetcher);

        let report = crawler.crawl("root", 5).await.unwrap();
        assert_eq!(report.fetched_ids(), vec![NodeId::from("root"), "b".into(), "c".into()]);
        assert_eq!(report.failed_ids(), vec![NodeId::from("a")]);
        assert_eq!(report.failures[0].hops, 1);
    }

    #[tokio::test]
    async fn test_failed_seed_still_completes() {
        let crawler = Crawler::new(StaticFetcher::new());
        let report = crawler.crawl("ghost", 3).await.unwrap();
        assert!(report.fetched.is_empty());
        assert_eq!(report.failed_ids(), vec![NodeId::from("ghost")]);
    }

    #[tokio::test]
    async fn test_preconditions_fail_before_fetching() {
        let fetcher = Arc::new(CountingFetcher::new(triangle()));
        let crawler = Crawler::builder().shared_fetcher(fetcher.clone()).build().unwrap();

        assert_eq!(crawler.crawl("X", -1).await.unwrap_err(), CrawlError::NegativeDepth(-1));
        assert_eq!(crawler.crawl("", 3).await.unwrap_err(), CrawlError::EmptySeed);
        assert_eq!(
            crawler.crawl("X", i64::MAX).await.unwrap_err(),
            CrawlError::DepthTooLarge(i64::MAX)
        );
        assert_eq!(fetcher.total_calls(), 0);

        assert_eq!(Crawler::builder().build().err(), Some(CrawlError::MissingFetcher));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported_as_failure() {
        let slow = DelayedFetcher::new(
            StaticFetcher::new().with_page("slow", Page::new("slow", Vec::<&str>::new())),
            Duration::from_secs(5),
            Duration::ZERO,
        );
        let fetcher = StaticFetcher::new()
            .with_page("root", Page::new("root", ["slow", "fast"]))
            .with_page("fast", Page::new("fast", Vec::<&str>::new()));

        // Route "slow" through the delayed fetcher, everything else straight
        struct Split {
            slow: DelayedFetcher<StaticFetcher>,
            fast: StaticFetcher,
        }

        #[async_trait]
        impl Fetcher for Split {
            async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
                if id.as_str() == "slow" {
                    self.slow.fetch(id).await
                } else {
                    self.fast.fetch(id).await
                }
            }
        }

        let crawler = Crawler::builder()
            .fetcher(Split { slow, fast: fetcher })
            .config(CrawlConfig::default().with_fetch_timeout(Duration::from_millis(100)))
            .build()
            .unwrap();

        let report = crawler.crawl("root", 3).await.unwrap();
        assert_eq!(report.fetched_ids(), vec![NodeId::from("root"), "fast".into()]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].error, "timed out after 100ms: slow");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_stops_a_hanging_crawl() {
        let crawler = Crawler::new(HangingFetcher);
        let cancel = crawler.cancel_signal();

        let running = tokio::spawn({
            let crawler = crawler.clone();
            async move { crawler.crawl("anything", 3).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let report = tokio::time::timeout(Duration::from_secs(2), running)
            .await
            .expect("cancelled crawl must return")
            .unwrap()
            .unwrap();
        assert!(report.cancelled);
        assert!(report.fetched.is_empty());
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_crawl_after_cancel_returns_immediately() {
        let fetcher = Arc::new(CountingFetcher::new(triangle()));
        let crawler = Crawler::builder().shared_fetcher(fetcher.clone()).build().unwrap();
        crawler.cancel();

        let report = crawler.crawl("X", 3).await.unwrap();
        assert!(report.cancelled);
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrency_cap_limits_in_flight_fetches() {
        let fetcher = Arc::new(CountingFetcher::new(DelayedFetcher::new(
            clique(30),
            Duration::from_millis(2),
            Duration::from_millis(2),
        )));
        let crawler = Crawler::builder()
            .shared_fetcher(fetcher.clone())
            .config(CrawlConfig::default().with_max_concurrent_fetches(3))
            .build()
            .unwrap();

        let report = crawler.crawl("n0", 3).await.unwrap();
        assert_eq!(report.fetched.len(), 30);
        assert!(fetcher.peak_in_flight.load(Ordering::SeqCst) <= 3);
    }

    // Panics on "bad", answers everything else from the table
    struct PanickingFetcher {
        pages: StaticFetcher,
    }

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
            if id.as_str() == "bad" {
                panic!("fetcher exploded on {}", id);
            }
            self.pages.fetch(id).await
        }
    }

    #[tokio::test]
    async fn test_panicking_fetch_is_reported_as_failure() {
        let fetcher = PanickingFetcher {
            pages: StaticFetcher::new()
                .with_page("root", Page::new("root", ["bad", "good"]))
                .with_page("good", Page::new("good", Vec::<&str>::new())),
        };
        let observer = Arc::new(Collecting::default());
        let crawler = Crawler::builder()
            .fetcher(fetcher)
            .shared_observer(observer.clone())
            .build()
            .unwrap();

        let report = crawler.crawl("root", 3).await.unwrap();

        assert_eq!(report.fetched_ids(), vec![NodeId::from("root"), "good".into()]);
        assert_eq!(report.failed_ids(), vec![NodeId::from("bad")]);
        assert_eq!(report.failures[0].error, "fetch failed for bad: fetcher panicked");
        assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_oversized_concurrency_cap_does_not_panic() {
        let crawler = Crawler::builder()
            .fetcher(StaticFetcher::golang_tour())
            .config(CrawlConfig::default().with_max_concurrent_fetches(usize::MAX))
            .build()
            .unwrap();

        let report = crawler.crawl("https://golang.org/", 2).await.unwrap();
        assert_eq!(report.fetched.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_cap_set_on_field_does_not_hang() {
        let mut config = CrawlConfig::default();
        config.max_concurrent_fetches = Some(0);
        let crawler = Crawler::builder()
            .fetcher(StaticFetcher::golang_tour())
            .config(config)
            .build()
            .unwrap();

        let report = tokio::time::timeout(Duration::from_secs(5), crawler.crawl("https://golang.org/", 4))
            .await
            .expect("crawl must not wait on a zero-permit semaphore")
            .unwrap();
        assert_eq!(report.fetched.len(), 4);
    }

    #[derive(Default)]
    struct Collecting {
        fetched: Mutex<Vec<(NodeId, String)>>,
        failed: AtomicUsize,
        skipped: AtomicUsize,
    }

    impl CrawlObserver for Collecting {
        fn on_fetched(&self, id: &NodeId, _hops: usize, page: &Page) {
            self.fetched.lock().unwrap().push((id.clone(), page.content.clone()));
        }

        fn on_failed(&self, _id: &NodeId, _hops: usize, _error: &FetchError) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_skipped(&self, _id: &NodeId, _hops: usize) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_observer_sees_every_outcome() {
        let observer = Arc::new(Collecting::default());
        let crawler = Crawler::builder()
            .fetcher(StaticFetcher::golang_tour())
            .shared_observer(observer.clone())
            .build()
            .unwrap();

        let report = crawler.crawl("https://golang.org/", 4).await.unwrap();

        let mut seen = observer.fetched.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], (NodeId::from("https://golang.org/"), "The Go Programming Language".to_string()));
        assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
        assert_eq!(observer.skipped.load(Ordering::SeqCst), report.duplicates);
    }
}
