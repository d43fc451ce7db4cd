// src/crawl/report.rs
// =============================================================================
// The summary a crawl returns once every task has finished.
//
// While the crawl runs, outcomes are collected in a Recorder shared by all
// tasks. It has its own locks, separate from the visited tracker, and no task
// ever holds both at once. When the crawl is done the recorder is turned into
// a CrawlReport, sorted so the output does not depend on task scheduling.
//
// Like the link checker's results, the report derives Serialize so the CLI
// can print it with --json.
// =============================================================================

use crate::fetch::FetchError;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A node that was fetched successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: NodeId,
    /// Distance from the seed along the path that claimed it
    pub hops: usize,
    /// Links found on the node (whether or not they were followed)
    pub links: usize,
}

/// A node whose fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: NodeId,
    pub hops: usize,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub seed: NodeId,
    pub depth: u32,
    pub fetched: Vec<VisitRecord>,
    pub failures: Vec<FailureRecord>,
    /// Times a task reached a node someone else had already claimed
    pub duplicates: usize,
    /// Times a branch stopped because its depth ran out
    pub cutoffs: usize,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl CrawlReport {
    pub fn fetched_ids(&self) -> Vec<NodeId> {
        self.fetched.iter().map(|record| record.id.clone()).collect()
    }

    pub fn failed_ids(&self) -> Vec<NodeId> {
        self.failures.iter().map(|record| record.id.clone()).collect()
    }

    /// True when nothing failed and the crawl ran to the end.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    fetched: Mutex<Vec<VisitRecord>>,
    failures: Mutex<Vec<FailureRecord>>,
    duplicates: AtomicUsize,
    cutoffs: AtomicUsize,
}

impl Recorder {
    pub(crate) fn fetched(&self, id: &NodeId, hops: usize, links: usize) {
        lock(&self.fetched).push(VisitRecord {
            id: id.clone(),
            hops,
            links,
        });
    }

    pub(crate) fn failed(&self, id: &NodeId, hops: usize, error: &FetchError) {
        lock(&self.failures).push(FailureRecord {
            id: id.clone(),
            hops,
            error: error.to_string(),
        });
    }

    pub(crate) fn duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cutoff(&self) {
        self.cutoffs.fetch_add(1, Ordering::Relaxed);
    }

    // Drains what has been recorded so far. Called once, after the barrier
    // says every task is done; tasks may still be dropping their handles on
    // the shared state at that point, so this works through &self.
    pub(crate) fn take_report(
        &self,
        seed: NodeId,
        depth: u32,
        cancelled: bool,
        elapsed: Duration,
    ) -> CrawlReport {
        let mut fetched = std::mem::take(&mut *lock(&self.fetched));
        let mut failures = std::mem::take(&mut *lock(&self.failures));
        fetched.sort_by(|a, b| (a.hops, &a.id).cmp(&(b.hops, &b.id)));
        failures.sort_by(|a, b| (a.hops, &a.id).cmp(&(b.hops, &b.id)));

        CrawlReport {
            seed,
            depth,
            fetched,
            failures,
            duplicates: self.duplicates.swap(0, Ordering::AcqRel),
            cutoffs: self.cutoffs.swap(0, Ordering::AcqRel),
            cancelled,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
