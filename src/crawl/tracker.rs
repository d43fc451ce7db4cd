// src/crawl/tracker.rs
// =============================================================================
// The visited set: which node ids have already been claimed in this crawl.
//
// "Claiming" a node means "I am the task that will fetch it". Many tasks can
// reach the same node at the same moment (cycles, shared links), and exactly
// one of them may win. So the check "has this been claimed?" and the write
// "now it is claimed" have to happen as one step under one lock. Splitting
// them into a contains() followed by an insert() would let two tasks both see
// "not claimed" and both fetch the page.
//
// HashSet::insert already returns whether the value was new, so the whole
// claim is a single insert call inside the lock.
//
// The lock is a std::sync::Mutex, not a tokio one: it is never held across an
// .await, and the critical section is one hash insert.
// =============================================================================

use crate::node::NodeId;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct VisitedTracker {
    claimed: Mutex<HashSet<NodeId>>,
}

impl VisitedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as claimed. Returns `true` only to the caller that did the
    /// marking; every later (or racing) caller for the same id gets `false`.
    /// Claims are permanent for the life of the tracker.
    pub fn claim_if_new(&self, id: &NodeId) -> bool {
        self.lock().insert(id.clone())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Sorted copy of every claimed id
    pub fn snapshot(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.lock().iter().cloned().collect();
        ids.sort();
        ids
    }

    // A panic elsewhere while holding the lock cannot leave the set half
    // updated (insert either happened or did not), so a poisoned lock is
    // still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<NodeId>> {
        self.claimed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
