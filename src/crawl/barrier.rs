// src/crawl/barrier.rs
// =============================================================================
// Completion tracking for a crawl: the outstanding-work counter.
//
// A crawl spawns tasks that spawn more tasks. The crawl is finished when the
// last of them is finished, and nobody can know in advance which one that
// is. So every task carries a CompletionToken:
//
//   register()  -> counter += 1, hand out a token   (before tokio::spawn)
//   drop(token) -> counter -= 1, wake waiters at 0  (when the task ends)
//
// Registering happens *before* the child is spawned, by the parent, while
// the parent still holds its own token. The counter therefore cannot touch
// zero while there is still work being queued.
//
// Dropping is how a token completes. Whatever path a task takes (cutoff,
// duplicate, failure, success, even a panic) the token is dropped exactly
// once when the task's future goes away.
//
// Rust concepts:
// - Drop: Run code when a value goes out of scope (RAII)
// - AtomicUsize: A counter shared between threads without a lock
// - tokio::sync::Notify: Wake up async tasks waiting for an event
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    zero: Notify,
}

/// Counts outstanding exploration tasks and lets callers wait for zero.
#[derive(Debug, Clone, Default)]
pub struct CompletionBarrier {
    inner: Arc<Inner>,
}

/// One unit of outstanding work. Completes when dropped.
#[derive(Debug)]
#[must_use = "dropping a CompletionToken immediately completes its unit of work"]
pub struct CompletionToken {
    inner: Arc<Inner>,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> CompletionToken {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        CompletionToken {
            inner: self.inner.clone(),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Resolves once no tokens are outstanding.
    pub async fn wait(&self) {
        loop {
            // Register interest before reading the counter, otherwise the
            // last token could drop between the load and the await and the
            // notification would be lost.
            let notified = self.inner.zero.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.zero.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_with_nothing_registered_returns() {
        let barrier = CompletionBarrier::new();
        barrier.wait().await;
        assert_eq!(barrier.outstanding(), 0);
    }

    #[test]
    fn test_tokens_count_up_and_down() {
        let barrier = CompletionBarrier::new();
        let a = barrier.register();
        let b = barrier.register();
        assert_eq!(barrier.outstanding(), 2);
        drop(a);
        assert_eq!(barrier.outstanding(), 1);
        drop(b);
        assert_eq!(barrier.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_blocks_until_last_token_drops() {
        let barrier = CompletionBarrier::new();
        let token = barrier.register();

        let waiter = tokio::spawn({
            let barrier = barrier.clone();
            async move { barrier.wait().await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(token);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish once the counter hits zero")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_nested_registration_never_reads_zero_early() {
        let barrier = CompletionBarrier::new();
        let finished = Arc::new(AtomicUsize::new(0));

        // Each task registers its children before dropping its own token
        fn spawn_tree(barrier: CompletionBarrier, token: CompletionToken, depth: u32, finished: Arc<AtomicUsize>) {
            tokio::spawn(async move {
                let _token = token;
                tokio::task::yield_now().await;
                if depth > 0 {
                    for _ in 0..3 {
                        let child = barrier.register();
                        spawn_tree(barrier.clone(), child, depth - 1, finished.clone());
                    }
                }
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        let root = barrier.register();
        spawn_tree(barrier.clone(), root, 4, finished.clone());
        barrier.wait().await;

        // 1 + 3 + 9 + 27 + 81
        assert_eq!(finished.load(Ordering::SeqCst), 121);
        assert_eq!(barrier.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_token_dropped_by_panicking_task_still_completes() {
        let barrier = CompletionBarrier::new();
        let token = barrier.register();
        let handle = tokio::spawn(async move {
            let _token = token;
            panic!("fetcher blew up");
        });
        assert!(handle.await.is_err());
        barrier.wait().await;
        assert_eq!(barrier.outstanding(), 0);
    }
}
